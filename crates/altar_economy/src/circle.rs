//! # Circle of Cultists
//!
//! One sacrifice, end to end.
//!
//! ```text
//! request ──► validate ──► extract sacrifice ──► price it ──► draw multiplier
//!                                                                  │
//!   output ◄── fit gate ◄── select rewards ◄── build pool ◄── remove sacrifice
//!                                                          (production registered)
//! ```
//!
//! Everything before the sacrifice is removed can reject the request without
//! touching the profile. Everything after it degrades instead of failing:
//! a poor pool, bad draws or a full grid mean fewer or no rewards, and the
//! sacrifice stays consumed.

use serde::{Deserialize, Serialize};

use crate::catalog::{ItemCatalog, PresetCatalog};
use crate::config::CultistCircleConfig;
use crate::container::{place_rewards, ContainerGrid, FitOutcome};
use crate::error::{AltarError, AltarResult};
use crate::hideout::{area, HideoutCatalog};
use crate::ids::IdSource;
use crate::output::ItemEventOutput;
use crate::pool::build_reward_pool;
use crate::profile::{PlayerProfile, Production};
use crate::random::RandomSource;
use crate::sacrifice::{extract_sacrificed_items, remove_sacrificed, reward_budget, sacrificed_value};
use crate::selector::{RewardSelector, StopReason};

/// Action name of a sacrifice request.
pub const START_SACRIFICE_ACTION: &str = "HideoutCircleOfCultistProductionStart";

/// Client request to start a sacrifice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SacrificeRequest {
    /// Must be [`START_SACRIFICE_ACTION`].
    pub action: String,
    /// Unix seconds the client started the sacrifice.
    pub timestamp: u64,
}

impl SacrificeRequest {
    /// Creates a well-formed request.
    #[must_use]
    pub fn start(timestamp: u64) -> Self {
        Self {
            action: START_SACRIFICE_ACTION.to_string(),
            timestamp,
        }
    }
}

/// What one sacrifice did.
#[derive(Clone, Debug, PartialEq)]
pub struct SacrificeOutcome {
    /// Delta for the caller.
    pub output: ItemEventOutput,
    /// Rouble value of the sacrificed items.
    pub sacrificed_value: u64,
    /// Multiplier drawn for this sacrifice.
    pub multiplier: f64,
    /// Rouble budget the rewards were picked against.
    pub budget: f64,
    /// Templates the rewards were drawn from.
    pub pool_size: usize,
    /// Why reward selection stopped.
    pub stop_reason: StopReason,
    /// Whether the rewards were granted.
    pub fit: FitOutcome,
}

/// The circle of cultists service.
pub struct CultistCircle<'a, C, H> {
    config: &'a CultistCircleConfig,
    items: &'a C,
    hideout: &'a H,
}

impl<'a, C, H> CultistCircle<'a, C, H>
where
    C: ItemCatalog + PresetCatalog,
    H: HideoutCatalog,
{
    /// Creates the service.
    #[must_use]
    pub fn new(config: &'a CultistCircleConfig, items: &'a C, hideout: &'a H) -> Self {
        Self {
            config,
            items,
            hideout,
        }
    }

    /// Consumes the sacrifice and grants rewards into `grid`.
    ///
    /// `grid` is the circle stash's occupancy. The caller must hold the
    /// profile exclusively for the duration of the call.
    ///
    /// # Errors
    ///
    /// Rejected before any change to the profile:
    /// - `InvalidRequest` if the action is not a sacrifice start
    /// - `AreaStashMissing` if the profile has no circle stash
    /// - `RecipeNotFound` if the hideout catalog has no circle recipe
    ///
    /// After the sacrifice is consumed only `PlacementDiverged` can surface,
    /// and only from a grid that breaks its own contract.
    pub fn start_sacrifice<G: ContainerGrid>(
        &self,
        profile: &mut PlayerProfile,
        request: &SacrificeRequest,
        grid: &mut G,
        rng: &mut dyn RandomSource,
        ids: &mut dyn IdSource,
    ) -> AltarResult<SacrificeOutcome> {
        if request.action != START_SACRIFICE_ACTION {
            return Err(AltarError::InvalidRequest(format!(
                "unexpected action {}",
                request.action
            )));
        }
        let stash_id = profile
            .inventory
            .area_stash(area::CIRCLE_OF_CULTISTS)
            .cloned()
            .ok_or(AltarError::AreaStashMissing(area::CIRCLE_OF_CULTISTS))?;
        let recipe = self
            .hideout
            .cultist_recipe()
            .ok_or_else(|| AltarError::RecipeNotFound("circle of cultists".to_string()))?;

        let slot_id = self.config.sacrifice_slot_id.as_str();
        let sacrificed = extract_sacrificed_items(&profile.inventory, slot_id);
        let value = sacrificed_value(self.items, &sacrificed);

        // TODO: scale the multiplier with the hideout management skill level
        let range = self.config.reward_price_multiplier;
        let multiplier = rng.float_between(range.min, range.max);
        let budget = reward_budget(value, multiplier);

        let mut output = ItemEventOutput::new();

        let production = Production {
            recipe_id: recipe.id.clone(),
            start_timestamp: request.timestamp,
            production_time: recipe.production_time,
            progress: 0,
            in_progress: true,
            given_items: sacrificed.clone(),
        };
        profile
            .hideout
            .production
            .insert(recipe.id.clone(), production.clone());
        output.production = Some(production);

        remove_sacrificed(&mut profile.inventory, &sacrificed, slot_id, &mut output)?;

        let pool = build_reward_pool(profile, self.hideout);
        tracing::info!("Reward pool item count: {}", pool.len());

        let selection =
            RewardSelector::new(self.config, self.items).select(&pool, budget, &stash_id, rng, ids);
        let stop_reason = selection.stop_reason;
        if let Some(message) = selection.abort_message() {
            output.warn(message);
        }

        let fit = place_rewards(
            grid,
            selection.rewards,
            self.items,
            &stash_id,
            slot_id,
            &mut profile.inventory,
            &mut output,
        )?;

        Ok(SacrificeOutcome {
            output,
            sacrificed_value: value,
            multiplier,
            budget,
            pool_size: pool.len(),
            stop_reason,
            fit,
        })
    }
}
