//! # Budgeted Reward Selection
//!
//! Draws rewards from the pool until the rouble budget is spent.
//!
//! ## Stop conditions
//!
//! Checked before every draw, in this order:
//!
//! 1. Running cost reached the budget (overshoot by the last draw is fine)
//! 2. Pool is empty
//! 3. Reward count reached `max_reward_item_count`
//! 4. Consecutive failed draws exceed `max_attempts_to_pick_rewards_within_budget`
//!
//! Conditions 3 and 4 bound the loop even when every price is missing.
//!
//! ## Draws
//!
//! The pool is not reduced by a draw, so a template can be paid out more
//! than once. Weapons and slotted armor expand into their default preset; a
//! missing preset is a failed draw and costs nothing. Ammo gets a random
//! stack size. Each successful draw adds one to the reward count and the
//! template's price to the running cost.

use crate::catalog::{ItemCatalog, PresetCatalog};
use crate::config::CultistCircleConfig;
use crate::ids::IdSource;
use crate::item::{ItemId, ItemInstance, ItemUpd, RewardGroup, TemplateId};
use crate::pool::RewardPool;
use crate::preset::expand_default_preset;
use crate::random::RandomSource;
use crate::stack::reward_stack_size;

/// Why selection stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Running cost met or exceeded the budget.
    BudgetReached,
    /// Nothing to draw from.
    PoolExhausted,
    /// Reward count hit the configured maximum.
    ItemLimitReached,
    /// Too many failed draws. Rewards are short of the budget.
    AttemptsExhausted,
}

/// Rewards picked for one sacrifice.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionOutcome {
    /// Reward groups in draw order.
    pub rewards: Vec<RewardGroup>,
    /// Sum of the prices charged, in roubles.
    pub total_cost: u64,
    /// Draws that produced a reward.
    pub items_rewarded: u32,
    /// Draws that produced nothing.
    pub failed_attempts: u32,
    /// What ended the loop.
    pub stop_reason: StopReason,
}

impl SelectionOutcome {
    /// Diagnostic for a selection cut short by the retry cap.
    #[must_use]
    pub fn abort_message(&self) -> Option<String> {
        (self.stop_reason == StopReason::AttemptsExhausted).then(|| {
            format!(
                "Exiting reward generation after {} failed attempts",
                self.failed_attempts
            )
        })
    }
}

#[derive(Debug, Default)]
struct SelectionState {
    total_cost: u64,
    items_rewarded: u32,
    failed_attempts: u32,
    consecutive_failures: u32,
}

impl SelectionState {
    fn charge(&mut self, price: Option<u64>) {
        self.items_rewarded += 1;
        self.consecutive_failures = 0;
        self.total_cost = self.total_cost.saturating_add(price.unwrap_or(0));
    }

    fn fail(&mut self) {
        self.failed_attempts += 1;
        self.consecutive_failures += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn budget_reached(&self, budget: f64) -> bool {
        self.total_cost as f64 >= budget
    }
}

/// Picks rewards within a budget.
pub struct RewardSelector<'a, C> {
    config: &'a CultistCircleConfig,
    catalog: &'a C,
}

impl<'a, C: ItemCatalog + PresetCatalog> RewardSelector<'a, C> {
    /// Creates a selector.
    #[must_use]
    pub fn new(config: &'a CultistCircleConfig, catalog: &'a C) -> Self {
        Self { config, catalog }
    }

    /// Draws rewards until a stop condition holds.
    ///
    /// Every reward root is parented to `destination` in the configured
    /// sacrifice slot. Never fails: a starved pool or a run of bad draws
    /// yields fewer rewards, possibly none.
    #[must_use]
    pub fn select(
        &self,
        pool: &RewardPool,
        budget: f64,
        destination: &ItemId,
        rng: &mut dyn RandomSource,
        ids: &mut dyn IdSource,
    ) -> SelectionOutcome {
        let mut state = SelectionState::default();
        let mut rewards = Vec::new();

        let stop_reason = loop {
            if let Some(reason) = self.stop_reason(&state, pool, budget) {
                break reason;
            }

            let Some(tpl) = pool.draw(rng) else {
                break StopReason::PoolExhausted;
            };

            if self.catalog.is_composite(tpl) {
                let Some(preset) = expand_default_preset(
                    self.catalog,
                    tpl,
                    ids,
                    destination,
                    &self.config.sacrifice_slot_id,
                ) else {
                    tracing::warn!("Reward tpl: {} lacks a default preset, skipping reward", tpl);
                    state.fail();
                    continue;
                };
                rewards.push(preset);

                if !self.config.grant_preset_base_item {
                    state.charge(self.catalog.price(tpl));
                    continue;
                }
            }

            let stack_size = reward_stack_size(self.catalog, tpl, rng);
            rewards.push(self.single_reward(tpl, stack_size, destination, ids));
            state.charge(self.catalog.price(tpl));
        };

        let outcome = SelectionOutcome {
            rewards,
            total_cost: state.total_cost,
            items_rewarded: state.items_rewarded,
            failed_attempts: state.failed_attempts,
            stop_reason,
        };

        if let Some(message) = outcome.abort_message() {
            tracing::warn!("{}", message);
        }
        tracing::info!(
            "Circle will reward {} items costing a total of {} roubles",
            outcome.items_rewarded,
            outcome.total_cost
        );

        outcome
    }

    fn stop_reason(&self, state: &SelectionState, pool: &RewardPool, budget: f64) -> Option<StopReason> {
        if state.budget_reached(budget) {
            Some(StopReason::BudgetReached)
        } else if pool.is_empty() {
            Some(StopReason::PoolExhausted)
        } else if state.items_rewarded >= self.config.max_reward_item_count {
            Some(StopReason::ItemLimitReached)
        } else if state.consecutive_failures > self.config.max_attempts_to_pick_rewards_within_budget {
            Some(StopReason::AttemptsExhausted)
        } else {
            None
        }
    }

    fn single_reward(
        &self,
        tpl: &TemplateId,
        stack_size: u32,
        destination: &ItemId,
        ids: &mut dyn IdSource,
    ) -> RewardGroup {
        RewardGroup::single(ItemInstance {
            id: ids.next_id(),
            tpl: tpl.clone(),
            parent_id: Some(destination.clone()),
            slot_id: Some(self.config.sacrifice_slot_id.clone()),
            location: None,
            upd: Some(ItemUpd {
                stack_objects_count: Some(stack_size),
                spawned_in_session: true,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{base_class, ExtraSize, ItemDatabase, ItemTemplate, Preset};
    use crate::ids::ObjectIdGenerator;
    use crate::random::ChaChaRandom;

    fn template(id: &str, parents: &[&str], price: Option<u64>) -> ItemTemplate {
        ItemTemplate {
            id: id.into(),
            parents: parents.iter().map(|&p| p.into()).collect(),
            price,
            stack_max_size: 1,
            stack_min_random: None,
            stack_max_random: None,
            width: 1,
            height: 1,
            armor_insert_slots: false,
            extra_size: ExtraSize::default(),
        }
    }

    fn catalog() -> ItemDatabase {
        let mut db = ItemDatabase::new();
        db.insert_template(template("bolts", &["barter"], Some(1_000)));
        db.insert_template(template("wires", &["barter"], None));
        db.insert_template(template("mp5", &[base_class::WEAPON], Some(30_000)));
        db.insert_template(template("broken_gun", &[base_class::WEAPON], Some(5_000)));
        db.insert_template(ItemTemplate {
            stack_max_size: 50,
            stack_min_random: Some(10),
            stack_max_random: Some(40),
            ..template("9x19", &[base_class::AMMO], Some(100))
        });
        db.insert_preset(Preset {
            id: "mp5_default".to_string(),
            base: "mp5".into(),
            default: true,
            items: vec![
                ItemInstance::new("root", "mp5"),
                ItemInstance::new("mag", "mp5_mag").with_parent("root", "mod_magazine"),
            ],
        })
        .unwrap();
        db
    }

    fn config(max_items: u32, max_attempts: u32) -> CultistCircleConfig {
        CultistCircleConfig {
            max_reward_item_count: max_items,
            max_attempts_to_pick_rewards_within_budget: max_attempts,
            ..CultistCircleConfig::default()
        }
    }

    fn pool(tpls: &[&str]) -> RewardPool {
        RewardPool::from_templates(tpls.iter().map(|&t| TemplateId::from(t)))
    }

    fn run(config: &CultistCircleConfig, pool: &RewardPool, budget: f64) -> SelectionOutcome {
        let db = catalog();
        let mut rng = ChaChaRandom::from_seed(99);
        let mut ids = ObjectIdGenerator::with_seed(99);
        RewardSelector::new(config, &db).select(pool, budget, &"circle".into(), &mut rng, &mut ids)
    }

    #[test]
    fn test_zero_budget_grants_nothing() {
        let outcome = run(&config(5, 10), &pool(&["bolts"]), 0.0);
        assert!(outcome.rewards.is_empty());
        assert_eq!(outcome.stop_reason, StopReason::BudgetReached);
        assert!(outcome.abort_message().is_none());
    }

    #[test]
    fn test_empty_pool_stops_immediately() {
        let outcome = run(&config(5, 10), &RewardPool::default(), 50_000.0);
        assert!(outcome.rewards.is_empty());
        assert_eq!(outcome.stop_reason, StopReason::PoolExhausted);
    }

    #[test]
    fn test_item_cap_with_single_template_pool() {
        let outcome = run(&config(5, 10), &pool(&["bolts"]), 1_000_000.0);

        assert_eq!(outcome.stop_reason, StopReason::ItemLimitReached);
        assert_eq!(outcome.rewards.len(), 5);
        assert_eq!(outcome.items_rewarded, 5);
        assert_eq!(outcome.total_cost, 5_000);
        assert!(outcome.rewards.iter().all(|g| g.len() == 1 && g.root().tpl.as_str() == "bolts"));
    }

    #[test]
    fn test_budget_overshoot_is_allowed() {
        let outcome = run(&config(10, 10), &pool(&["bolts"]), 2_500.0);

        assert_eq!(outcome.stop_reason, StopReason::BudgetReached);
        assert_eq!(outcome.items_rewarded, 3);
        assert_eq!(outcome.total_cost, 3_000);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let outcome = run(&config(4, 10), &pool(&["wires"]), 100.0);

        assert_eq!(outcome.stop_reason, StopReason::ItemLimitReached);
        assert_eq!(outcome.total_cost, 0);
        assert_eq!(outcome.rewards.len(), 4);
    }

    #[test]
    fn test_missing_preset_exhausts_attempts() {
        let outcome = run(&config(5, 3), &pool(&["broken_gun"]), 1_000_000.0);

        assert_eq!(outcome.stop_reason, StopReason::AttemptsExhausted);
        assert_eq!(outcome.failed_attempts, 4);
        assert_eq!(outcome.items_rewarded, 0);
        assert_eq!(outcome.total_cost, 0);
        assert!(outcome.rewards.is_empty());
    }

    #[test]
    fn test_weapon_draw_grants_preset_and_base_item() {
        let outcome = run(&config(1, 10), &pool(&["mp5"]), 1_000_000.0);

        assert_eq!(outcome.items_rewarded, 1);
        assert_eq!(outcome.total_cost, 30_000);
        assert_eq!(outcome.rewards.len(), 2);
        assert_eq!(outcome.rewards[0].len(), 2);
        assert_eq!(outcome.rewards[1].len(), 1);
        assert_eq!(outcome.rewards[1].root().tpl.as_str(), "mp5");
    }

    #[test]
    fn test_weapon_draw_without_base_item() {
        let mut circle = config(1, 10);
        circle.grant_preset_base_item = false;
        let outcome = run(&circle, &pool(&["mp5"]), 1_000_000.0);

        assert_eq!(outcome.items_rewarded, 1);
        assert_eq!(outcome.total_cost, 30_000);
        assert_eq!(outcome.rewards.len(), 1);
        assert_eq!(outcome.rewards[0].len(), 2);
    }

    #[test]
    fn test_rewards_parented_to_destination() {
        let outcome = run(&config(5, 10), &pool(&["bolts", "9x19", "mp5"]), 1_000_000.0);

        for group in &outcome.rewards {
            let root = group.root();
            assert_eq!(root.parent_id.as_ref().map(ItemId::as_str), Some("circle"));
            assert_eq!(root.slot_id.as_deref(), Some("CircleOfCultistsGrid1"));
        }
    }

    #[test]
    fn test_ammo_rewards_carry_random_stack() {
        let outcome = run(&config(20, 10), &pool(&["9x19"]), 1_000_000.0);

        for group in &outcome.rewards {
            let upd = group.root().upd.as_ref().unwrap();
            assert!(upd.spawned_in_session);
            let count = upd.stack_objects_count.unwrap();
            assert!((10..=40).contains(&count), "stack {count} outside [10, 40]");
        }
    }

    /// Replays fixed pool indices.
    struct Scripted {
        picks: Vec<usize>,
        cursor: usize,
    }

    impl RandomSource for Scripted {
        fn float_between(&mut self, min: f64, _max: f64) -> f64 {
            min
        }

        fn int_between(&mut self, min: u32, _max: u32) -> u32 {
            min
        }

        fn pick_index(&mut self, _len: usize) -> Option<usize> {
            let pick = self.picks.get(self.cursor).copied();
            self.cursor += 1;
            pick
        }
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let db = catalog();
        let circle = config(50, 2);
        // Sorted pool: 0 is bolts, 1 is broken_gun
        let mut rng = Scripted {
            picks: vec![1, 1, 0, 1, 1, 0, 1, 1, 1, 0],
            cursor: 0,
        };
        let mut ids = ObjectIdGenerator::with_seed(1);

        let outcome = RewardSelector::new(&circle, &db).select(
            &pool(&["bolts", "broken_gun"]),
            f64::MAX,
            &"circle".into(),
            &mut rng,
            &mut ids,
        );

        assert_eq!(outcome.stop_reason, StopReason::AttemptsExhausted);
        assert_eq!(outcome.items_rewarded, 2);
        assert_eq!(outcome.failed_attempts, 7);
        assert_eq!(
            outcome.abort_message().as_deref(),
            Some("Exiting reward generation after 7 failed attempts")
        );
    }

    #[test]
    fn test_loop_is_bounded_by_caps() {
        // Mixed pool, unreachable budget: ends on one of the caps
        for seed in 0..50 {
            let db = catalog();
            let circle = config(7, 5);
            let mut rng = ChaChaRandom::from_seed(seed);
            let mut ids = ObjectIdGenerator::with_seed(seed);
            let outcome = RewardSelector::new(&circle, &db).select(
                &pool(&["broken_gun", "wires", "mp5"]),
                f64::MAX,
                &"circle".into(),
                &mut rng,
                &mut ids,
            );

            assert!(outcome.items_rewarded <= 7);
            assert!(matches!(
                outcome.stop_reason,
                StopReason::ItemLimitReached | StopReason::AttemptsExhausted
            ));
        }
    }
}
