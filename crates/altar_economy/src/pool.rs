//! # Reward Pool
//!
//! The set of templates a sacrifice can pay out: everything the player
//! still needs to upgrade hideout areas or to start the crafts they have
//! access to. Built fresh for every sacrifice and thrown away afterwards.
//!
//! ## Sources
//!
//! ```text
//! next stage of every area ──────────────┐
//! unlocked or never-locked recipes ──────┼──► item requirements ──► set
//! scav-case crafts (scav case built) ────┘
//! ```

use std::collections::BTreeSet;

use crate::hideout::{area, item_requirements, HideoutCatalog};
use crate::item::TemplateId;
use crate::profile::PlayerProfile;
use crate::random::RandomSource;

/// Deduplicated templates a reward can be drawn from.
///
/// Kept sorted so a seeded random source reproduces the same draws.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardPool {
    templates: Vec<TemplateId>,
}

impl RewardPool {
    /// Builds a pool from any collection, collapsing duplicates.
    #[must_use]
    pub fn from_templates(templates: impl IntoIterator<Item = TemplateId>) -> Self {
        let unique: BTreeSet<TemplateId> = templates.into_iter().collect();
        Self {
            templates: unique.into_iter().collect(),
        }
    }

    /// Number of distinct templates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Checks if nothing can be drawn.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Checks membership.
    #[must_use]
    pub fn contains(&self, tpl: &TemplateId) -> bool {
        self.templates.binary_search(tpl).is_ok()
    }

    /// All templates, sorted.
    #[must_use]
    pub fn templates(&self) -> &[TemplateId] {
        &self.templates
    }

    /// Draws one template uniformly. The pool is left unchanged.
    pub fn draw(&self, rng: &mut dyn RandomSource) -> Option<&TemplateId> {
        let index = rng.pick_index(self.templates.len())?;
        self.templates.get(index)
    }
}

/// Collects every template the player currently needs.
#[must_use]
pub fn build_reward_pool(profile: &PlayerProfile, hideout: &impl HideoutCatalog) -> RewardPool {
    let mut pool = BTreeSet::new();

    // Next upgrade of every area
    for progress in &profile.hideout.areas {
        let Some(definition) = hideout.area(progress.area_type) else {
            tracing::debug!("Hideout area {} missing from catalog, skipping", progress.area_type);
            continue;
        };
        if let Some(stage) = definition.next_stage(progress.level) {
            pool.extend(item_requirements(&stage.requirements).cloned());
        }
    }

    // Default-unlocked recipes plus the locked ones the player has unlocked
    let accessible = hideout
        .recipes()
        .iter()
        .filter(|recipe| !recipe.locked || profile.unlocked_recipes.contains(&recipe.id));
    for recipe in accessible {
        pool.extend(item_requirements(&recipe.requirements).cloned());
    }

    // Scav case inputs, once the scav case is built
    let scav_case_built = profile
        .hideout
        .area_level(area::SCAV_CASE)
        .is_some_and(|level| level > 0);
    if scav_case_built {
        for craft in hideout.scav_case_recipes() {
            pool.extend(item_requirements(&craft.requirements).cloned());
        }
    }

    RewardPool {
        templates: pool.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hideout::{
        AreaDefinition, AreaStage, HideoutDatabase, ProductionRecipe, Requirement, ScavCaseRecipe,
    };
    use crate::profile::AreaProgress;

    fn item(tpl: &str) -> Requirement {
        Requirement::Item {
            template_id: tpl.into(),
            count: 1,
        }
    }

    fn hideout() -> HideoutDatabase {
        HideoutDatabase {
            areas: vec![
                AreaDefinition {
                    area_type: 3,
                    stages: vec![
                        AreaStage { level: 1, requirements: vec![item("bolts"), item("nuts")] },
                        AreaStage { level: 2, requirements: vec![item("wires")] },
                    ],
                },
                AreaDefinition {
                    area_type: area::SCAV_CASE,
                    stages: vec![AreaStage { level: 1, requirements: vec![item("bolts")] }],
                },
            ],
            recipes: vec![
                ProductionRecipe {
                    id: "open".to_string(),
                    locked: false,
                    requirements: vec![item("sugar"), Requirement::Tool { template_id: "pliers".into() }],
                },
                ProductionRecipe {
                    id: "secret".to_string(),
                    locked: true,
                    requirements: vec![item("gpu")],
                },
            ],
            scav_case: vec![ScavCaseRecipe {
                id: "moonshine_case".to_string(),
                requirements: vec![item("moonshine"), item("sugar")],
            }],
            cultist_recipes: Vec::new(),
        }
    }

    fn profile(levels: &[(u32, u32)]) -> PlayerProfile {
        let mut profile = PlayerProfile::default();
        profile.hideout.areas = levels
            .iter()
            .map(|&(area_type, level)| AreaProgress { area_type, level })
            .collect();
        profile
    }

    fn names(pool: &RewardPool) -> Vec<&str> {
        pool.templates().iter().map(TemplateId::as_str).collect()
    }

    #[test]
    fn test_next_stage_and_open_recipes() {
        let pool = build_reward_pool(&profile(&[(3, 1), (area::SCAV_CASE, 0)]), &hideout());
        // Area 3 at level 1 needs level 2 items, scav case at 0 needs level 1 items
        assert_eq!(names(&pool), vec!["bolts", "sugar", "wires"]);
    }

    #[test]
    fn test_unlocked_recipe_joins_pool() {
        let mut player = profile(&[]);
        player.unlocked_recipes.insert("secret".to_string());

        let pool = build_reward_pool(&player, &hideout());
        assert!(pool.contains(&"gpu".into()));
        assert!(!pool.contains(&"pliers".into()));
    }

    #[test]
    fn test_scav_case_crafts_need_built_scav_case() {
        let without = build_reward_pool(&profile(&[]), &hideout());
        assert!(!without.contains(&"moonshine".into()));

        let with = build_reward_pool(&profile(&[(area::SCAV_CASE, 1)]), &hideout());
        assert!(with.contains(&"moonshine".into()));
    }

    #[test]
    fn test_duplicate_sources_collapse() {
        // bolts comes from area 3 and the scav case stage, sugar from a recipe and the scav case
        let pool = build_reward_pool(&profile(&[(3, 0), (area::SCAV_CASE, 0)]), &hideout());
        assert_eq!(names(&pool), vec!["bolts", "nuts", "sugar"]);

        let from_list = RewardPool::from_templates(["a".into(), "b".into(), "a".into()]);
        assert_eq!(from_list.len(), 2);
    }

    #[test]
    fn test_maxed_out_player_gets_empty_pool() {
        let mut catalog = hideout();
        catalog.recipes.clear();
        let pool = build_reward_pool(&profile(&[(3, 2), (99, 4)]), &catalog);
        assert!(pool.is_empty());
    }
}
