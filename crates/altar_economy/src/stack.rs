//! # Reward Stack Sizes
//!
//! Ammunition is paid out as a random stack between the template's random
//! stack bounds. Everything else is a single unit.

use crate::catalog::{base_class, ItemCatalog};
use crate::item::TemplateId;
use crate::random::RandomSource;

/// Returns how many units a reward of `tpl` should stack to.
///
/// Always at least 1. Unknown ammo templates fall back to 1.
#[must_use]
pub fn reward_stack_size(
    catalog: &impl ItemCatalog,
    tpl: &TemplateId,
    rng: &mut dyn RandomSource,
) -> u32 {
    if !catalog.is_of_base_class(tpl, base_class::AMMO) {
        return 1;
    }

    catalog
        .ammo_stack_bounds(tpl)
        .map_or(1, |bounds| rng.int_between(bounds.min, bounds.max).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ExtraSize, ItemDatabase, ItemTemplate};
    use crate::random::ChaChaRandom;

    fn template(
        id: &str,
        parents: &[&str],
        max: u32,
        min_random: Option<u32>,
        max_random: Option<u32>,
    ) -> ItemTemplate {
        ItemTemplate {
            id: id.into(),
            parents: parents.iter().map(|&p| p.into()).collect(),
            price: None,
            stack_max_size: max,
            stack_min_random: min_random,
            stack_max_random: max_random,
            width: 1,
            height: 1,
            armor_insert_slots: false,
            extra_size: ExtraSize::default(),
        }
    }

    fn catalog() -> ItemDatabase {
        let mut db = ItemDatabase::new();
        db.insert_template(template("762bp", &[base_class::AMMO], 40, Some(10), Some(30)));
        db.insert_template(template("flare", &[base_class::AMMO], 1, None, None));
        // Stackable but not ammo
        db.insert_template(template("bolts", &["barter"], 100, Some(5), Some(50)));
        db
    }

    #[test]
    fn test_ammo_stack_within_bounds() {
        let db = catalog();
        let mut rng = ChaChaRandom::from_seed(11);

        for _ in 0..1_000 {
            let size = reward_stack_size(&db, &"762bp".into(), &mut rng);
            assert!((10..=30).contains(&size), "stack {size} outside [10, 30]");
        }
    }

    #[test]
    fn test_non_ammo_is_single_unit() {
        let db = catalog();
        let mut rng = ChaChaRandom::from_seed(11);

        for _ in 0..100 {
            assert_eq!(reward_stack_size(&db, &"bolts".into(), &mut rng), 1);
            assert_eq!(reward_stack_size(&db, &"unknown".into(), &mut rng), 1);
        }
    }

    #[test]
    fn test_unstackable_ammo_is_single_unit() {
        let db = catalog();
        let mut rng = ChaChaRandom::from_seed(11);
        assert_eq!(reward_stack_size(&db, &"flare".into(), &mut rng), 1);
    }
}
