//! # Sacrifice Extraction
//!
//! Finds what the player put on the altar and turns it into a budget.

use crate::catalog::ItemCatalog;
use crate::error::AltarResult;
use crate::inventory::Inventory;
use crate::item::{find_with_children, ItemInstance};
use crate::output::ItemEventOutput;

/// Returns every item in `slot_id` together with its attachments.
///
/// Roots come in inventory order, each followed by its own subtree. Read
/// only: calling it twice on the same inventory gives the same list.
#[must_use]
pub fn extract_sacrificed_items(inventory: &Inventory, slot_id: &str) -> Vec<ItemInstance> {
    let items = inventory.items();
    items
        .iter()
        .filter(|item| item.is_in_slot(slot_id))
        .flat_map(|root| find_with_children(items, &root.id))
        .collect()
}

/// Sums the prices of `items`. Unpriced items count as zero.
#[must_use]
pub fn sacrificed_value(catalog: &impl ItemCatalog, items: &[ItemInstance]) -> u64 {
    items
        .iter()
        .map(|item| catalog.price(&item.tpl).unwrap_or(0))
        .fold(0u64, u64::saturating_add)
}

/// Rouble budget for a sacrifice worth `value`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reward_budget(value: u64, multiplier: f64) -> f64 {
    value as f64 * multiplier
}

/// Removes the roots of `sacrificed` that sit in `slot_id`, subtrees
/// included, and reports every removed id in `output`.
///
/// # Errors
///
/// Returns `AltarError::ItemNotFound` if a root vanished from the inventory
/// after extraction.
pub fn remove_sacrificed(
    inventory: &mut Inventory,
    sacrificed: &[ItemInstance],
    slot_id: &str,
    output: &mut ItemEventOutput,
) -> AltarResult<()> {
    for root in sacrificed.iter().filter(|item| item.is_in_slot(slot_id)) {
        let removed = inventory.remove_item(&root.id)?;
        output.removed_items.extend(removed.into_iter().map(|item| item.id));
    }
    Ok(())
}
