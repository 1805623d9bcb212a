//! # Preset Expansion
//!
//! Weapons and slotted armor are paid out fully assembled. The template's
//! default preset is copied node by node under fresh ids so the stored
//! preset is never aliased, and the copy's root is hung on the destination
//! container.

use std::collections::HashMap;

use crate::catalog::PresetCatalog;
use crate::ids::IdSource;
use crate::item::{ItemId, ItemInstance, RewardGroup, TemplateId};

/// Copies `items` giving every node a fresh id.
///
/// Parent links between nodes of the tree follow the new ids. Links that
/// point outside the tree are kept as they are.
#[must_use]
pub fn replace_ids(items: &[ItemInstance], ids: &mut dyn IdSource) -> Vec<ItemInstance> {
    let remap: HashMap<&ItemId, ItemId> = items.iter().map(|item| (&item.id, ids.next_id())).collect();

    items
        .iter()
        .map(|item| {
            let mut copy = item.clone();
            if let Some(new_id) = remap.get(&item.id) {
                copy.id = new_id.clone();
            }
            if let Some(new_parent) = item.parent_id.as_ref().and_then(|parent| remap.get(parent)) {
                copy.parent_id = Some(new_parent.clone());
            }
            copy
        })
        .collect()
}

/// Expands `tpl` into a copy of its default preset.
///
/// The copy's root is parented to `parent_id` in `slot_id`. Returns `None`
/// when the template has no default preset.
pub fn expand_default_preset(
    presets: &impl PresetCatalog,
    tpl: &TemplateId,
    ids: &mut dyn IdSource,
    parent_id: &ItemId,
    slot_id: &str,
) -> Option<RewardGroup> {
    let preset = presets.default_preset(tpl)?;
    let mut group = RewardGroup::from_tree(replace_ids(preset, ids))?;

    let root = group.root_mut();
    root.parent_id = Some(parent_id.clone());
    root.slot_id = Some(slot_id.to_string());
    root.location = None;

    Some(group)
}
