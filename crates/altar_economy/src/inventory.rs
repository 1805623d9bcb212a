//! # Inventory
//!
//! A profile's items as one flat list, plus the stash item that backs each
//! hideout area. Removing an item always removes its whole subtree.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{AltarError, AltarResult};
use crate::hideout::AreaType;
use crate::item::{find_with_children, ItemId, ItemInstance};

/// A player's items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Every item the player owns, in no particular order.
    #[serde(default)]
    items: Vec<ItemInstance>,
    /// Stash item id backing each hideout area.
    #[serde(default)]
    hideout_area_stashes: HashMap<AreaType, ItemId>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All items.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the inventory holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&ItemInstance> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Appends items.
    pub fn extend(&mut self, items: impl IntoIterator<Item = ItemInstance>) {
        self.items.extend(items);
    }

    /// Returns the item and all of its descendants, root first.
    #[must_use]
    pub fn find_with_children(&self, root_id: &ItemId) -> Vec<ItemInstance> {
        find_with_children(&self.items, root_id)
    }

    /// Removes an item together with its subtree.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::ItemNotFound` if no item has `id`.
    pub fn remove_item(&mut self, id: &ItemId) -> AltarResult<Vec<ItemInstance>> {
        let removed = self.find_with_children(id);
        if removed.is_empty() {
            return Err(AltarError::ItemNotFound(id.to_string()));
        }

        let doomed: HashSet<&ItemId> = removed.iter().map(|item| &item.id).collect();
        self.items.retain(|item| !doomed.contains(&item.id));
        drop(doomed);
        Ok(removed)
    }

    /// Stash item id backing an area.
    #[must_use]
    pub fn area_stash(&self, area_type: AreaType) -> Option<&ItemId> {
        self.hideout_area_stashes.get(&area_type)
    }

    /// Registers the stash item id backing an area.
    pub fn set_area_stash(&mut self, area_type: AreaType, stash_id: ItemId) {
        self.hideout_area_stashes.insert(area_type, stash_id);
    }
}
