//! # Item Trees
//!
//! Items are stored flat. Structure comes from each node's `parent_id` and
//! `slot_id`: a weapon owns its magazine because the magazine's parent is the
//! weapon's id. A root is either parent-less or parented to a container.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AltarError, AltarResult};

/// Unique identifier of a single item instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Identifier of an item template: what kind of item an instance is.
///
/// Opaque to this crate. Whether a template is a weapon, ammo or anything
/// else is answered by an [`ItemCatalog`](crate::catalog::ItemCatalog).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Wraps a raw template identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TemplateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Mutable per-instance state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpd {
    /// Number of units in the stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_objects_count: Option<u32>,
    /// Item was created during the current session.
    #[serde(default)]
    pub spawned_in_session: bool,
}

/// Position of a root item inside a container grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLocation {
    /// Column of the top-left cell.
    pub x: u32,
    /// Row of the top-left cell.
    pub y: u32,
    /// Item is rotated by 90 degrees.
    #[serde(default)]
    pub rotated: bool,
}

/// One node of an item tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique instance id.
    pub id: ItemId,
    /// Template this instance was made from.
    pub tpl: TemplateId,
    /// Owning item or container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
    /// Slot within the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    /// Grid position, for items sitting in a grid slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ItemLocation>,
    /// Stack and session state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upd: Option<ItemUpd>,
}

impl ItemInstance {
    /// Creates a parent-less node with no metadata.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, tpl: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: None,
            slot_id: None,
            location: None,
            upd: None,
        }
    }

    /// Sets the parent and slot.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<ItemId>, slot_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self.slot_id = Some(slot_id.into());
        self
    }

    /// Sets the stack size.
    #[must_use]
    pub fn with_stack(mut self, count: u32) -> Self {
        self.upd.get_or_insert_with(ItemUpd::default).stack_objects_count = Some(count);
        self
    }

    /// Returns the stack size, treating a missing count as one unit.
    #[must_use]
    pub fn stack_count(&self) -> u32 {
        self.upd
            .as_ref()
            .and_then(|upd| upd.stack_objects_count)
            .unwrap_or(1)
    }

    /// Checks whether this node sits directly in the given slot.
    #[inline]
    #[must_use]
    pub fn is_in_slot(&self, slot_id: &str) -> bool {
        self.slot_id.as_deref() == Some(slot_id)
    }
}

/// One reward unit: a single item, or a root item plus its attachments.
///
/// The first node is always the group root. Deserialization goes through
/// [`RewardGroup::from_tree`], so an empty list or a forest is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemInstance>", into = "Vec<ItemInstance>")]
pub struct RewardGroup {
    items: Vec<ItemInstance>,
}

impl RewardGroup {
    /// Creates a group holding one item.
    #[must_use]
    pub fn single(item: ItemInstance) -> Self {
        Self { items: vec![item] }
    }

    /// Creates a group from a tree, moving its root to the front.
    ///
    /// The root is the one node whose parent is not inside the tree.
    /// Returns `None` for an empty list or when the tree has no unique root.
    #[must_use]
    pub fn from_tree(mut items: Vec<ItemInstance>) -> Option<Self> {
        let root_index = {
            let ids: HashSet<&ItemId> = items.iter().map(|item| &item.id).collect();
            let mut roots = items.iter().enumerate().filter(|(_, item)| {
                item.parent_id
                    .as_ref()
                    .filter(|parent| ids.contains(parent))
                    .is_none()
            });

            let (root_index, _) = roots.next()?;
            if roots.next().is_some() {
                return None;
            }
            root_index
        };

        items.swap(0, root_index);
        Some(Self { items })
    }

    /// Returns the root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &ItemInstance {
        &self.items[0]
    }

    /// Returns the root node mutably.
    #[inline]
    pub fn root_mut(&mut self) -> &mut ItemInstance {
        &mut self.items[0]
    }

    /// All nodes, root first.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    /// Number of nodes in the group.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: a group holds at least its root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the group, yielding its nodes.
    #[must_use]
    pub fn into_items(self) -> Vec<ItemInstance> {
        self.items
    }
}

impl TryFrom<Vec<ItemInstance>> for RewardGroup {
    type Error = AltarError;

    fn try_from(items: Vec<ItemInstance>) -> AltarResult<Self> {
        Self::from_tree(items).ok_or_else(|| {
            AltarError::InvalidRequest("reward group is not a single item tree".to_string())
        })
    }
}

impl From<RewardGroup> for Vec<ItemInstance> {
    fn from(group: RewardGroup) -> Self {
        group.items
    }
}

/// Returns the item with `root_id` followed by all of its descendants.
///
/// Order is breadth-first from the root. An unknown `root_id` yields an
/// empty list.
#[must_use]
pub fn find_with_children(items: &[ItemInstance], root_id: &ItemId) -> Vec<ItemInstance> {
    let Some(root) = items.iter().find(|item| &item.id == root_id) else {
        return Vec::new();
    };

    let mut children_of: HashMap<&ItemId, Vec<&ItemInstance>> = HashMap::new();
    for item in items {
        if let Some(parent) = &item.parent_id {
            children_of.entry(parent).or_default().push(item);
        }
    }

    let mut found = vec![root.clone()];
    let mut cursor = 0;
    while cursor < found.len() {
        if let Some(children) = children_of.get(&found[cursor].id) {
            found.extend(children.iter().map(|child| (*child).clone()));
        }
        cursor += 1;
    }

    found
}
