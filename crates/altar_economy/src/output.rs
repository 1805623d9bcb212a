//! # Event Output
//!
//! The delta a single request reports back to its caller: what appeared,
//! what disappeared, which production started and anything that went wrong
//! along the way without failing the request.

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, ItemInstance};
use crate::profile::Production;

/// Changes made to a profile by one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEventOutput {
    /// Items added to the inventory.
    #[serde(default)]
    pub new_items: Vec<ItemInstance>,
    /// Ids of items removed from the inventory.
    #[serde(default)]
    pub removed_items: Vec<ItemId>,
    /// Production registered by the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<Production>,
    /// Non-fatal diagnostics for the caller.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ItemEventOutput {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
