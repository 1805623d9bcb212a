//! # Player Profile
//!
//! The slice of a player's profile the altar reads and mutates: inventory,
//! hideout progression, running productions and unlocked recipes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::hideout::AreaType;
use crate::inventory::Inventory;
use crate::item::ItemInstance;

/// Current level of one hideout area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaProgress {
    /// Area type.
    pub area_type: AreaType,
    /// Built level, 0 for not built.
    pub level: u32,
}

/// A production running in the hideout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    /// Recipe being produced.
    pub recipe_id: String,
    /// Unix seconds when the production started.
    pub start_timestamp: u64,
    /// Seconds the production takes.
    pub production_time: u64,
    /// Seconds of progress made.
    pub progress: u64,
    /// Still running.
    pub in_progress: bool,
    /// Items consumed to start the production.
    #[serde(default)]
    pub given_items: Vec<ItemInstance>,
}

/// Hideout state of a profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideoutState {
    /// Level of every area the player has.
    #[serde(default)]
    pub areas: Vec<AreaProgress>,
    /// Running productions keyed by recipe id.
    #[serde(default)]
    pub production: HashMap<String, Production>,
}

impl HideoutState {
    /// Level of an area, or `None` if the profile does not track it.
    #[must_use]
    pub fn area_level(&self, area_type: AreaType) -> Option<u32> {
        self.areas
            .iter()
            .find(|area| area.area_type == area_type)
            .map(|area| area.level)
    }
}

/// The parts of a profile the altar works on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Items.
    #[serde(default)]
    pub inventory: Inventory,
    /// Hideout progression.
    #[serde(default)]
    pub hideout: HideoutState,
    /// Locked recipes the player has unlocked.
    #[serde(default)]
    pub unlocked_recipes: HashSet<String>,
}
