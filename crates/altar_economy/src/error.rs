//! # Altar Error Types
//!
//! All errors that can cross the altar economy boundary.
//!
//! Generation problems (missing presets, missing prices, exhausted retries,
//! rewards that do not fit) are NOT errors: they degrade into a zero or
//! partial reward outcome. Only request rejection and configuration problems
//! surface here.

use thiserror::Error;

/// Errors that can occur in the altar economy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AltarError {
    /// Request was malformed or named an action this service does not handle.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Profile has no stash item registered for the hideout area.
    #[error("no stash registered for hideout area {0}")]
    AreaStashMissing(u32),

    /// Hideout catalog has no recipe backing the sacrifice.
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// Item id not present in the inventory.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The container accepted every group during the dry run but rejected
    /// one while committing.
    #[error("placement diverged from dry run at reward group {index}")]
    PlacementDiverged {
        /// Index of the group that could not be committed.
        index: usize,
    },

    /// Invalid configuration file or catalog data.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read {path}: {reason}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying IO error message.
        reason: String,
    },
}

/// Result type for altar operations.
pub type AltarResult<T> = Result<T, AltarError>;
