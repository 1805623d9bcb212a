//! # Altar Configuration
//!
//! Loaded once from TOML before the first sacrifice and then passed around
//! by value. Nothing reads configuration from global state.
//!
//! ```toml
//! [cultist_circle]
//! reward_price_multiplier = { min = 1.1, max = 1.4 }
//! max_reward_item_count = 5
//! max_attempts_to_pick_rewards_within_budget = 50
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AltarError, AltarResult};

/// Slot the sacrifice grid exposes to the client.
pub const CIRCLE_OF_CULTIST_SLOT_ID: &str = "CircleOfCultistsGrid1";

/// Inclusive float range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Circle reward tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultistCircleConfig {
    /// Range the reward multiplier is drawn from, once per sacrifice.
    pub reward_price_multiplier: MinMax,
    /// Most rewards a single sacrifice can grant.
    pub max_reward_item_count: u32,
    /// Failed draws tolerated before generation gives up.
    pub max_attempts_to_pick_rewards_within_budget: u32,
    /// Slot the sacrifice and the rewards sit in.
    pub sacrifice_slot_id: String,
    /// A weapon or armor draw also grants a bare copy of its base item.
    pub grant_preset_base_item: bool,
}

impl Default for CultistCircleConfig {
    fn default() -> Self {
        Self {
            reward_price_multiplier: MinMax { min: 1.1, max: 1.4 },
            max_reward_item_count: 5,
            max_attempts_to_pick_rewards_within_budget: 50,
            sacrifice_slot_id: CIRCLE_OF_CULTIST_SLOT_ID.to_string(),
            grant_preset_base_item: true,
        }
    }
}

impl CultistCircleConfig {
    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::InvalidConfig` for a negative, non-finite or
    /// inverted multiplier range, or an empty slot id.
    pub fn validate(&self) -> AltarResult<()> {
        let MinMax { min, max } = self.reward_price_multiplier;
        if !min.is_finite() || !max.is_finite() {
            return Err(AltarError::InvalidConfig(
                "reward multiplier bounds must be finite".to_string(),
            ));
        }
        if min < 0.0 {
            return Err(AltarError::InvalidConfig(format!(
                "reward multiplier min {min} is negative"
            )));
        }
        if min > max {
            return Err(AltarError::InvalidConfig(format!(
                "reward multiplier min {min} exceeds max {max}"
            )));
        }
        if self.sacrifice_slot_id.is_empty() {
            return Err(AltarError::InvalidConfig(
                "sacrifice slot id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltarConfig {
    /// Circle of cultists settings.
    pub cultist_circle: CultistCircleConfig,
}

impl AltarConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::InvalidConfig` if the text does not parse or
    /// fails validation.
    pub fn from_toml_str(text: &str) -> AltarResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AltarError::InvalidConfig(e.to_string()))?;
        config.cultist_circle.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::ConfigRead` if the file cannot be read, or the
    /// errors of [`AltarConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> AltarResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AltarError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AltarConfig::from_toml_str("").unwrap();
        assert_eq!(config, AltarConfig::default());
        assert_eq!(config.cultist_circle.sacrifice_slot_id, CIRCLE_OF_CULTIST_SLOT_ID);
        assert!(config.cultist_circle.grant_preset_base_item);
    }

    #[test]
    fn test_partial_override() {
        let config = AltarConfig::from_toml_str(
            r"
            [cultist_circle]
            reward_price_multiplier = { min = 0.8, max = 2.0 }
            max_reward_item_count = 12
            grant_preset_base_item = false
            ",
        )
        .unwrap();

        let circle = config.cultist_circle;
        assert_eq!(circle.reward_price_multiplier, MinMax { min: 0.8, max: 2.0 });
        assert_eq!(circle.max_reward_item_count, 12);
        assert_eq!(circle.max_attempts_to_pick_rewards_within_budget, 50);
        assert!(!circle.grant_preset_base_item);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = AltarConfig::from_toml_str(
            r"
            [cultist_circle]
            reward_price_multiplier = { min = 2.0, max = 1.0 }
            ",
        );
        assert!(matches!(result, Err(AltarError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let mut circle = CultistCircleConfig::default();
        circle.reward_price_multiplier.min = -1.0;
        assert!(circle.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = AltarConfig::load("/definitely/not/here/altar.toml");
        assert!(matches!(result, Err(AltarError::ConfigRead { .. })));
    }
}
