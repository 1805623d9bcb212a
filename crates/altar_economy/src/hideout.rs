//! # Hideout Catalog
//!
//! Area upgrade stages, production recipes and scav-case crafts, plus the
//! recipe that backs a circle sacrifice. Each lists requirements of several
//! kinds; the altar only ever looks at the item requirements.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AltarError, AltarResult};
use crate::item::TemplateId;

/// Hideout area type. The set of areas is defined by the catalog.
pub type AreaType = u32;

/// Area types the altar needs by name.
pub mod area {
    use super::AreaType;

    /// Scav case.
    pub const SCAV_CASE: AreaType = 14;
    /// Circle of cultists.
    pub const CIRCLE_OF_CULTISTS: AreaType = 27;
}

/// One requirement of a stage, recipe or craft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Requirement {
    /// Consumes items of a template.
    Item {
        /// Template required.
        template_id: TemplateId,
        /// Units required.
        #[serde(default = "one")]
        count: u32,
    },
    /// Needs a tool that is returned afterwards.
    Tool {
        /// Template required.
        template_id: TemplateId,
    },
    /// Needs another area at a given level.
    Area {
        /// Area required.
        area_type: AreaType,
        /// Minimum level.
        required_level: u32,
    },
    /// Any requirement kind the altar ignores.
    #[serde(other)]
    Other,
}

const fn one() -> u32 {
    1
}

/// Iterates the templates of the item requirements in `requirements`.
pub fn item_requirements(requirements: &[Requirement]) -> impl Iterator<Item = &TemplateId> {
    requirements.iter().filter_map(|requirement| match requirement {
        Requirement::Item { template_id, .. } => Some(template_id),
        _ => None,
    })
}

/// One upgrade stage of an area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaStage {
    /// Level this stage brings the area to.
    pub level: u32,
    /// What the upgrade costs.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// Static definition of a hideout area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDefinition {
    /// Area type.
    pub area_type: AreaType,
    /// All stages.
    #[serde(default)]
    pub stages: Vec<AreaStage>,
}

impl AreaDefinition {
    /// Returns the stage that follows `current_level`, if any.
    #[must_use]
    pub fn next_stage(&self, current_level: u32) -> Option<&AreaStage> {
        let next_level = current_level.checked_add(1)?;
        self.stages.iter().find(|stage| stage.level == next_level)
    }
}

/// A production recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecipe {
    /// Recipe id.
    pub id: String,
    /// Needs an explicit unlock before it can be used.
    #[serde(default)]
    pub locked: bool,
    /// Inputs and conditions.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// A scav-case craft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScavCaseRecipe {
    /// Craft id.
    pub id: String,
    /// Items used to start the craft.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// The production a circle sacrifice registers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultistRecipe {
    /// Recipe id.
    pub id: String,
    /// Seconds until the rewards are ready.
    #[serde(default)]
    pub production_time: u64,
}

/// Read-only hideout catalog.
pub trait HideoutCatalog {
    /// Looks up an area definition.
    fn area(&self, area_type: AreaType) -> Option<&AreaDefinition>;

    /// All production recipes.
    fn recipes(&self) -> &[ProductionRecipe];

    /// All scav-case crafts.
    fn scav_case_recipes(&self) -> &[ScavCaseRecipe];

    /// The recipe a sacrifice registers.
    fn cultist_recipe(&self) -> Option<&CultistRecipe>;
}

/// In-memory hideout catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideoutDatabase {
    /// Area definitions.
    #[serde(default)]
    pub areas: Vec<AreaDefinition>,
    /// Production recipes.
    #[serde(default)]
    pub recipes: Vec<ProductionRecipe>,
    /// Scav-case crafts.
    #[serde(default)]
    pub scav_case: Vec<ScavCaseRecipe>,
    /// Circle recipes. Only the first is used.
    #[serde(default)]
    pub cultist_recipes: Vec<CultistRecipe>,
}

impl HideoutDatabase {
    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::InvalidConfig` on malformed TOML.
    pub fn from_toml_str(text: &str) -> AltarResult<Self> {
        toml::from_str(text).map_err(|e| AltarError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::ConfigRead` if the file cannot be read, or
    /// `AltarError::InvalidConfig` if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> AltarResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AltarError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

impl HideoutCatalog for HideoutDatabase {
    fn area(&self, area_type: AreaType) -> Option<&AreaDefinition> {
        self.areas.iter().find(|area| area.area_type == area_type)
    }

    fn recipes(&self) -> &[ProductionRecipe] {
        &self.recipes
    }

    fn scav_case_recipes(&self) -> &[ScavCaseRecipe] {
        &self.scav_case
    }

    fn cultist_recipe(&self) -> Option<&CultistRecipe> {
        self.cultist_recipes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDEOUT: &str = r#"
        [[areas]]
        area_type = 3
        [[areas.stages]]
        level = 1
        requirements = [
            { type = "Item", template_id = "bolts", count = 5 },
            { type = "Skill", skill_name = "Endurance", skill_level = 2 },
        ]
        [[areas.stages]]
        level = 2
        requirements = [{ type = "Area", area_type = 14, required_level = 1 }]

        [[recipes]]
        id = "moonshine"
        locked = true
        requirements = [{ type = "Tool", template_id = "screwdriver" }]

        [[cultist_recipes]]
        id = "circle"
        production_time = 3600
    "#;

    #[test]
    fn test_parse_requirements_and_ignore_unknown_kinds() {
        let db = HideoutDatabase::from_toml_str(HIDEOUT).unwrap();
        let area = db.area(3).unwrap();

        let stage = area.next_stage(0).unwrap();
        assert_eq!(stage.requirements.len(), 2);
        assert_eq!(stage.requirements[1], Requirement::Other);

        let items: Vec<&TemplateId> = item_requirements(&stage.requirements).collect();
        assert_eq!(items, vec![&TemplateId::from("bolts")]);
    }

    #[test]
    fn test_next_stage_past_max_level() {
        let db = HideoutDatabase::from_toml_str(HIDEOUT).unwrap();
        let area = db.area(3).unwrap();

        assert!(area.next_stage(1).is_some());
        assert!(area.next_stage(2).is_none());
        assert!(area.next_stage(u32::MAX).is_none());
    }

    #[test]
    fn test_tool_requirements_are_not_items() {
        let db = HideoutDatabase::from_toml_str(HIDEOUT).unwrap();
        let recipe = &db.recipes()[0];
        assert!(recipe.locked);
        assert_eq!(item_requirements(&recipe.requirements).count(), 0);
    }

    #[test]
    fn test_cultist_recipe_lookup() {
        let db = HideoutDatabase::from_toml_str(HIDEOUT).unwrap();
        assert_eq!(db.cultist_recipe().unwrap().production_time, 3600);
        assert!(HideoutDatabase::default().cultist_recipe().is_none());
    }
}
