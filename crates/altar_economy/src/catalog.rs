//! # Item Catalog
//!
//! Read-only facts about item templates: what kind of item a template is,
//! what it costs, how it stacks, how much grid space it takes, and which
//! fully assembled preset stands for it.
//!
//! The altar only talks to the catalog through [`ItemCatalog`] and
//! [`PresetCatalog`]. Item kinds are open-ended, so classification is a
//! query (`is_of_base_class`) rather than an enum. [`ItemDatabase`] is an
//! in-memory implementation that loads from TOML.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AltarError, AltarResult};
use crate::item::{ItemInstance, RewardGroup, TemplateId};

/// Well-known base class template ids.
pub mod base_class {
    /// Every firearm.
    pub const WEAPON: &str = "5422acb9af1c889c16000029";
    /// Loose ammunition.
    pub const AMMO: &str = "5485a8684bdc2da71d8b4567";
    /// Body armor.
    pub const ARMOR: &str = "5448e54d4bdc2dcc718b4568";
}

/// Inclusive bounds for a randomized stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackBounds {
    /// Smallest stack.
    pub min: u32,
    /// Largest stack.
    pub max: u32,
}

/// Grid cells an item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl Footprint {
    /// A single cell.
    pub const UNIT: Self = Self { width: 1, height: 1 };

    /// Returns the footprint turned by 90 degrees.
    #[inline]
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Capability queries over item templates.
pub trait ItemCatalog {
    /// Checks whether `tpl` is `base_class` or descends from it.
    fn is_of_base_class(&self, tpl: &TemplateId, base_class: &str) -> bool;

    /// Checks whether `tpl` is armor with removable plates or soft inserts.
    fn armor_has_removable_or_soft_insert_slots(&self, tpl: &TemplateId) -> bool;

    /// Market price in roubles, if known.
    fn price(&self, tpl: &TemplateId) -> Option<u64>;

    /// Random stack bounds for ammunition.
    ///
    /// Returns `None` when the template is unknown.
    fn ammo_stack_bounds(&self, tpl: &TemplateId) -> Option<StackBounds>;

    /// Grid cells a bare item of this template occupies.
    fn footprint(&self, tpl: &TemplateId) -> Footprint;

    /// Grid cells an assembled item occupies, root first.
    ///
    /// Defaults to the root's own footprint. Catalogs that know how
    /// attachments stick out of their parent override this.
    fn group_footprint(&self, items: &[ItemInstance]) -> Footprint {
        items
            .first()
            .map_or(Footprint::UNIT, |root| self.footprint(&root.tpl))
    }

    /// Checks whether a draw of `tpl` should expand into a full preset.
    fn is_composite(&self, tpl: &TemplateId) -> bool {
        self.armor_has_removable_or_soft_insert_slots(tpl)
            || self.is_of_base_class(tpl, base_class::WEAPON)
    }
}

/// Lookup of canonical fully-equipped configurations.
pub trait PresetCatalog {
    /// Returns the default preset tree for `tpl`, root first.
    fn default_preset(&self, tpl: &TemplateId) -> Option<&[ItemInstance]>;
}

/// Static properties of one template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Template id.
    pub id: TemplateId,
    /// Ancestor base classes, nearest first.
    #[serde(default)]
    pub parents: Vec<TemplateId>,
    /// Market price in roubles.
    #[serde(default)]
    pub price: Option<u64>,
    /// Largest stack the item can form.
    #[serde(default = "one")]
    pub stack_max_size: u32,
    /// Lower bound for randomized stacks.
    #[serde(default)]
    pub stack_min_random: Option<u32>,
    /// Upper bound for randomized stacks.
    #[serde(default)]
    pub stack_max_random: Option<u32>,
    /// Columns occupied.
    #[serde(default = "one")]
    pub width: u32,
    /// Rows occupied.
    #[serde(default = "one")]
    pub height: u32,
    /// Armor with removable plates or soft inserts.
    #[serde(default)]
    pub armor_insert_slots: bool,
    /// Cells this item adds to the item it is attached to.
    #[serde(default)]
    pub extra_size: ExtraSize,
}

/// Cells an attachment adds around its parent, per side.
///
/// Attachments that are not forced only widen the item up to the largest
/// value any of them has on a side. Forced ones always add up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraSize {
    /// Columns added on the left.
    pub left: u32,
    /// Columns added on the right.
    pub right: u32,
    /// Rows added above.
    pub up: u32,
    /// Rows added below.
    pub down: u32,
    /// Adds on top of every other attachment instead of overlapping.
    pub force_add: bool,
}

impl ExtraSize {
    fn widest(self, other: Self) -> Self {
        Self {
            left: self.left.max(other.left),
            right: self.right.max(other.right),
            up: self.up.max(other.up),
            down: self.down.max(other.down),
            force_add: false,
        }
    }

    fn stacked(self, other: Self) -> Self {
        Self {
            left: self.left.saturating_add(other.left),
            right: self.right.saturating_add(other.right),
            up: self.up.saturating_add(other.up),
            down: self.down.saturating_add(other.down),
            force_add: true,
        }
    }
}

const fn one() -> u32 {
    1
}

/// A named, fully assembled item tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset id.
    pub id: String,
    /// Template the preset assembles.
    pub base: TemplateId,
    /// Whether this is the template's default configuration.
    #[serde(default)]
    pub default: bool,
    /// Item tree, in any order.
    pub items: Vec<ItemInstance>,
}

#[derive(Deserialize)]
struct ItemDatabaseFile {
    #[serde(default)]
    templates: Vec<ItemTemplate>,
    #[serde(default)]
    presets: Vec<Preset>,
}

/// In-memory item catalog.
#[derive(Clone, Debug, Default)]
pub struct ItemDatabase {
    templates: HashMap<TemplateId, ItemTemplate>,
    /// Default preset trees keyed by base template, root first.
    default_presets: HashMap<TemplateId, Vec<ItemInstance>>,
}

impl ItemDatabase {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::InvalidConfig` on malformed TOML, a preset that
    /// is not a single tree, or two default presets for one template.
    pub fn from_toml_str(text: &str) -> AltarResult<Self> {
        let file: ItemDatabaseFile =
            toml::from_str(text).map_err(|e| AltarError::InvalidConfig(e.to_string()))?;

        let mut db = Self::new();
        for template in file.templates {
            db.insert_template(template);
        }
        for preset in file.presets {
            db.insert_preset(preset)?;
        }
        Ok(db)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::ConfigRead` if the file cannot be read, or the
    /// errors of [`ItemDatabase::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> AltarResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AltarError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Adds or replaces a template.
    pub fn insert_template(&mut self, template: ItemTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Adds a preset. Non-default presets are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns `AltarError::InvalidConfig` if the preset is not a single
    /// tree or its template already has a default preset.
    pub fn insert_preset(&mut self, preset: Preset) -> AltarResult<()> {
        if !preset.default {
            return Ok(());
        }
        if self.default_presets.contains_key(&preset.base) {
            return Err(AltarError::InvalidConfig(format!(
                "template {} has more than one default preset",
                preset.base
            )));
        }

        let group = RewardGroup::from_tree(preset.items).ok_or_else(|| {
            AltarError::InvalidConfig(format!("preset {} is not a single item tree", preset.id))
        })?;
        self.default_presets.insert(preset.base, group.into_items());
        Ok(())
    }

    /// Looks up a template.
    #[must_use]
    pub fn template(&self, tpl: &TemplateId) -> Option<&ItemTemplate> {
        self.templates.get(tpl)
    }
}

impl ItemCatalog for ItemDatabase {
    fn is_of_base_class(&self, tpl: &TemplateId, base_class: &str) -> bool {
        if tpl.as_str() == base_class {
            return true;
        }
        self.templates
            .get(tpl)
            .is_some_and(|t| t.parents.iter().any(|parent| parent.as_str() == base_class))
    }

    fn armor_has_removable_or_soft_insert_slots(&self, tpl: &TemplateId) -> bool {
        self.templates.get(tpl).is_some_and(|t| t.armor_insert_slots)
    }

    fn price(&self, tpl: &TemplateId) -> Option<u64> {
        self.templates.get(tpl).and_then(|t| t.price)
    }

    fn ammo_stack_bounds(&self, tpl: &TemplateId) -> Option<StackBounds> {
        let template = self.templates.get(tpl)?;
        if template.stack_max_size <= 1 {
            return Some(StackBounds { min: 1, max: 1 });
        }

        let min = template.stack_min_random.unwrap_or(1).max(1);
        let max = template
            .stack_max_random
            .unwrap_or(template.stack_max_size)
            .max(min);
        Some(StackBounds { min, max })
    }

    fn footprint(&self, tpl: &TemplateId) -> Footprint {
        self.templates.get(tpl).map_or(Footprint::UNIT, |t| Footprint {
            width: t.width.max(1),
            height: t.height.max(1),
        })
    }

    fn group_footprint(&self, items: &[ItemInstance]) -> Footprint {
        let Some((root, attachments)) = items.split_first() else {
            return Footprint::UNIT;
        };

        let mut overlapping = ExtraSize::default();
        let mut forced = ExtraSize::default();
        for extra in attachments
            .iter()
            .filter_map(|item| self.templates.get(&item.tpl))
            .map(|t| t.extra_size)
        {
            if extra.force_add {
                forced = forced.stacked(extra);
            } else {
                overlapping = overlapping.widest(extra);
            }
        }

        let base = self.footprint(&root.tpl);
        let extra = overlapping.stacked(forced);
        Footprint {
            width: base.width.saturating_add(extra.left).saturating_add(extra.right),
            height: base.height.saturating_add(extra.up).saturating_add(extra.down),
        }
    }
}

impl PresetCatalog for ItemDatabase {
    fn default_preset(&self, tpl: &TemplateId) -> Option<&[ItemInstance]> {
        self.default_presets.get(tpl).map(Vec::as_slice)
    }
}
