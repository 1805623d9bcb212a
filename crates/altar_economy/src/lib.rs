//! # ALTAR Economy
//!
//! Sacrifice-for-reward allocation for the hideout's circle of cultists.
//!
//! ## Design Principles
//!
//! 1. **Bounded generation** - Reward selection stops on budget, empty pool,
//!    item cap or retry cap. It never loops unboundedly.
//! 2. **All-or-nothing grants** - Rewards are dry-run on a copy of the
//!    container grid and committed only if every one fits.
//! 3. **Injected dependencies** - Randomness, id generation, catalogs and
//!    grid geometry are traits. Configuration is a value.
//! 4. **External configuration** - Tuning and catalogs load from TOML files.
//!
//! ## Thread Safety
//!
//! A sacrifice runs synchronously on one thread and holds the profile
//! exclusively. Calls for different players share nothing mutable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use altar_economy::{AltarConfig, ChaChaRandom, CultistCircle, ObjectIdGenerator, SacrificeRequest};
//!
//! let config = AltarConfig::load("data/altar.toml")?;
//! let circle = CultistCircle::new(&config.cultist_circle, &items, &hideout);
//!
//! let outcome = circle.start_sacrifice(
//!     &mut profile,
//!     &SacrificeRequest::start(now),
//!     &mut circle_grid,
//!     &mut ChaChaRandom::from_entropy(),
//!     &mut ObjectIdGenerator::new(),
//! )?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod circle;
pub mod config;
pub mod container;
pub mod error;
pub mod hideout;
pub mod ids;
pub mod inventory;
pub mod item;
pub mod output;
pub mod pool;
pub mod preset;
pub mod profile;
pub mod random;
pub mod sacrifice;
pub mod selector;
pub mod stack;

pub use catalog::{ExtraSize, Footprint, ItemCatalog, ItemDatabase, PresetCatalog, StackBounds};
pub use circle::{CultistCircle, SacrificeOutcome, SacrificeRequest};
pub use config::{AltarConfig, CultistCircleConfig, MinMax};
pub use container::{ContainerGrid, FitOutcome, OccupancyGrid};
pub use error::{AltarError, AltarResult};
pub use hideout::{HideoutCatalog, HideoutDatabase};
pub use ids::{IdSource, ObjectIdGenerator};
pub use inventory::Inventory;
pub use item::{ItemId, ItemInstance, RewardGroup, TemplateId};
pub use output::ItemEventOutput;
pub use pool::{build_reward_pool, RewardPool};
pub use profile::PlayerProfile;
pub use random::{ChaChaRandom, RandomSource};
pub use selector::{RewardSelector, SelectionOutcome, StopReason};
