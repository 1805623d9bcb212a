//! # Container Fit Gate
//!
//! Rewards only reach the player if ALL of them fit into the circle's grid.
//!
//! ```text
//! rewards ──► clone grid ──► dry run on clone ──┬─ all fit ──► place on real grid
//!                                               │              append to inventory
//!                                               │              append to output
//!                                               └─ any miss ─► discard everything
//! ```
//!
//! The dry run always runs on a copy, so a rejected set leaves no trace on
//! the authoritative grid. There is no retry with fewer rewards, and the
//! sacrifice is not refunded.

use crate::catalog::{Footprint, ItemCatalog};
use crate::error::{AltarError, AltarResult};
use crate::inventory::Inventory;
use crate::item::{ItemId, ItemLocation, RewardGroup};
use crate::output::ItemEventOutput;

/// A container's 2D occupancy.
///
/// `Clone` must produce an independent copy: the fit gate mutates the clone
/// during its dry run.
pub trait ContainerGrid: Clone {
    /// Finds room for an item of `footprint`, marks it occupied and returns
    /// where it went. Returns `None` if there is no room.
    fn try_insert(&mut self, footprint: Footprint) -> Option<ItemLocation>;
}

/// Row-major first-fit grid.
///
/// Scans top to bottom, left to right, and at each cell tries the item
/// upright before rotated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of unoccupied cells.
    #[must_use]
    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|&&taken| !taken).count()
    }

    /// Marks an item that already sits in the container.
    ///
    /// Returns false, leaving the grid unchanged, if the area is out of
    /// bounds or overlaps another item.
    pub fn occupy(&mut self, location: ItemLocation, footprint: Footprint) -> bool {
        let footprint = if location.rotated {
            footprint.rotated()
        } else {
            footprint
        };
        if !self.is_free(location.x, location.y, footprint) {
            return false;
        }
        self.fill(location.x, location.y, footprint);
        true
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn is_free(&self, x: u32, y: u32, footprint: Footprint) -> bool {
        let (Some(right), Some(bottom)) = (x.checked_add(footprint.width), y.checked_add(footprint.height)) else {
            return false;
        };
        if right > self.width || bottom > self.height {
            return false;
        }

        (y..bottom).all(|row| (x..right).all(|col| !self.cells[self.index(col, row)]))
    }

    fn fill(&mut self, x: u32, y: u32, footprint: Footprint) {
        for row in y..y + footprint.height {
            for col in x..x + footprint.width {
                let index = self.index(col, row);
                self.cells[index] = true;
            }
        }
    }
}

impl ContainerGrid for OccupancyGrid {
    fn try_insert(&mut self, footprint: Footprint) -> Option<ItemLocation> {
        let square = footprint.width == footprint.height;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_free(x, y, footprint) {
                    self.fill(x, y, footprint);
                    return Some(ItemLocation { x, y, rotated: false });
                }
                let turned = footprint.rotated();
                if !square && self.is_free(x, y, turned) {
                    self.fill(x, y, turned);
                    return Some(ItemLocation { x, y, rotated: true });
                }
            }
        }

        None
    }
}

/// Result of the fit gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitOutcome {
    /// Every group was placed.
    Committed {
        /// Groups placed.
        groups: usize,
        /// Item nodes added to the inventory.
        items: usize,
    },
    /// At least one group did not fit, so nothing was placed.
    Rejected {
        /// Groups discarded.
        groups: usize,
    },
}

impl FitOutcome {
    /// Checks whether the rewards were granted.
    #[inline]
    #[must_use]
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Dry-runs `rewards` on a copy of `grid`.
///
/// Each group is sized as assembled, attachments included.
///
/// `grid` itself is never touched.
#[must_use]
pub fn can_place_all<G: ContainerGrid>(
    grid: &G,
    rewards: &[RewardGroup],
    catalog: &impl ItemCatalog,
) -> bool {
    let mut scratch = grid.clone();
    rewards
        .iter()
        .all(|group| scratch.try_insert(catalog.group_footprint(group.items())).is_some())
}

/// Places every reward group or none of them.
///
/// On success each group root is parented to `container_id` in `slot_id`
/// with its grid location, and every node is appended to both `inventory`
/// and `output`. On failure nothing changes except a diagnostic in `output`.
///
/// # Errors
///
/// Returns `AltarError::PlacementDiverged` if `grid` accepts every group on
/// the dry run but rejects one while committing. The inventory is left
/// unchanged in that case, the grid is not.
pub fn place_rewards<G: ContainerGrid>(
    grid: &mut G,
    rewards: Vec<RewardGroup>,
    catalog: &impl ItemCatalog,
    container_id: &ItemId,
    slot_id: &str,
    inventory: &mut Inventory,
    output: &mut ItemEventOutput,
) -> AltarResult<FitOutcome> {
    if !can_place_all(grid, &rewards, catalog) {
        tracing::error!(
            "Unable to fit all: {} reward items into sacrifice grid, nothing will be returned",
            rewards.len()
        );
        output.warn(format!(
            "{} rewards did not fit into the circle and were discarded",
            rewards.len()
        ));
        return Ok(FitOutcome::Rejected {
            groups: rewards.len(),
        });
    }

    let mut placed = Vec::with_capacity(rewards.len());
    for (index, mut group) in rewards.into_iter().enumerate() {
        let footprint = catalog.group_footprint(group.items());
        let location = grid
            .try_insert(footprint)
            .ok_or(AltarError::PlacementDiverged { index })?;

        let root = group.root_mut();
        tracing::debug!("Placing reward: {} in circle grid at {},{}", root.tpl, location.x, location.y);
        root.parent_id = Some(container_id.clone());
        root.slot_id = Some(slot_id.to_string());
        root.location = Some(location);
        placed.push(group);
    }

    let groups = placed.len();
    let mut items = 0;
    for group in placed {
        let nodes = group.into_items();
        items += nodes.len();
        output.new_items.extend(nodes.iter().cloned());
        inventory.extend(nodes);
    }

    Ok(FitOutcome::Committed { groups, items })
}
