#![no_std]

extern crate alloc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use solver::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
pub mod seed;
mod solver;
mod types;

/// Smallest accepted board edge.
pub const MIN_EDGE: Coord = 9;
/// Largest accepted board edge.
pub const MAX_EDGE: Coord = 30;
/// Smallest accepted mine count.
pub const MIN_MINES: CellCount = 10;
/// Mine density must stay strictly below 93% of the board area.
pub const MAX_DENSITY_PERCENT: u32 = 93;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Checks the construction bounds: edges within `[9, 30]`, at least 10
    /// mines, density strictly below 93%. Violations abort construction
    /// before any board state exists.
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_EDGE
            || self.width > MAX_EDGE
            || self.height < MIN_EDGE
            || self.height > MAX_EDGE
        {
            return Err(GameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let cells = self.total_cells();
        let too_dense = u32::from(self.mines) * 100 >= MAX_DENSITY_PERCENT * u32::from(cells);
        if self.mines < MIN_MINES || too_dense {
            return Err(GameError::InvalidMineCount {
                mines: self.mines,
                cells,
            });
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .expect("board area fits in a cell count");
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout from explicit mine positions. Positions must lie
    /// inside `size`; the seed codec and the generator both guarantee this
    /// before calling.
    pub fn from_mine_coords<I>(size: Coord2, mine_coords: I) -> Self
    where
        I: IntoIterator<Item = Coord2>,
    {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for coords in mine_coords {
            debug_assert!(coords.0 < size.0 && coords.1 < size.1);
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (
            dim.0.try_into().expect("board edge fits in a coord"),
            dim.1.try_into().expect("board edge fits in a coord"),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask
            .len()
            .try_into()
            .expect("board area fits in a cell count")
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask[coords.to_nd_index()]
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        let (x_end, y_end) = self.size();
        (0..x_end)
            .flat_map(move |x| (0..y_end).map(move |y| (x, y)))
            .filter(|&coords| self.contains_mine(coords))
    }

    /// The adjacency pass: per-cell count of mine-bearing cells among the
    /// up-to-8 neighbors. Computed once at board construction and immutable
    /// afterwards.
    pub fn adjacency_counts(&self) -> Array2<u8> {
        let mut counts: Array2<u8> = Array2::default(self.mine_mask.dim());
        let (x_end, y_end) = self.size();
        for x in 0..x_end {
            for y in 0..y_end {
                let coords = (x, y);
                counts[coords.to_nd_index()] = self
                    .mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| self.contains_mine(pos))
                    .count() as u8;
            }
        }
        counts
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed)
    }
}
