use thiserror::Error;

use crate::types::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board dimensions must be within 9..=30, got {width}x{height}")]
    InvalidDimensions { width: Coord, height: Coord },
    #[error("mine count must be at least 10 and density below 93%, got {mines} on {cells} cells")]
    InvalidMineCount { mines: CellCount, cells: CellCount },
    #[error("invalid seed token")]
    InvalidSeed,
    #[error("mine detonated at ({x}, {y})")]
    MineDetonated { x: Coord, y: Coord },
}

pub type Result<T> = core::result::Result<T, GameError>;
