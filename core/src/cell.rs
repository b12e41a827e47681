use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
///
/// `Revealed` is monotonic: a revealed cell never becomes hidden or flagged
/// again. The adjacency count carried by `Revealed` is fixed at generation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    /// Neither revealed nor flagged.
    pub const fn is_unmarked(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
