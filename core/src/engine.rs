use alloc::collections::{BTreeSet, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One in-memory minesweeper board: the fixed mine layout and adjacency
/// counts, plus the mutable per-cell reveal/flag state.
///
/// Constructed once (by the generator or directly from a layout), mutated in
/// place by `reveal` and `flag`, and discarded at the end of a solve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    counts: Array2<u8>,
    cells: Array2<CellState>,
    seed: String,
    revealed_count: CellCount,
    flagged_count: CellCount,
    opening: Option<Coord2>,
    detonated: Option<Coord2>,
}

impl Board {
    pub fn new(layout: MineLayout, seed: String) -> Self {
        let counts = layout.adjacency_counts();
        let cells = Array2::default(counts.dim());
        Self {
            layout,
            counts,
            cells,
            seed,
            revealed_count: 0,
            flagged_count: 0,
            opening: None,
            detonated: None,
        }
    }

    pub fn width(&self) -> Coord {
        self.layout.size().0
    }

    pub fn height(&self) -> Coord {
        self.layout.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.layout.total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Cells that are neither revealed nor flagged.
    pub fn unmarked_count(&self) -> CellCount {
        self.total_cells() - self.revealed_count - self.flagged_count
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// The forced first click chosen by the generator, if any.
    pub fn opening(&self) -> Option<Coord2> {
        self.opening
    }

    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.cells[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.layout.contains_mine(coords)
    }

    pub fn adjacent_mines_at(&self, coords: Coord2) -> u8 {
        self.counts[coords.to_nd_index()]
    }

    pub(crate) fn set_opening(&mut self, coords: Coord2) {
        self.opening = Some(coords);
    }

    /// Opens a cell. No-op on revealed or flagged cells. Revealing a mine
    /// records the detonation (the board stays fully queryable for
    /// diagnostics) and fails with `MineDetonated`. Revealing a zero-count
    /// cell opens its whole connected zero region plus the numbered border,
    /// via an explicit work queue; partial cascades are impossible.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if !matches!(self.cell_at(coords), CellState::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }

        if self.layout.contains_mine(coords) {
            self.detonated = Some(coords);
            return Err(GameError::MineDetonated {
                x: coords.0,
                y: coords.1,
            });
        }

        self.reveal_unchecked(coords);

        if self.counts[coords.to_nd_index()] == 0 {
            let mut visited = BTreeSet::from([coords]);
            let mut to_visit: VecDeque<_> = self
                .layout
                .iter_neighbors(coords)
                .filter(|&pos| matches!(self.cell_at(pos), CellState::Hidden))
                .collect();

            while let Some(visit_coords) = to_visit.pop_front() {
                if !visited.insert(visit_coords) {
                    continue;
                }
                if !matches!(self.cell_at(visit_coords), CellState::Hidden) {
                    continue;
                }

                self.reveal_unchecked(visit_coords);

                if self.counts[visit_coords.to_nd_index()] == 0 {
                    to_visit.extend(
                        self.layout
                            .iter_neighbors(visit_coords)
                            .filter(|&pos| matches!(self.cell_at(pos), CellState::Hidden))
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }

        Ok(RevealOutcome::Revealed)
    }

    fn reveal_unchecked(&mut self, coords: Coord2) {
        debug_assert!(!self.layout.contains_mine(coords));
        self.cells[coords.to_nd_index()] = CellState::Revealed(self.counts[coords.to_nd_index()]);
        self.revealed_count += 1;
    }

    /// Marks a hidden cell as a believed mine. Flagging a revealed cell is
    /// silently ignored by documented contract; flags are never removed.
    pub fn flag(&mut self, coords: Coord2) -> MarkOutcome {
        match self.cell_at(coords) {
            CellState::Hidden => {
                self.cells[coords.to_nd_index()] = CellState::Flagged;
                self.flagged_count += 1;
                MarkOutcome::Changed
            }
            CellState::Revealed(_) | CellState::Flagged => MarkOutcome::NoChange,
        }
    }

    /// Revealed cells with a nonzero adjacency count; the domain every
    /// deduction rule ranges over.
    pub fn open_numbered(&self) -> Vec<(Coord2, u8)> {
        self.iter_coords()
            .filter_map(|coords| match self.cell_at(coords) {
                CellState::Revealed(count) if count > 0 => Some((coords, count)),
                _ => None,
            })
            .collect()
    }

    /// Board-wide cells that are neither revealed nor flagged.
    pub fn unmarked_cells(&self) -> Vec<Coord2> {
        self.iter_coords()
            .filter(|&coords| self.cell_at(coords).is_unmarked())
            .collect()
    }

    /// Unrevealed neighbors, flagged included.
    pub fn unrevealed_neighbors(&self, coords: Coord2) -> Vec<Coord2> {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cell_at(pos).is_unrevealed())
            .collect()
    }

    pub fn flagged_neighbors(&self, coords: Coord2) -> Vec<Coord2> {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.cell_at(pos), CellState::Flagged))
            .collect()
    }

    /// Neighbors that are neither revealed nor flagged.
    pub fn unmarked_neighbors(&self, coords: Coord2) -> Vec<Coord2> {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cell_at(pos).is_unmarked())
            .collect()
    }

    /// A cell is resolved once every neighbor is revealed or flagged.
    pub fn is_resolved(&self, coords: Coord2) -> bool {
        self.cells
            .iter_neighbors(coords)
            .all(|pos| !self.cell_at(pos).is_unmarked())
    }

    pub(crate) fn orthogonal_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_orthogonal(coords)
    }

    fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (x_end, y_end) = self.layout.size();
        (0..x_end).flat_map(move |x| (0..y_end).map(move |y| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn board(mines: &[Coord2]) -> Board {
        let layout = MineLayout::from_mine_coords((9, 9), mines.iter().copied());
        Board::new(layout, "test".to_string())
    }

    #[test]
    fn reveal_hits_mine_and_records_detonation() {
        let mut b = board(&[(4, 4)]);

        let result = b.reveal((4, 4));

        assert_eq!(result, Err(GameError::MineDetonated { x: 4, y: 4 }));
        assert_eq!(b.detonated(), Some((4, 4)));
        assert!(b.has_mine_at((4, 4)));
    }

    #[test]
    fn reveal_cascade_opens_the_whole_zero_region() {
        let mut b = board(&[(8, 8)]);

        assert_eq!(b.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        // Everything except the mine is revealed: the zero region plus its
        // numbered one-cell border.
        assert_eq!(b.revealed_count(), 80);
        assert_eq!(b.cell_at((8, 8)), CellState::Hidden);
        assert_eq!(b.cell_at((7, 7)), CellState::Revealed(1));
        assert_eq!(b.cell_at((7, 8)), CellState::Revealed(1));
        assert_eq!(b.cell_at((8, 7)), CellState::Revealed(1));
        assert_eq!(b.cell_at((0, 0)), CellState::Revealed(0));
    }

    #[test]
    fn cascade_stops_at_numbered_border() {
        // A mine wall at x = 7 seals off the last column.
        let mut mines: Vec<Coord2> = (0..9).map(|y| (7, y)).collect();
        mines.push((8, 4));
        let mut b = board(&mines);

        b.reveal((0, 0)).unwrap();

        assert!(matches!(b.cell_at((6, 4)), CellState::Revealed(_)));
        assert_eq!(b.cell_at((8, 0)), CellState::Hidden);
        assert_eq!(b.cell_at((8, 8)), CellState::Hidden);
    }

    #[test]
    fn reveal_is_a_noop_on_revealed_and_flagged_cells() {
        let mut b = board(&[(0, 0)]);

        b.flag((1, 1));
        assert_eq!(b.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);

        b.reveal((8, 8)).unwrap();
        assert_eq!(b.reveal((8, 8)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut b = board(&[(8, 8)]);

        b.flag((4, 4));
        b.reveal((0, 0)).unwrap();

        assert_eq!(b.cell_at((4, 4)), CellState::Flagged);
        assert_eq!(b.flagged_count(), 1);
    }

    #[test]
    fn flagging_a_revealed_cell_is_silently_ignored() {
        let mut b = board(&[(0, 0)]);

        b.reveal((8, 8)).unwrap();

        assert_eq!(b.flag((8, 8)), MarkOutcome::NoChange);
        assert_eq!(b.flag((0, 0)), MarkOutcome::Changed);
        assert_eq!(b.flag((0, 0)), MarkOutcome::NoChange);
        assert_eq!(b.flagged_count(), 1);
    }

    #[test]
    fn neighbor_queries_partition_the_ring() {
        let mut b = board(&[(0, 0), (2, 0)]);

        b.reveal((1, 1)).unwrap();
        b.flag((0, 0));

        assert_eq!(b.cell_at((1, 1)), CellState::Revealed(2));
        let unrevealed = b.unrevealed_neighbors((1, 1));
        assert!(unrevealed.contains(&(0, 0)));
        assert_eq!(b.flagged_neighbors((1, 1)), [(0, 0)]);
        let unmarked = b.unmarked_neighbors((1, 1));
        assert!(!unmarked.contains(&(0, 0)));
        assert!(!b.is_resolved((1, 1)));
    }
}
