use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Solve-time configuration, passed in at construction rather than toggled
/// globally.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Allow revealing a uniformly random unmarked cell (risking detonation)
    /// when deduction stalls on a mostly-hidden board.
    pub random_probe: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { random_probe: true }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// All mines flagged and every safe cell revealed.
    Complete,
    /// No rule applies and stall handling is exhausted; the remainder is
    /// left unsolved.
    Stalled,
}

/// Rule-based solver: three deduction rules run to a fixpoint, a random
/// probe or a one-shot endgame rule to break stalls, and a completion sweep
/// once every mine is flagged.
///
/// A `MineDetonated` from any reveal aborts the solve; with sound flags it
/// can only come from a random probe.
pub struct Solver {
    config: SolverConfig,
    /// Speculative pairs keyed by the clue cell that recorded them: two
    /// unmarked neighbors known to contain exactly one mine between them.
    /// Cleared and recomputed on every pair-inference pass.
    pairs: BTreeMap<Coord2, (Coord2, Coord2)>,
    endgame_spent: bool,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            pairs: BTreeMap::new(),
            endgame_spent: false,
        }
    }

    pub fn run<R: Rng>(&mut self, board: &mut Board, rng: &mut R) -> Result<SolveOutcome> {
        while board.flagged_count() < board.mine_count() {
            let unmarked_before = board.unmarked_count();

            // Order matters: pair inference builds on the flags and reveals
            // the saturation rules just produced.
            self.saturate_mines(board);
            self.saturate_safe(board)?;
            self.pair_inference(board)?;

            if board.unmarked_count() == unmarked_before {
                if self.config.random_probe && probe_allowed(board) {
                    self.random_probe(board, rng)?;
                } else if board.mines_left() == 1 && !self.endgame_spent {
                    self.endgame_spent = true;
                    self.endgame_elimination(board)?;
                } else {
                    log::debug!(
                        "solver stalled with {} unmarked cells, {} mines unflagged",
                        board.unmarked_count(),
                        board.mines_left()
                    );
                    return Ok(SolveOutcome::Stalled);
                }
            }
        }

        self.completion_sweep(board)?;
        Ok(SolveOutcome::Complete)
    }

    /// When a clue's unrevealed neighbors are exactly as many as its count,
    /// all of them are mines.
    fn saturate_mines(&self, board: &mut Board) {
        for (coords, count) in board.open_numbered() {
            let unrevealed = board.unrevealed_neighbors(coords);
            if unrevealed.len() == usize::from(count) {
                for pos in unrevealed {
                    board.flag(pos);
                }
            }
        }
    }

    /// When a clue's flags already account for its whole count, the rest of
    /// its unrevealed neighbors are safe.
    fn saturate_safe(&self, board: &mut Board) -> Result<()> {
        for (coords, count) in board.open_numbered() {
            let flagged = board.flagged_neighbors(coords).len();
            let unrevealed = board.unrevealed_neighbors(coords);
            if flagged == usize::from(count) && flagged < unrevealed.len() {
                for pos in unrevealed {
                    // Reveal skips the flagged neighbors on its own.
                    board.reveal(pos)?;
                }
            }
        }
        Ok(())
    }

    /// Either/or inference. Pass A: a clue with two unmarked neighbors and
    /// exactly one unaccounted mine records that pair. Pass B: an
    /// orthogonally adjacent clue whose unmarked set contains the whole pair
    /// treats it as a single one-mine unit and re-runs both saturation tests
    /// with the pair removed and the count reduced by one.
    fn pair_inference(&mut self, board: &mut Board) -> Result<()> {
        self.pairs.clear();
        for (coords, count) in board.open_numbered() {
            let flagged = board.flagged_neighbors(coords).len();
            let unmarked = board.unmarked_neighbors(coords);
            if unmarked.len() == 2 && usize::from(count) == flagged + 1 {
                self.pairs.insert(coords, (unmarked[0], unmarked[1]));
            }
        }

        for (coords, count) in board.open_numbered() {
            if board.is_resolved(coords) {
                continue;
            }

            let unmarked: BTreeSet<Coord2> =
                board.unmarked_neighbors(coords).into_iter().collect();
            let mut unit = None;
            for pos in board.orthogonal_neighbors(coords) {
                if let Some(&(a, b)) = self.pairs.get(&pos) {
                    // Pair membership in the unmarked set also guarantees
                    // neither half is flagged.
                    if unmarked.contains(&a) && unmarked.contains(&b) {
                        unit = Some((a, b));
                        break;
                    }
                }
            }
            let Some((a, b)) = unit else {
                continue;
            };

            let reduced_count = usize::from(count) - 1;
            let outside: Vec<Coord2> = board
                .unrevealed_neighbors(coords)
                .into_iter()
                .filter(|&pos| pos != a && pos != b)
                .collect();

            if outside.len() == reduced_count {
                log::trace!("pair unit at {coords:?} saturates, flagging {outside:?}");
                for &pos in &outside {
                    board.flag(pos);
                }
            }

            let flagged = board.flagged_neighbors(coords).len();
            if flagged == reduced_count && reduced_count < outside.len() {
                log::trace!("pair unit at {coords:?} clears {outside:?}");
                for &pos in &outside {
                    board.reveal(pos)?;
                }
            }
        }
        Ok(())
    }

    /// Once the flag total matches the mine total, everything still unmarked
    /// is safe.
    fn completion_sweep(&self, board: &mut Board) -> Result<()> {
        for pos in board.unmarked_cells() {
            board.reveal(pos)?;
        }
        Ok(())
    }

    /// With a single mine left unflagged, any clue still holding a pair pins
    /// that mine to one of its two cells, so every unmarked cell outside the
    /// pair is safe. Runs at most once per solve; a second run can livelock
    /// the loop.
    fn endgame_elimination(&self, board: &mut Board) -> Result<()> {
        for (&clue, &(a, b)) in &self.pairs {
            if board.is_resolved(clue) {
                continue;
            }
            log::debug!("endgame elimination around pair at {clue:?}");
            for pos in board.unmarked_cells() {
                if pos != a && pos != b {
                    board.reveal(pos)?;
                }
            }
        }
        Ok(())
    }

    fn random_probe<R: Rng>(&self, board: &mut Board, rng: &mut R) -> Result<()> {
        let candidates = board.unmarked_cells();
        let pick = candidates[rng.random_range(0..candidates.len())];
        log::debug!("random probe at {pick:?}");
        board.reveal(pick)?;
        Ok(())
    }
}

/// Probing is only worth the risk while at least 80% of the board is still
/// unmarked.
fn probe_allowed(board: &Board) -> bool {
    u32::from(board.unmarked_count()) * 5 >= u32::from(board.total_cells()) * 4
}
