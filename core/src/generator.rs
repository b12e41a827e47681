use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};

use ndarray::Array2;
use rand::prelude::*;

use crate::seed;
use crate::*;

/// Builds a board with randomly placed mines.
///
/// The first click is drawn from the central third of the board, the 3x3
/// zone around it is kept mine-free, the seed token is derived from the
/// final layout, and the first click is revealed before the board is
/// returned.
///
/// The density bound can admit more mines than the safe zone leaves room
/// for. Placement then stops at the free-cell total with a warning, and the
/// board, its counters, and its seed all carry the smaller count.
pub fn generate<R: Rng>(config: BoardConfig, rng: &mut R) -> Result<Board> {
    config.validate()?;

    let opening = pick_opening(config, rng);
    let layout = place_mines(config, opening, rng);

    let mine_coords: BTreeSet<Coord2> = layout.mine_coords().collect();
    let token = seed::encode(&mine_coords, config.width, config.height, layout.mine_count());

    open_board(layout, token, opening)
}

/// Builds a board from a seed token: decoded mine positions are placed
/// verbatim and the decoded dimensions go through the same validation as
/// explicit ones.
///
/// The opening cell is still drawn independently of the seed, so the same
/// token can cascade differently across runs, and a seed that mines the
/// central third can detonate right here.
pub fn from_seed<R: Rng>(token: &str, rng: &mut R) -> Result<Board> {
    let (mine_coords, width, height, _) = seed::decode(token)?;

    let mines: CellCount = mine_coords
        .len()
        .try_into()
        .map_err(|_| GameError::InvalidSeed)?;
    let config = BoardConfig::new(width, height, mines);
    config.validate()?;

    let layout = MineLayout::from_mine_coords((width, height), mine_coords);
    let opening = pick_opening(config, rng);

    open_board(layout, token.to_string(), opening)
}

fn open_board(layout: MineLayout, token: String, opening: Coord2) -> Result<Board> {
    let mut board = Board::new(layout, token);
    board.set_opening(opening);
    board.reveal(opening)?;
    Ok(board)
}

/// A useful opening cascade starts near the middle, so the first click is
/// drawn from `[w/3, 2w/3] x [h/3, 2h/3]`.
fn pick_opening<R: Rng>(config: BoardConfig, rng: &mut R) -> Coord2 {
    let x = rng.random_range(config.width / 3..=config.width * 2 / 3);
    let y = rng.random_range(config.height / 3..=config.height * 2 / 3);
    (x, y)
}

fn place_mines<R: Rng>(config: BoardConfig, opening: Coord2, rng: &mut R) -> MineLayout {
    let mut mask: Array2<bool> = Array2::default((config.width, config.height).to_nd_index());

    // Pre-mark the 3x3 opening zone as occupied so placement skips it, then
    // undo the marks afterwards.
    mask[opening.to_nd_index()] = true;
    for pos in mask.iter_neighbors(opening) {
        mask[pos.to_nd_index()] = true;
    }
    let zone_cells: CellCount = mask.iter().filter(|&&taken| taken).count() as CellCount;

    let mut free_cells = config.total_cells() - zone_cells;
    let mut placed = 0;
    {
        let cells = mask.as_slice_mut().expect("mask layout is standard");
        while placed < config.mines {
            if free_cells == 0 {
                break;
            }
            let mut place: CellCount = rng.random_range(0..free_cells);
            for (i, cell) in cells.iter_mut().enumerate() {
                let i = i as CellCount;
                if *cell {
                    place += 1;
                }
                if i == place {
                    *cell = true;
                    placed += 1;
                    free_cells -= 1;
                    break;
                }
            }
        }
    }

    mask[opening.to_nd_index()] = false;
    for pos in mask.iter_neighbors(opening) {
        mask[pos.to_nd_index()] = false;
    }

    let layout = MineLayout::from_mine_mask(mask);
    if layout.mine_count() != config.mines {
        log::warn!(
            "generated layout mine count mismatch, actual: {}, requested: {}",
            layout.mine_count(),
            config.mines
        );
    }
    layout
}
