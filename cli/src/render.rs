use minefall_core::{Board, CellState, Coord2};

pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

/// Prints the header lines and the glyph grid with axis labels. With
/// `show_mines` the hidden mines are drawn too, which is only wanted on the
/// post-detonation diagnostic dump.
pub fn print_board(board: &Board, show_mines: bool) {
    println!("{} x {}", board.width(), board.height());
    println!("mine: {} flag: {}", board.mine_count(), board.flagged_count());
    println!("seed: {}", board.seed());

    print!("  ");
    for x in 0..board.width() {
        // Only the last digit fits above a column.
        print!("{}", x % 10);
    }
    println!();

    for y in 0..board.height() {
        print!("{y:2}");
        for x in 0..board.width() {
            print!("{}", glyph(board, (x, y), show_mines));
        }
        println!();
    }
}

fn glyph(board: &Board, coords: Coord2, show_mines: bool) -> char {
    match board.cell_at(coords) {
        CellState::Flagged => '⚑',
        _ if show_mines && board.has_mine_at(coords) => '✸',
        CellState::Hidden => '■',
        CellState::Revealed(0) => ' ',
        CellState::Revealed(count) => char::from(b'0' + count),
    }
}
