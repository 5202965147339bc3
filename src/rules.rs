use crate::board::{Board, bit};
use crate::types::{BOARD_SIZE, Coord, NUM_SQUARES, Side};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Returns whether `side` may place a stone at `coord`.
///
/// A placement is legal when the square is empty and, in at least one of the
/// eight directions, a run of one or more opposing stones is closed by a stone
/// of `side`. Runs that reach the edge or an empty square capture nothing.
pub fn is_legal(board: &Board, coord: Coord, side: Side) -> bool {
    if !coord.is_on_board() || !board.is_empty_at(coord) {
        return false;
    }

    let me = board.stones(side);
    let opp = board.stones(side.opponent());
    DIRECTIONS
        .iter()
        .any(|&(dx, dy)| capture_line(coord, dx, dy, me, opp) != 0)
}

/// Mask of opposing stones that placing at `coord` would turn.
/// Returns 0 when the placement is illegal.
pub fn flips(board: &Board, coord: Coord, side: Side) -> u64 {
    if !coord.is_on_board() || !board.is_empty_at(coord) {
        return 0;
    }

    let me = board.stones(side);
    let opp = board.stones(side.opponent());
    DIRECTIONS
        .iter()
        .fold(0u64, |acc, &(dx, dy)| acc | capture_line(coord, dx, dy, me, opp))
}

/// All legal placements for `side`, in ascending index order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Coord> {
    (0..NUM_SQUARES)
        .filter_map(Coord::from_index)
        .filter(|&coord| is_legal(board, coord, side))
        .collect()
}

fn capture_line(coord: Coord, dx: i32, dy: i32, me: u64, opp: u64) -> u64 {
    let mut x = coord.x as i32 + dx;
    let mut y = coord.y as i32 + dy;
    let mut line = 0u64;

    while in_bounds(x, y) {
        let square = bit((y as usize) * BOARD_SIZE + x as usize);
        if (opp & square) != 0 {
            line |= square;
        } else if (me & square) != 0 {
            return line;
        } else {
            return 0;
        }

        x += dx;
        y += dy;
    }

    0
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}
