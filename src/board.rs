use thiserror::Error;

use crate::types::{BOARD_SIZE, Cell, Coord, NUM_SQUARES, Side};

/// Raw payload rejected by [`Board::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be 8x8: expected {expected} rows, got {rows}", expected = BOARD_SIZE)]
    RowCount { rows: usize },
    #[error("board must be 8x8: row {row} has {len} columns")]
    ColumnCount { row: usize, len: usize },
    #[error("invalid cell value {value} at x={x}, y={y}: expected -1, 0 or 1")]
    CellValue { x: usize, y: usize, value: i32 },
}

impl BoardError {
    /// `true` for row/column count errors, `false` for cell domain errors.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            BoardError::RowCount { .. } | BoardError::ColumnCount { .. }
        )
    }
}

/// Othello board state represented by two bitboards.
///
/// Bit `i` of a mask is the square `Coord::from_index(i)`. A board is never
/// mutated while a move is being selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the standard opening position:
    /// (3,3)=white, (4,3)=black, (3,4)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks. Squares set in both masks belong to black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Validates a raw payload of 8 rows of 8 cell values.
    ///
    /// The payload is indexed `raw[y][x]`. The shape is checked in full before
    /// any cell value is inspected.
    pub fn parse<R: AsRef<[i32]>>(raw: &[R]) -> Result<Self, BoardError> {
        if raw.len() != BOARD_SIZE {
            return Err(BoardError::RowCount { rows: raw.len() });
        }
        for (row, cells) in raw.iter().enumerate() {
            let len = cells.as_ref().len();
            if len != BOARD_SIZE {
                return Err(BoardError::ColumnCount { row, len });
            }
        }

        let mut board = Self::empty();
        for (y, cells) in raw.iter().enumerate() {
            for (x, &value) in cells.as_ref().iter().enumerate() {
                let cell = Cell::from_value(value).ok_or(BoardError::CellValue { x, y, value })?;
                let square = bit(y * BOARD_SIZE + x);
                match cell {
                    Cell::Empty => {}
                    Cell::Stone(Side::Black) => board.black |= square,
                    Cell::Stone(Side::White) => board.white |= square,
                }
            }
        }

        Ok(board)
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        let square = bit(coord.index());
        if (self.black & square) != 0 {
            Cell::Stone(Side::Black)
        } else if (self.white & square) != 0 {
            Cell::Stone(Side::White)
        } else {
            Cell::Empty
        }
    }

    pub fn is_empty_at(&self, coord: Coord) -> bool {
        self.cell(coord) == Cell::Empty
    }

    /// Occupancy mask of one side.
    pub fn stones(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Returns a copy with `coord` set to `side` and `flips` turned to `side`.
    pub fn with_placement(&self, coord: Coord, side: Side, flips: u64) -> Self {
        let me = self.stones(side) | bit(coord.index()) | flips;
        let opp = self.stones(side.opponent()) & !me;
        match side {
            Side::Black => Self::from_bitboards(me, opp),
            Side::White => Self::from_bitboards(opp, me),
        }
    }

    /// Inverse of [`Board::parse`].
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..BOARD_SIZE)
            .map(|y| {
                (0..BOARD_SIZE)
                    .map(|x| self.cell(Coord { x: x as u8, y: y as u8 }).value())
                    .collect()
            })
            .collect()
    }

}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_with(cells: &[(usize, usize, i32)]) -> Vec<Vec<i32>> {
        let mut rows = vec![vec![0; BOARD_SIZE]; BOARD_SIZE];
        for &(x, y, value) in cells {
            rows[y][x] = value;
        }
        rows
    }

    #[test]
    fn parse_reads_rows_as_y_and_columns_as_x() {
        let rows = rows_with(&[(5, 1, 1), (1, 5, -1)]);

        let board = Board::parse(&rows).expect("valid board");

        assert_eq!(board.cell(Coord { x: 5, y: 1 }), Cell::Stone(Side::Black));
        assert_eq!(board.cell(Coord { x: 1, y: 5 }), Cell::Stone(Side::White));
        assert_eq!(board.stones(Side::Black), bit(13));
        assert_eq!(board.stones(Side::White), bit(41));
    }

    #[test]
    fn parse_and_to_rows_are_inverse() {
        let rows = Board::new().to_rows();
        assert_eq!(rows[3][3], -1);
        assert_eq!(rows[3][4], 1);
        assert_eq!(rows[4][3], 1);
        assert_eq!(rows[4][4], -1);

        assert_eq!(Board::parse(&rows), Ok(Board::new()));
    }

    #[test]
    fn parse_rejects_seven_rows() {
        let rows = vec![vec![0; BOARD_SIZE]; 7];

        let err = Board::parse(&rows).unwrap_err();

        assert_eq!(err, BoardError::RowCount { rows: 7 });
        assert!(err.is_shape());
        assert!(err.to_string().contains("8x8"));
    }

    #[test]
    fn parse_rejects_ragged_row() {
        let mut rows = vec![vec![0; BOARD_SIZE]; BOARD_SIZE];
        rows[6].push(0);

        assert_eq!(
            Board::parse(&rows),
            Err(BoardError::ColumnCount { row: 6, len: 9 })
        );
    }

    #[test]
    fn parse_checks_shape_before_values() {
        let mut rows = vec![vec![5; BOARD_SIZE]; BOARD_SIZE];
        rows[7].pop();

        let err = Board::parse(&rows).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn parse_rejects_values_outside_cell_domain() {
        let rows = rows_with(&[(2, 6, 2)]);

        let err = Board::parse(&rows).unwrap_err();

        assert_eq!(err, BoardError::CellValue { x: 2, y: 6, value: 2 });
        assert!(!err.is_shape());
    }

    #[test]
    fn parse_accepts_fixed_size_arrays() {
        let rows = [[0i32; BOARD_SIZE]; BOARD_SIZE];
        assert_eq!(Board::parse(&rows), Ok(Board::empty()));
    }

    #[test]
    fn with_placement_sets_stone_and_flips() {
        let board = Board::new();
        let coord = Coord { x: 3, y: 2 };

        let next = board.with_placement(coord, Side::Black, bit(27));

        assert_eq!(next.cell(coord), Cell::Stone(Side::Black));
        assert_eq!(next.cell(Coord { x: 3, y: 3 }), Cell::Stone(Side::Black));
        assert_eq!(next.stones(Side::White), bit(36));
        assert_eq!(board, Board::new());
    }
}
