use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two players. Wire values: `1` for black, `-1` for white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Side::Black => 1,
            Side::White => -1,
        }
    }
}

impl TryFrom<i8> for Side {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::Black),
            -1 => Ok(Side::White),
            _ => Err(format!("side must be 1 or -1, got {value}")),
        }
    }
}

impl From<Side> for i8 {
    fn from(side: Side) -> Self {
        side.value()
    }
}

/// State of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Stone(Side),
}

impl Cell {
    /// Decodes a wire value: `0` empty, `1` black, `-1` white.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Stone(Side::Black)),
            -1 => Some(Cell::Stone(Side::White)),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Stone(side) => side.value() as i32,
        }
    }
}

/// A board coordinate: `x` is the column, `y` is the row.
///
/// Flat indices are row-major (`index = y * 8 + x`). Every conversion between
/// flat indices and coordinates goes through [`Coord::from_index`] and
/// [`Coord::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Returns `None` when `index >= 64`.
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_SQUARES {
            return None;
        }
        Some(Self {
            x: (index % BOARD_SIZE) as u8,
            y: (index / BOARD_SIZE) as u8,
        })
    }

    pub fn index(self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    pub fn is_on_board(self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }
}

/// Outcome of move selection for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Place(Coord),
    /// The side has no legal placement.
    Pass,
}
