use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::side::Side;

pub const BOARD_SIZE: i8 = 14;
/// Width of the square block cut out of every corner.
pub const CUTOUT_SIZE: i8 = 3;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid position: ({row}, {col}) is outside the board")]
    InvalidPosition { row: i8, col: i8 },
}

/// Compass directions, north being the top of the board (decreasing row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// (row, column) delta of a single step.
    pub const fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// A playable square. Rows and columns are 1-based, row 1 is the top edge
/// (Red's home rank) and column 1 the left edge (Yellow's home file).
/// Serialized as a `[row, col]` pair that is validated on the way back in.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(try_from = "(i8, i8)", into = "(i8, i8)")]
pub struct Position {
    row: i8,
    col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Result<Self, PositionError> {
        if Self::is_valid(row, col) {
            Ok(Self { row, col })
        } else {
            Err(PositionError::InvalidPosition { row, col })
        }
    }

    pub const fn is_valid(row: i8, col: i8) -> bool {
        if row < 1 || row > BOARD_SIZE || col < 1 || col > BOARD_SIZE {
            return false;
        }
        let row_in_band = row <= CUTOUT_SIZE || row > BOARD_SIZE - CUTOUT_SIZE;
        let col_in_band = col <= CUTOUT_SIZE || col > BOARD_SIZE - CUTOUT_SIZE;
        !(row_in_band && col_in_band)
    }

    pub const fn row(self) -> i8 {
        self.row
    }

    pub const fn col(self) -> i8 {
        self.col
    }

    /// Every playable square, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|row| {
            (1..=BOARD_SIZE).filter_map(move |col| Position::new(row, col).ok())
        })
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Result<Self, PositionError> {
        Position::new(self.row + d_row, self.col + d_col)
    }

    pub fn neighbor(self, direction: Direction) -> Result<Self, PositionError> {
        let (d_row, d_col) = direction.offset();
        self.offset(d_row, d_col)
    }

    // Helpers for code written from the canonical (Green) seat, where "top" is
    // straight ahead.

    pub fn top(self) -> Result<Self, PositionError> {
        self.neighbor(Direction::North)
    }

    pub fn top_left(self) -> Result<Self, PositionError> {
        self.neighbor(Direction::NorthWest)
    }

    pub fn top_right(self) -> Result<Self, PositionError> {
        self.neighbor(Direction::NorthEast)
    }

    pub fn left(self) -> Result<Self, PositionError> {
        self.neighbor(Direction::West)
    }

    pub fn right(self) -> Result<Self, PositionError> {
        self.neighbor(Direction::East)
    }

    // The board is symmetric under quarter turns, so rotating a valid square
    // always yields a valid square.
    const fn rotate_counter_clockwise(self) -> Self {
        Self {
            row: BOARD_SIZE + 1 - self.col,
            col: self.row,
        }
    }

    const fn rotate_clockwise(self) -> Self {
        Self {
            row: self.col,
            col: BOARD_SIZE + 1 - self.row,
        }
    }

    /// Maps an absolute square into `side`'s own frame, where its home ranks are
    /// rows 13 and 14 and its pawns advance toward row 1.
    pub fn to_canonical(self, side: Side) -> Self {
        (0..side.index()).fold(self, |pos, _| pos.rotate_counter_clockwise())
    }

    /// Inverse of [`Position::to_canonical`].
    pub fn from_canonical(self, side: Side) -> Self {
        (0..side.index()).fold(self, |pos, _| pos.rotate_clockwise())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl TryFrom<(i8, i8)> for Position {
    type Error = PositionError;

    fn try_from((row, col): (i8, i8)) -> Result<Self, Self::Error> {
        Position::new(row, col)
    }
}

impl From<Position> for (i8, i8) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}
