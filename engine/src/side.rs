use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The four armies. Declaration order is the turn order, and also the number of
/// counter-clockwise quarter turns that bring a side's home ranks to the bottom
/// of the board.
#[repr(u8)]
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Clone, Copy, Display, Deserialize, Serialize,
)]
pub enum Side {
    Green,
    Yellow,
    Red,
    Blue,
}

impl Side {
    const ALL: [Side; 4] = [Side::Green, Side::Yellow, Side::Red, Side::Blue];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Side that moves after this one.
    pub const fn next(self) -> Side {
        Side::ALL[(self.index() + 1) % 4]
    }

    pub const fn left(self) -> Side {
        self.next()
    }

    pub const fn front(self) -> Side {
        Side::ALL[(self.index() + 2) % 4]
    }

    pub const fn right(self) -> Side {
        Side::ALL[(self.index() + 3) % 4]
    }

    /// Whether the queen starts on the king's left, seen from the side's own seat.
    /// Decides which way kingside castling goes.
    pub const fn queen_to_the_left_of_king(self) -> bool {
        match self {
            Side::Green | Side::Red => false,
            Side::Yellow | Side::Blue => true,
        }
    }

    pub(crate) fn initial(self) -> char {
        match self {
            Side::Green => 'g',
            Side::Yellow => 'y',
            Side::Red => 'r',
            Side::Blue => 'b',
        }
    }
}
