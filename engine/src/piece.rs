use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::side::Side;

/// Identity of a piece for its whole life on the board. Two pieces of the same
/// kind and side are still distinct pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The rooks a king may castle with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CastlingRooks {
    pub kingside: Option<PieceId>,
    pub queenside: Option<PieceId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King(CastlingRooks),
}

impl PieceKind {
    pub fn is_king(&self) -> bool {
        matches!(self, PieceKind::King(_))
    }
}

impl From<PieceKind> for char {
    fn from(kind: PieceKind) -> char {
        match kind {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King(_) => 'K',
        }
    }
}

/// Pieces a pawn can become.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, Deserialize, Serialize,
)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> PieceKind {
        match promotion {
            Promotion::Queen => PieceKind::Queen,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Knight => PieceKind::Knight,
        }
    }
}

impl TryFrom<char> for Promotion {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'q' => Ok(Promotion::Queen),
            'r' => Ok(Promotion::Rook),
            'b' => Ok(Promotion::Bishop),
            'n' => Ok(Promotion::Knight),
            _ => Err(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    pub id: PieceId,
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(id: PieceId, side: Side, kind: PieceKind) -> Self {
        Self { id, side, kind }
    }

    pub fn king(id: PieceId, side: Side, rooks: CastlingRooks) -> Self {
        Self::new(id, side, PieceKind::King(rooks))
    }

    pub fn is_king(&self) -> bool {
        self.kind.is_king()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.initial(), char::from(self.kind))
    }
}
