use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, Promotion};
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum MoveType {
    Simple,
    PawnDouble,
    EnPassant,
    KingsideCastling,
    QueensideCastling,
    Promotion(Promotion),
}

impl MoveType {
    pub fn is_castling(self) -> bool {
        matches!(
            self,
            MoveType::KingsideCastling | MoveType::QueensideCastling
        )
    }
}

/// A transition of one piece to `dest`. Moves never record where the piece came
/// from; the board knows that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Move {
    pub piece: Piece,
    pub kind: MoveType,
    pub dest: Position,
    pub en_passant_victim: Option<Piece>,
}

impl Move {
    pub fn new(piece: Piece, kind: MoveType, dest: Position) -> Self {
        Self {
            piece,
            kind,
            dest,
            en_passant_victim: None,
        }
    }

    pub fn simple(piece: Piece, dest: Position) -> Self {
        Self::new(piece, MoveType::Simple, dest)
    }

    pub fn en_passant(piece: Piece, dest: Position, victim: Piece) -> Self {
        Self {
            piece,
            kind: MoveType::EnPassant,
            dest,
            en_passant_victim: Some(victim),
        }
    }

    pub fn promotion(&self) -> Option<Promotion> {
        match self.kind {
            MoveType::Promotion(promotion) => Some(promotion),
            _ => None,
        }
    }

    /// The same move expressed in another frame of reference.
    pub(crate) fn with_dest(self, dest: Position) -> Self {
        Self { dest, ..self }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {:?}", self.piece, self.piece.id, self.dest)?;
        match self.kind {
            MoveType::Simple => {}
            MoveType::Promotion(promotion) => write!(f, " ({})", promotion)?,
            kind => write!(f, " ({:?})", kind)?,
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.piece, self.dest)?;
        if let Some(promotion) = self.promotion() {
            let ch: char = crate::piece::PieceKind::from(promotion).into();
            write!(f, "={}", ch.to_ascii_lowercase())?;
        }
        Ok(())
    }
}
