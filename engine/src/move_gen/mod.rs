//! Pseudo-legal move generation.
//!
//! Every generator except the king's is written once, from the seat of the
//! canonical side: pawns advance toward row 1 and start on row 13. The board
//! hands each generator accessors already rotated into the piece's own frame
//! and rotates the resulting destinations back.

pub mod king;
pub mod knight;
pub mod pawn;
pub mod sliding_pieces;

use crate::moves::Move;
use crate::piece::{Piece, PieceId, PieceKind};
use crate::position::{Direction, Position};
use crate::side::Side;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveGenError {
    #[error("piece {0} is not on the board")]
    PieceNotInBoard(PieceId),
}

/// Looks up the piece standing on a square.
pub trait PieceAt: Fn(Position) -> Option<Piece> {}
impl<F: Fn(Position) -> Option<Piece>> PieceAt for F {}

/// Looks up the square a piece stands on.
pub trait PosOf: Fn(PieceId) -> Option<Position> {}
impl<F: Fn(PieceId) -> Option<Position>> PosOf for F {}

/// The most recent move made by a side, if it is still en passant relevant.
pub trait LastMove: Fn(Side) -> Option<Move> {}
impl<F: Fn(Side) -> Option<Move>> LastMove for F {}

pub(crate) fn locate(piece: &Piece, pos_of: &impl PosOf) -> Result<Position, MoveGenError> {
    pos_of(piece.id).ok_or(MoveGenError::PieceNotInBoard(piece.id))
}

/// Moves of any non-king piece, in the piece's canonical frame. Kings depend on
/// every other piece's moves and go through [`king::gen_king_moves`] instead.
pub fn gen_piece_moves(
    piece: &Piece,
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
    last_move: &impl LastMove,
) -> Result<Vec<Move>, MoveGenError> {
    match piece.kind {
        PieceKind::Pawn => pawn::gen_pawn_moves(piece, piece_at, pos_of, last_move),
        PieceKind::Knight => knight::gen_knight_moves(piece, piece_at, pos_of),
        PieceKind::Bishop => {
            sliding_pieces::gen_sliding_moves(piece, &Direction::DIAGONAL, piece_at, pos_of)
        }
        PieceKind::Rook => {
            sliding_pieces::gen_sliding_moves(piece, &Direction::ORTHOGONAL, piece_at, pos_of)
        }
        PieceKind::Queen => sliding_pieces::gen_sliding_moves(
            piece,
            &sliding_pieces::ALL_DIRECTIONS,
            piece_at,
            pos_of,
        ),
        PieceKind::King(_) => Ok(Vec::new()),
    }
}
