use crate::moves::Move;
use crate::piece::Piece;

use super::{locate, MoveGenError, PieceAt, PosOf};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
];

pub fn gen_knight_moves(
    piece: &Piece,
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
) -> Result<Vec<Move>, MoveGenError> {
    let from = locate(piece, pos_of)?;
    let moves = KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(d_row, d_col)| from.offset(d_row, d_col).ok())
        .filter(|&dest| piece_at(dest).map_or(true, |occupant| occupant.side != piece.side))
        .map(|dest| Move::simple(*piece, dest))
        .collect();
    Ok(moves)
}
