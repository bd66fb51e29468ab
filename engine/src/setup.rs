//! The standard starting placement.

use strum::IntoEnumIterator;

use crate::move_gen::pawn::PAWN_START_ROW;
use crate::piece::{CastlingRooks, Piece, PieceId, PieceKind};
use crate::position::{Position, BOARD_SIZE, CUTOUT_SIZE};
use crate::side::Side;

/// Canonical row of every back rank.
pub const HOME_ROW: i8 = BOARD_SIZE;
const FIRST_COL: i8 = CUTOUT_SIZE + 1;
const LAST_COL: i8 = BOARD_SIZE - CUTOUT_SIZE;
/// Identities handed to each army; side `n` owns `n * ARMY_SIZE..(n + 1) * ARMY_SIZE`.
pub const ARMY_SIZE: u32 = 16;

/// All four armies.
pub fn standard() -> Vec<(Position, Piece)> {
    for_sides(&Side::iter().collect::<Vec<_>>())
}

/// Only the armies of `sides`. Identities don't depend on which other sides
/// are present.
pub fn for_sides(sides: &[Side]) -> Vec<(Position, Piece)> {
    let mut placement = Vec::with_capacity(sides.len() * ARMY_SIZE as usize);
    for &side in sides {
        placement.extend(army(side));
    }
    placement
}

fn army(side: Side) -> Vec<(Position, Piece)> {
    let base = side.index() as u32 * ARMY_SIZE;
    let square = |row: i8, col: i8| {
        Position::new(row, col)
            .expect("home ranks lie inside the board")
            .from_canonical(side)
    };
    let id = |row: i8, col: i8| {
        let rank_offset = if row == PAWN_START_ROW { 0 } else { (LAST_COL - FIRST_COL + 1) as u32 };
        PieceId(base + rank_offset + (col - FIRST_COL) as u32)
    };

    let mut pieces = Vec::with_capacity(ARMY_SIZE as usize);
    for col in FIRST_COL..=LAST_COL {
        pieces.push((
            square(PAWN_START_ROW, col),
            Piece::new(id(PAWN_START_ROW, col), side, PieceKind::Pawn),
        ));
    }

    let (kingside_rook, queenside_rook) = if side.queen_to_the_left_of_king() {
        (id(HOME_ROW, LAST_COL), id(HOME_ROW, FIRST_COL))
    } else {
        (id(HOME_ROW, FIRST_COL), id(HOME_ROW, LAST_COL))
    };
    let king = PieceKind::King(CastlingRooks {
        kingside: Some(kingside_rook),
        queenside: Some(queenside_rook),
    });
    let (col_7, col_8) = if side.queen_to_the_left_of_king() {
        (PieceKind::Queen, king)
    } else {
        (king, PieceKind::Queen)
    };
    let back_rank = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        col_7,
        col_8,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    for (col, kind) in (FIRST_COL..=LAST_COL).zip(back_rank) {
        pieces.push((square(HOME_ROW, col), Piece::new(id(HOME_ROW, col), side, kind)));
    }

    pieces
}
