use std::collections::HashMap;

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::moves::{Move, MoveType};
use crate::piece::{Piece, PieceId, PieceKind};
use crate::position::{Direction, Position};
use crate::side::Side;

use super::{locate, MoveGenError, PieceAt, PosOf};

/// Columns between a castling king and its rook needed for the king to travel
/// two squares and the rook to land beside it.
const MIN_CASTLING_DISTANCE: i8 = 3;

struct KingCandidates {
    king: Piece,
    pos: Position,
    squares: ArrayVec<Position, 8>,
}

/// Computes every king's moves at once, in absolute coordinates.
///
/// `is_dangerous(pos, side)` must already account for every non-king piece on
/// the board. A square two kings could both step onto is legal for neither, and
/// castling is refused through any square another king could step onto.
pub fn gen_king_moves(
    kings: &[Piece],
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
    is_dangerous: &impl Fn(Position, Side) -> bool,
    moved_before: &impl Fn(PieceId) -> bool,
) -> Result<Vec<Move>, MoveGenError> {
    let mut candidates = Vec::with_capacity(kings.len());
    for king in kings {
        let pos = locate(king, pos_of)?;
        let squares = Direction::iter()
            .filter_map(|direction| pos.neighbor(direction).ok())
            .filter(|&dest| {
                piece_at(dest).map_or(true, |occupant| occupant.side != king.side)
                    && !is_dangerous(dest, king.side)
            })
            .collect();
        candidates.push(KingCandidates {
            king: *king,
            pos,
            squares,
        });
    }

    let mut claims: HashMap<Position, usize> = HashMap::new();
    for candidate in &candidates {
        for &square in &candidate.squares {
            *claims.entry(square).or_default() += 1;
        }
    }

    let mut moves = Vec::new();
    // Uncontested simple moves, with the king that owns each one.
    let mut owners: HashMap<Position, PieceId> = HashMap::new();
    for candidate in &candidates {
        for &square in &candidate.squares {
            if claims.get(&square) == Some(&1) {
                owners.insert(square, candidate.king.id);
                moves.push(Move::simple(candidate.king, square));
            }
        }
    }

    for candidate in &candidates {
        let claimed_by_other_king = |pos: Position| {
            owners
                .get(&pos)
                .map_or(false, |&owner| owner != candidate.king.id)
        };
        add_castling_moves(
            candidate,
            piece_at,
            pos_of,
            is_dangerous,
            moved_before,
            &claimed_by_other_king,
            &mut moves,
        );
    }

    Ok(moves)
}

/// Canonical column step from the king toward the rook it castles with.
pub(crate) fn castling_step(side: Side, kind: MoveType) -> i8 {
    let kingside = if side.queen_to_the_left_of_king() { 1 } else { -1 };
    match kind {
        MoveType::QueensideCastling => -kingside,
        _ => kingside,
    }
}

fn add_castling_moves(
    candidate: &KingCandidates,
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
    is_dangerous: &impl Fn(Position, Side) -> bool,
    moved_before: &impl Fn(PieceId) -> bool,
    claimed_by_other_king: &impl Fn(Position) -> bool,
    moves: &mut Vec<Move>,
) {
    let king = candidate.king;
    let side = king.side;
    let PieceKind::King(rooks) = king.kind else {
        return;
    };
    if moved_before(king.id) || is_dangerous(candidate.pos, side) {
        return;
    }

    for (rook, kind) in [
        (rooks.kingside, MoveType::KingsideCastling),
        (rooks.queenside, MoveType::QueensideCastling),
    ] {
        let Some(rook) = rook else {
            continue;
        };
        let dest = castling_dest(
            candidate.pos,
            side,
            rook,
            castling_step(side, kind),
            piece_at,
            pos_of,
            is_dangerous,
            moved_before,
            claimed_by_other_king,
        );
        if let Some(dest) = dest {
            moves.push(Move::new(king, kind, dest));
        }
    }
}

/// The square the king lands on when castling with `rook`, if that castle is
/// currently allowed.
#[allow(clippy::too_many_arguments)]
fn castling_dest(
    king_pos: Position,
    side: Side,
    rook: PieceId,
    step: i8,
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
    is_dangerous: &impl Fn(Position, Side) -> bool,
    moved_before: &impl Fn(PieceId) -> bool,
    claimed_by_other_king: &impl Fn(Position) -> bool,
) -> Option<Position> {
    let rook_pos = pos_of(rook)?;
    let rook_piece = piece_at(rook_pos)?;
    if moved_before(rook) || rook_piece.side != side || rook_piece.kind != PieceKind::Rook {
        return None;
    }

    let king_canonical = king_pos.to_canonical(side);
    let rook_canonical = rook_pos.to_canonical(side);
    let distance = (rook_canonical.col() - king_canonical.col()) * step;
    if rook_canonical.row() != king_canonical.row() || distance < MIN_CASTLING_DISTANCE {
        return None;
    }

    let square_at = |steps: i8| {
        king_canonical
            .offset(0, step * steps)
            .ok()
            .map(|pos| pos.from_canonical(side))
    };

    for steps in 1..distance {
        if piece_at(square_at(steps)?).is_some() {
            return None;
        }
    }
    for steps in 1..=2 {
        let transit = square_at(steps)?;
        if is_dangerous(transit, side) || claimed_by_other_king(transit) {
            return None;
        }
    }
    square_at(2)
}
