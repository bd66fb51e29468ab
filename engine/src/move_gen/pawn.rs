use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::moves::{Move, MoveType};
use crate::piece::{Piece, PieceKind, Promotion};
use crate::position::{Position, PositionError};
use crate::side::Side;

use super::{locate, LastMove, MoveGenError, PieceAt, PosOf};

/// Canonical row pawns start on.
pub const PAWN_START_ROW: i8 = 13;
/// Canonical row where pawns promote.
pub const PROMOTION_ROW: i8 = 1;

pub fn gen_pawn_moves(
    piece: &Piece,
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
    last_move: &impl LastMove,
) -> Result<Vec<Move>, MoveGenError> {
    let from = locate(piece, pos_of)?;
    let mut moves = Vec::with_capacity(8);

    add_forward_moves(piece, from, piece_at, &mut moves);
    add_captures(piece, from, piece_at, &mut moves);
    add_en_passants(piece, from, piece_at, last_move, &mut moves);

    Ok(moves)
}

fn add_forward_moves(piece: &Piece, from: Position, piece_at: &impl PieceAt, moves: &mut Vec<Move>) {
    let Ok(one_ahead) = from.top() else {
        return;
    };
    if piece_at(one_ahead).is_some() {
        return;
    }
    add_maybe_promoting(piece, one_ahead, moves);

    if from.row() == PAWN_START_ROW {
        if let Ok(two_ahead) = one_ahead.top() {
            if piece_at(two_ahead).is_none() {
                moves.push(Move::new(*piece, MoveType::PawnDouble, two_ahead));
            }
        }
    }
}

fn add_captures(piece: &Piece, from: Position, piece_at: &impl PieceAt, moves: &mut Vec<Move>) {
    for dest in [from.top_left(), from.top_right()].into_iter().flatten() {
        if let Some(occupant) = piece_at(dest) {
            if occupant.side != piece.side {
                add_maybe_promoting(piece, dest, moves);
            }
        }
    }
}

fn add_maybe_promoting(piece: &Piece, dest: Position, moves: &mut Vec<Move>) {
    if dest.row() == PROMOTION_ROW {
        moves.extend(
            Promotion::iter().map(|promotion| Move::new(*piece, MoveType::Promotion(promotion), dest)),
        );
    } else {
        moves.push(Move::simple(*piece, dest));
    }
}

/// Where an en passant victim may stand relative to the capturing pawn, which
/// side it must belong to, and the square the capturing pawn lands on.
struct Disposition {
    victim_pos: Position,
    victim_side: Side,
    dest: Position,
}

/// En passant needs the victim's double step to be the last move of the game,
/// so in normal turn order only the right side, which moves just before us,
/// is ever capturable. The other three dispositions need a custom position.
fn dispositions(side: Side, from: Position) -> ArrayVec<Disposition, 4> {
    // A left-side pawn crossing in front of us skipped the square to our top
    // left, a right-side pawn the one to our top right. A pawn from the front
    // that stopped beside us skipped the square diagonally ahead on that flank.
    let candidates: [(Result<Position, PositionError>, Side, Result<Position, PositionError>); 4] = [
        (from.top(), side.left(), from.top_left()),
        (from.top(), side.right(), from.top_right()),
        (from.left(), side.front(), from.top_left()),
        (from.right(), side.front(), from.top_right()),
    ];
    candidates
        .into_iter()
        .filter_map(|(victim_pos, victim_side, dest)| {
            Some(Disposition {
                victim_pos: victim_pos.ok()?,
                victim_side,
                dest: dest.ok()?,
            })
        })
        .collect()
}

fn add_en_passants(
    piece: &Piece,
    from: Position,
    piece_at: &impl PieceAt,
    last_move: &impl LastMove,
    moves: &mut Vec<Move>,
) {
    for disposition in dispositions(piece.side, from) {
        let Some(victim) = piece_at(disposition.victim_pos) else {
            continue;
        };
        if victim.side != disposition.victim_side || victim.kind != PieceKind::Pawn {
            continue;
        }
        let just_double_stepped = last_move(victim.side)
            .map_or(false, |mve| mve.kind == MoveType::PawnDouble && mve.piece.id == victim.id);
        if just_double_stepped && piece_at(disposition.dest).is_none() {
            moves.push(Move::en_passant(*piece, disposition.dest, victim));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_gen::test_board::{dests, no_last_move, TestBoard};
    use testresult::TestResult;

    fn double_step_by(victim: Piece) -> impl Fn(Side) -> Option<Move> {
        move |side| {
            (side == victim.side).then(|| {
                Move::new(
                    victim,
                    MoveType::PawnDouble,
                    Position::new(1, 4).expect("valid"),
                )
            })
        }
    }

    #[test]
    fn test_double_step_from_start_row() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 13, 6);
        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert_eq!(dests(&moves), vec![(11, 6), (12, 6)]);
        assert!(moves
            .iter()
            .any(|mve| mve.kind == MoveType::PawnDouble && mve.dest.row() == 11));
        Ok(())
    }

    #[test]
    fn test_no_double_step_off_start_row() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 12, 6);
        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert_eq!(dests(&moves), vec![(11, 6)]);
        Ok(())
    }

    #[test]
    fn test_double_step_needs_both_squares_empty() -> TestResult {
        let mut board = TestBoard::default();
        let blocked_far = board.place(Side::Green, PieceKind::Pawn, 13, 6);
        board.place(Side::Red, PieceKind::Knight, 11, 6);
        let blocked_near = board.place(Side::Green, PieceKind::Pawn, 13, 8);
        board.place(Side::Red, PieceKind::Knight, 12, 8);

        let far = gen_pawn_moves(&blocked_far, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert_eq!(dests(&far), vec![(12, 6)]);
        let near = gen_pawn_moves(&blocked_near, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert!(near.is_empty());
        Ok(())
    }

    #[test]
    fn test_diagonal_captures_only_enemies() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 11, 4);
        board.place(Side::Yellow, PieceKind::Pawn, 10, 3);
        board.place(Side::Green, PieceKind::Knight, 10, 5);

        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert_eq!(dests(&moves), vec![(10, 3), (10, 4)]);
        Ok(())
    }

    #[test]
    fn test_promotion_emits_four_moves() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 2, 6);
        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &no_last_move)?;

        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mve| mve.promotion().is_some() && mve.dest.row() == 1));
        let mut promotions: Vec<_> = moves.iter().filter_map(|mve| mve.promotion()).collect();
        promotions.sort();
        assert_eq!(
            promotions,
            vec![Promotion::Queen, Promotion::Rook, Promotion::Bishop, Promotion::Knight]
        );
        Ok(())
    }

    #[test]
    fn test_capture_onto_last_row_promotes() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 2, 6);
        board.place(Side::Red, PieceKind::Rook, 1, 6);
        board.place(Side::Red, PieceKind::Rook, 1, 7);

        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &no_last_move)?;
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mve| (mve.dest.row(), mve.dest.col()) == (1, 7)));
        Ok(())
    }

    #[test]
    fn test_previous_mover_crosses_in_front() -> TestResult {
        let from = Position::new(7, 7)?;
        for side in Side::iter() {
            let previous = Side::iter()
                .find(|other| other.next() == side)
                .expect("sides are cyclic");
            let crossing: Vec<_> = dispositions(side, from)
                .into_iter()
                .filter(|disposition| disposition.victim_side == previous)
                .collect();
            assert_eq!(crossing.len(), 1, "{}", side);
            assert_eq!(Ok(crossing[0].victim_pos), from.top());
            assert_eq!(Ok(crossing[0].dest), from.top_right());
        }
        Ok(())
    }

    #[test]
    fn test_front_en_passant() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 4, 7);
        let victim = board.place(Side::Red, PieceKind::Pawn, 4, 8);

        let moves = gen_pawn_moves(
            &pawn,
            &board.piece_at(),
            &board.pos_of(),
            &double_step_by(victim),
        )?;

        assert_eq!(dests(&moves), vec![(3, 7), (3, 8)]);
        let en_passant = moves
            .iter()
            .find(|mve| mve.kind == MoveType::EnPassant)
            .expect("missing en passant");
        assert_eq!(en_passant.en_passant_victim, Some(victim));
        Ok(())
    }

    #[test]
    fn test_lateral_en_passant() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 11, 4);
        let victim = board.place(Side::Yellow, PieceKind::Pawn, 10, 4);

        let moves = gen_pawn_moves(
            &pawn,
            &board.piece_at(),
            &board.pos_of(),
            &double_step_by(victim),
        )?;

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].kind, MoveType::EnPassant);
        assert_eq!((moves[0].dest.row(), moves[0].dest.col()), (10, 3));
        Ok(())
    }

    #[test]
    fn test_no_en_passant_without_double_step() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 4, 7);
        let victim = board.place(Side::Red, PieceKind::Pawn, 4, 8);
        let single_step = move |side: Side| {
            (side == Side::Red).then(|| Move::simple(victim, Position::new(4, 8).expect("valid")))
        };

        let moves = gen_pawn_moves(&pawn, &board.piece_at(), &board.pos_of(), &single_step)?;
        assert!(moves.iter().all(|mve| mve.kind != MoveType::EnPassant));
        Ok(())
    }

    #[test]
    fn test_no_en_passant_against_wrong_side() -> TestResult {
        let mut board = TestBoard::default();
        let pawn = board.place(Side::Green, PieceKind::Pawn, 4, 7);
        // A right-side pawn beside us moves along our rank, so it never skips a
        // square we could land on.
        let victim = board.place(Side::Blue, PieceKind::Pawn, 4, 8);

        let moves = gen_pawn_moves(
            &pawn,
            &board.piece_at(),
            &board.pos_of(),
            &double_step_by(victim),
        )?;
        assert!(moves.iter().all(|mve| mve.kind != MoveType::EnPassant));
        Ok(())
    }
}
