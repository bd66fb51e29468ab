use crate::moves::Move;
use crate::piece::Piece;
use crate::position::{Direction, Position};

use super::{locate, MoveGenError, PieceAt, PosOf};

pub(crate) const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// Walks from `from` one square at a time. Stops at the board edge or at the
/// first occupied square, which is only a target when it holds an enemy.
pub(crate) fn sweep(
    piece: &Piece,
    from: Position,
    direction: Direction,
    piece_at: &impl PieceAt,
    moves: &mut Vec<Move>,
) {
    let mut curr = from;
    while let Ok(next) = curr.neighbor(direction) {
        match piece_at(next) {
            Some(occupant) => {
                if occupant.side != piece.side {
                    moves.push(Move::simple(*piece, next));
                }
                break;
            }
            None => moves.push(Move::simple(*piece, next)),
        }
        curr = next;
    }
}

pub fn gen_sliding_moves(
    piece: &Piece,
    directions: &[Direction],
    piece_at: &impl PieceAt,
    pos_of: &impl PosOf,
) -> Result<Vec<Move>, MoveGenError> {
    let from = locate(piece, pos_of)?;
    let mut moves = Vec::with_capacity(28);
    for &direction in directions {
        sweep(piece, from, direction, piece_at, &mut moves);
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::move_gen::test_board::{dests, TestBoard};
    use crate::piece::PieceKind;
    use crate::side::Side;
    use test_case::test_case;

    #[test]
    fn test_lone_rook_reaches_every_edge() -> testresult::TestResult {
        let mut board = TestBoard::default();
        let rook = board.place(Side::Green, PieceKind::Rook, 7, 7);

        let moves = gen_sliding_moves(
            &rook,
            &Direction::ORTHOGONAL,
            &board.piece_at(),
            &board.pos_of(),
        )?;

        let unique: HashSet<_> = moves.iter().map(|mve| mve.dest).collect();
        assert_eq!(unique.len(), moves.len());
        // 6 up, 7 down, 6 left, 7 right
        assert_eq!(moves.len(), 26);
        assert!(moves.iter().any(|mve| (mve.dest.row(), mve.dest.col()) == (1, 7)));
        assert!(moves.iter().any(|mve| (mve.dest.row(), mve.dest.col()) == (7, 14)));
        Ok(())
    }

    #[test]
    fn test_queen_with_blockers() -> testresult::TestResult {
        let mut board = TestBoard::default();
        let queen = board.place(Side::Green, PieceKind::Queen, 7, 7);
        board.place(Side::Red, PieceKind::Pawn, 7, 9);
        board.place(Side::Green, PieceKind::Pawn, 9, 7);

        let moves = gen_sliding_moves(&queen, &ALL_DIRECTIONS, &board.piece_at(), &board.pos_of())?;

        assert_eq!(moves.len(), 30);
        let got = dests(&moves);
        assert!(got.contains(&(7, 9)), "enemy square is a capture");
        assert!(!got.contains(&(7, 10)), "nothing behind the enemy");
        assert!(!got.contains(&(9, 7)), "own piece is not a target");
        assert!(got.contains(&(8, 7)));
        Ok(())
    }

    #[test_case(Direction::North, vec![(6, 7), (5, 7)] ; "stops before ally")]
    #[test_case(Direction::East, vec![(7, 8), (7, 9)] ; "includes enemy")]
    #[test_case(Direction::NorthWest, vec![(6, 6), (5, 5), (4, 4)] ; "stops at cutout")]
    fn test_sweep(direction: Direction, want: Vec<(i8, i8)>) -> testresult::TestResult {
        let mut board = TestBoard::default();
        let bishop = board.place(Side::Blue, PieceKind::Bishop, 7, 7);
        board.place(Side::Blue, PieceKind::Knight, 4, 7);
        board.place(Side::Yellow, PieceKind::Knight, 7, 9);

        let mut moves = Vec::new();
        sweep(
            &bishop,
            Position::new(7, 7)?,
            direction,
            &board.piece_at(),
            &mut moves,
        );
        assert_eq!(dests(&moves), {
            let mut want = want;
            want.sort();
            want
        });
        Ok(())
    }
}
