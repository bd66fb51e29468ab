use log::info;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::board::{Board, BoardError};
use crate::moves::Move;
use crate::piece::Promotion;
use crate::position::Position;
use crate::setup;
use crate::side::Side;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    pub sides: Vec<Side>,
    pub first: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sides: vec![Side::Green, Side::Yellow, Side::Red, Side::Blue],
            first: Side::Green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
pub enum SideStatus {
    Active,
    Eliminated,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: Side, got: Side },
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("no piece at {0}")]
    NoPieceAt(Position),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Turn sequencing over a [`Board`]. A side is out once it has no pieces left,
/// which happens when it runs out of legal moves or loses its king.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Side,
    config: Option<GameConfig>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut sides = config.sides.clone();
        sides.sort();
        sides.dedup();
        let board = Board::new(setup::for_sides(&sides))?;
        let mut game = Self::with_board(board, config.first);
        game.config = Some(config);
        Ok(game)
    }

    /// Continues from an arbitrary board. If `first` has no pieces the turn
    /// passes to the next side that does.
    pub fn with_board(board: Board, first: Side) -> Self {
        let mut game = Self {
            board,
            turn: first,
            config: None,
        };
        if !game.board.sides().contains(&first) {
            game.advance_turn();
        }
        game
    }

    /// Rebuilds a game by playing a recorded move list.
    pub fn replay(
        config: GameConfig,
        moves: impl IntoIterator<Item = Move>,
    ) -> Result<Self, GameError> {
        let mut game = Self::new(config)?;
        for mve in moves {
            game.play(mve)?;
        }
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The configuration the game was started from, `None` for games built
    /// on a custom board.
    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    pub fn current_turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self, side: Side) -> SideStatus {
        if self.board.sides().contains(&side) {
            SideStatus::Active
        } else {
            SideStatus::Eliminated
        }
    }

    pub fn active_sides(&self) -> Vec<Side> {
        self.board.sides()
    }

    pub fn is_over(&self) -> bool {
        self.active_sides().len() <= 1
    }

    pub fn winner(&self) -> Option<Side> {
        match self.active_sides().as_slice() {
            [winner] => Some(*winner),
            _ => None,
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.legal_moves(self.turn)
    }

    /// The legal move of the side to move going from `from` to `to`.
    /// `promotion` must be given exactly when the move promotes.
    pub fn find_move(
        &self,
        from: Position,
        to: Position,
        promotion: Option<Promotion>,
    ) -> Result<Move, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let piece = self.board.get_piece(from).ok_or(GameError::NoPieceAt(from))?;
        if piece.side != self.turn {
            return Err(GameError::NotYourTurn {
                expected: self.turn,
                got: piece.side,
            });
        }
        self.board
            .get_readonly_moves(piece.id)
            .into_iter()
            .find(|mve| mve.dest == to && mve.promotion() == promotion)
            .ok_or_else(|| {
                let suffix = promotion.map_or(String::new(), |promotion| format!("={}", promotion));
                GameError::IllegalMove(format!("{} {}-{}{}", piece, from, to, suffix))
            })
    }

    pub fn play(&mut self, mve: Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if mve.piece.side != self.turn {
            return Err(GameError::NotYourTurn {
                expected: self.turn,
                got: mve.piece.side,
            });
        }
        if !self.board.get_readonly_moves(mve.piece.id).contains(&mve) {
            return Err(GameError::IllegalMove(mve.to_string()));
        }

        self.board.do_move(mve)?;
        self.eliminate_kingless()?;
        self.advance_turn();

        if let Some(winner) = self.winner() {
            info!("game over, {} wins", winner);
        }
        Ok(())
    }

    fn eliminate_kingless(&mut self) -> Result<(), BoardError> {
        for side in self.board.sides() {
            if self.board.king(side).is_none() {
                info!("{} lost its king and is eliminated", side);
                self.board.remove(side)?;
            }
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        let active = self.board.sides();
        let mut next = self.turn.next();
        for _ in 0..4 {
            if active.contains(&next) {
                self.turn = next;
                return;
            }
            next = next.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveType;
    use crate::piece::{CastlingRooks, Piece, PieceId, PieceKind};
    use test_case::test_case;
    use testresult::TestResult;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col).expect("valid test square")
    }

    #[test]
    fn test_turns_rotate() -> TestResult {
        let mut game = Game::new(GameConfig::default())?;
        assert_eq!(game.current_turn(), Side::Green);
        assert_eq!(game.legal_moves().len(), 20);

        for (from, to, next) in [
            ((13, 7), (11, 7), Side::Yellow),
            ((7, 2), (7, 4), Side::Red),
            ((2, 8), (4, 8), Side::Blue),
            ((8, 13), (8, 11), Side::Green),
        ] {
            let mve = game.find_move(pos(from.0, from.1), pos(to.0, to.1), None)?;
            assert_eq!(mve.kind, MoveType::PawnDouble);
            game.play(mve)?;
            assert_eq!(game.current_turn(), next);
        }
        assert_eq!(game.board().history().len(), 4);
        Ok(())
    }

    #[test_case((2, 7), (3, 7), GameError::NotYourTurn { expected: Side::Green, got: Side::Red } ; "wrong side")]
    #[test_case((12, 7), (11, 7), GameError::NoPieceAt(pos(12, 7)) ; "empty square")]
    #[test_case((13, 7), (10, 7), GameError::IllegalMove("gP 13,7-10,7".to_string()) ; "triple step")]
    fn test_find_move_errors(from: (i8, i8), to: (i8, i8), want: GameError) -> TestResult {
        let game = Game::new(GameConfig::default())?;
        assert_eq!(
            game.find_move(pos(from.0, from.1), pos(to.0, to.1), None),
            Err(want)
        );
        Ok(())
    }

    #[test]
    fn test_play_rejects_out_of_turn_and_stale_moves() -> TestResult {
        let mut game = Game::new(GameConfig::default())?;
        let green_move = game.find_move(pos(13, 5), pos(12, 5), None)?;
        game.play(green_move)?;

        assert_eq!(
            game.play(green_move),
            Err(GameError::NotYourTurn {
                expected: Side::Yellow,
                got: Side::Green
            })
        );
        let pawn = game.board().get_piece(pos(7, 2)).expect("yellow pawn");
        let bogus = Move::simple(pawn, pos(7, 6));
        assert_eq!(
            game.play(bogus),
            Err(GameError::IllegalMove(bogus.to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_two_sided_config() -> TestResult {
        let game = Game::new(GameConfig {
            sides: vec![Side::Red, Side::Green],
            first: Side::Yellow,
        })?;
        assert_eq!(game.current_turn(), Side::Red);
        assert_eq!(game.status(Side::Yellow), SideStatus::Eliminated);
        assert_eq!(game.status(Side::Green), SideStatus::Active);
        assert_eq!(game.active_sides(), vec![Side::Green, Side::Red]);
        assert!(!game.is_over());
        Ok(())
    }

    fn king_hunt(sides_with_kings: &[Side]) -> Result<(Game, Piece), GameError> {
        let mut placement = Vec::new();
        let squares = [
            (Side::Green, pos(14, 8)),
            (Side::Yellow, pos(8, 1)),
            (Side::Red, pos(1, 7)),
        ];
        for (id, (side, square)) in squares.into_iter().enumerate() {
            if sides_with_kings.contains(&side) {
                placement.push((
                    square,
                    Piece::king(PieceId(id as u32), side, CastlingRooks::default()),
                ));
            }
        }
        let rook = Piece::new(PieceId(10), Side::Red, PieceKind::Rook);
        placement.push((pos(5, 8), rook));
        placement.push((pos(13, 11), Piece::new(PieceId(11), Side::Green, PieceKind::Pawn)));

        let board = Board::new(placement)?;
        Ok((Game::with_board(board, Side::Red), rook))
    }

    #[test]
    fn test_losing_the_king_eliminates() -> TestResult {
        let (mut game, rook) = king_hunt(&[Side::Green, Side::Yellow, Side::Red])?;
        assert!(game.board().is_in_check(Side::Green));

        game.play(Move::simple(rook, pos(14, 8)))?;

        assert_eq!(game.status(Side::Green), SideStatus::Eliminated);
        assert_eq!(game.board().get_piece(pos(13, 11)), None);
        assert_eq!(game.current_turn(), Side::Yellow);
        assert!(!game.is_over());
        assert_eq!(game.winner(), None);
        Ok(())
    }

    #[test]
    fn test_last_side_standing_wins() -> TestResult {
        let (mut game, rook) = king_hunt(&[Side::Green, Side::Red])?;
        game.play(Move::simple(rook, pos(14, 8)))?;

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Side::Red));
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.find_move(pos(1, 7), pos(2, 7), None),
            Err(GameError::GameOver)
        );
        Ok(())
    }

    #[test]
    fn test_replay_matches_live_game() -> TestResult {
        let mut live = Game::new(GameConfig::default())?;
        for (from, to) in [((13, 6), (11, 6)), ((6, 2), (6, 3)), ((1, 5), (3, 4))] {
            let mve = live.find_move(pos(from.0, from.1), pos(to.0, to.1), None)?;
            live.play(mve)?;
        }

        let replayed = Game::replay(
            GameConfig::default(),
            live.board().history().moves().to_vec(),
        )?;
        assert_eq!(replayed.board().pieces(), live.board().pieces());
        assert_eq!(replayed.current_turn(), Side::Blue);
        Ok(())
    }
}
