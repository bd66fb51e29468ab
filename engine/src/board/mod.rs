//! The board: who stands where, what each piece may do next, and how moves
//! change that.

mod possible_moves;

pub use possible_moves::PossibleMoves;

use std::collections::HashMap;
use std::fmt;

use log::{debug, info, trace};
use strum::IntoEnumIterator;

use crate::history::History;
use crate::move_gen::king::{castling_step, gen_king_moves};
use crate::move_gen::{gen_piece_moves, MoveGenError};
use crate::moves::{Move, MoveType};
use crate::piece::{Piece, PieceId, PieceKind};
use crate::position::{Position, PositionError, BOARD_SIZE};
use crate::side::Side;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("position {0} is already occupied")]
    PositionOccupied(Position),
    #[error("piece {0} is already placed")]
    PieceAlreadyPlaced(PieceId),
    #[error("{0} already has a king")]
    DuplicateKing(Side),
    #[error("piece {0} is not on the board")]
    PieceNotInBoard(PieceId),
    #[error("move {0} is missing data its type requires")]
    MalformedMove(Move),
    #[error("no piece identities left to hand out")]
    IdsExhausted,
    #[error(transparent)]
    Position(#[from] PositionError),
}

impl From<MoveGenError> for BoardError {
    fn from(err: MoveGenError) -> Self {
        match err {
            MoveGenError::PieceNotInBoard(id) => BoardError::PieceNotInBoard(id),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    pieces: HashMap<Position, Piece>,
    positions: HashMap<PieceId, Position>,
    kings: HashMap<Side, Piece>,
    history: History,
    possible_moves: PossibleMoves,
    next_id: u32,
    // Hypothetical boards built during check resolution only index moves.
    simulation: bool,
}

impl Board {
    pub fn new(placement: impl IntoIterator<Item = (Position, Piece)>) -> Result<Self, BoardError> {
        let mut board = Board {
            pieces: HashMap::new(),
            positions: HashMap::new(),
            kings: HashMap::new(),
            history: History::new(),
            possible_moves: PossibleMoves::default(),
            next_id: 0,
            simulation: false,
        };

        for (pos, piece) in placement {
            if board.pieces.contains_key(&pos) {
                return Err(BoardError::PositionOccupied(pos));
            }
            if board.positions.contains_key(&piece.id) {
                return Err(BoardError::PieceAlreadyPlaced(piece.id));
            }
            if piece.is_king() {
                if board.kings.contains_key(&piece.side) {
                    return Err(BoardError::DuplicateKing(piece.side));
                }
                board.kings.insert(piece.side, piece);
            }
            board.place(pos, piece);
            let after = piece.id.0.checked_add(1).ok_or(BoardError::IdsExhausted)?;
            board.next_id = board.next_id.max(after);
        }

        board.reevaluate()?;
        Ok(board)
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.pieces.get(&pos).copied()
    }

    pub fn get_pos(&self, piece: PieceId) -> Option<Position> {
        self.positions.get(&piece).copied()
    }

    /// Legal moves of `piece`, ordered by target square then move type.
    pub fn get_readonly_moves(&self, piece: PieceId) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .possible_moves
            .get(piece)
            .map(|moves| moves.iter().copied().collect())
            .unwrap_or_default();
        moves.sort_by_key(|mve| (mve.dest, mve.kind));
        moves
    }

    /// Legal moves of every piece of `side`, ordered by piece, target square
    /// then move type.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = self.possible_moves.all_moves(side);
        moves.sort_by_key(|mve| (mve.piece.id, mve.dest, mve.kind));
        moves
    }

    pub fn possible_moves(&self) -> &PossibleMoves {
        &self.possible_moves
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Every piece on the board with its square, row by row.
    pub fn pieces(&self) -> Vec<(Position, Piece)> {
        let mut pieces: Vec<_> = self.pieces.iter().map(|(&pos, &piece)| (pos, piece)).collect();
        pieces.sort_by_key(|(pos, _)| *pos);
        pieces
    }

    pub fn king(&self, side: Side) -> Option<Piece> {
        self.kings.get(&side).copied()
    }

    /// Sides with at least one piece left, in turn order.
    pub fn sides(&self) -> Vec<Side> {
        Side::iter()
            .filter(|&side| self.pieces.values().any(|piece| piece.side == side))
            .collect()
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.king(side)
            .and_then(|king| self.get_pos(king.id))
            .map_or(false, |pos| self.possible_moves.is_dangerous(pos, side))
    }

    pub fn is_checkmate(&self, side: Side) -> bool {
        self.possible_moves.has_no_moves(side)
    }

    pub fn do_move(&mut self, mve: Move) -> Result<(), BoardError> {
        let piece = mve.piece;
        if !self.positions.contains_key(&piece.id) {
            return Err(BoardError::PieceNotInBoard(piece.id));
        }

        match mve.kind {
            MoveType::Simple | MoveType::PawnDouble => self.relocate(piece, mve.dest)?,
            MoveType::EnPassant => {
                let victim = mve.en_passant_victim.ok_or(BoardError::MalformedMove(mve))?;
                self.remove_piece(victim.id)?;
                self.relocate(piece, mve.dest)?;
            }
            MoveType::Promotion(promotion) => {
                let next_id = self.next_id.checked_add(1).ok_or(BoardError::IdsExhausted)?;
                self.remove_piece(piece.id)?;
                if let Some(occupant) = self.get_piece(mve.dest) {
                    self.remove_piece(occupant.id)?;
                }
                let promoted = Piece::new(PieceId(self.next_id), piece.side, promotion.into());
                self.next_id = next_id;
                self.place(mve.dest, promoted);
            }
            MoveType::KingsideCastling | MoveType::QueensideCastling => self.castle(mve)?,
        }

        self.history.add_move(mve);
        self.reevaluate()
    }

    /// Takes every piece of `side` off the board.
    pub fn remove(&mut self, side: Side) -> Result<(), BoardError> {
        self.remove_side(side)?;
        self.reevaluate()
    }

    fn castle(&mut self, mve: Move) -> Result<(), BoardError> {
        let king = mve.piece;
        let PieceKind::King(rooks) = king.kind else {
            return Err(BoardError::MalformedMove(mve));
        };
        let rook_id = match mve.kind {
            MoveType::KingsideCastling => rooks.kingside,
            _ => rooks.queenside,
        }
        .ok_or(BoardError::MalformedMove(mve))?;
        let rook = self
            .get_pos(rook_id)
            .and_then(|pos| self.get_piece(pos))
            .ok_or(BoardError::PieceNotInBoard(rook_id))?;
        let king_pos = self
            .get_pos(king.id)
            .ok_or(BoardError::PieceNotInBoard(king.id))?;

        let step = castling_step(king.side, mve.kind);
        let canonical = king_pos.to_canonical(king.side);
        let rook_dest = canonical.offset(0, step)?.from_canonical(king.side);
        let king_dest = canonical.offset(0, 2 * step)?.from_canonical(king.side);

        self.relocate(rook, rook_dest)?;
        self.relocate(king, king_dest)
    }

    fn place(&mut self, pos: Position, piece: Piece) {
        self.pieces.insert(pos, piece);
        self.positions.insert(piece.id, pos);
    }

    /// Moves `piece` to `dest`, capturing whatever stands there.
    fn relocate(&mut self, piece: Piece, dest: Position) -> Result<(), BoardError> {
        let from = self
            .positions
            .get(&piece.id)
            .copied()
            .ok_or(BoardError::PieceNotInBoard(piece.id))?;
        if let Some(occupant) = self.get_piece(dest) {
            if occupant.id != piece.id {
                self.remove_piece(occupant.id)?;
            }
        }
        let piece = self.pieces.remove(&from).unwrap_or(piece);
        self.place(dest, piece);
        Ok(())
    }

    fn remove_piece(&mut self, id: PieceId) -> Result<Piece, BoardError> {
        let pos = self
            .positions
            .remove(&id)
            .ok_or(BoardError::PieceNotInBoard(id))?;
        let piece = self
            .pieces
            .remove(&pos)
            .ok_or(BoardError::PieceNotInBoard(id))?;
        if self.kings.get(&piece.side).map(|king| king.id) == Some(id) {
            self.kings.remove(&piece.side);
        }
        Ok(piece)
    }

    fn remove_side(&mut self, side: Side) -> Result<(), BoardError> {
        let ids: Vec<PieceId> = self
            .pieces
            .values()
            .filter(|piece| piece.side == side)
            .map(|piece| piece.id)
            .collect();
        for id in ids {
            self.remove_piece(id)?;
        }
        Ok(())
    }

    fn reevaluate(&mut self) -> Result<(), BoardError> {
        loop {
            self.possible_moves = self.gen_possible_moves()?;
            if self.simulation {
                return Ok(());
            }
            self.resolve_checks()?;

            let stuck: Vec<Side> = self
                .sides()
                .into_iter()
                .filter(|&side| self.possible_moves.has_no_moves(side))
                .collect();
            if stuck.is_empty() {
                debug!(
                    "reevaluated {} pieces, {} moves",
                    self.pieces.len(),
                    self.possible_moves.len()
                );
                return Ok(());
            }
            for side in stuck {
                info!("{} has no legal moves and is eliminated", side);
                self.remove_side(side)?;
            }
        }
    }

    fn gen_possible_moves(&self) -> Result<PossibleMoves, BoardError> {
        let mut possible_moves = PossibleMoves::default();
        for piece in self.pieces.values().filter(|piece| !piece.is_king()) {
            for mve in self.gen_rotated_moves(piece)? {
                possible_moves.add(mve);
            }
        }

        let kings: Vec<Piece> = self.kings.values().copied().collect();
        let king_moves = gen_king_moves(
            &kings,
            &|pos: Position| self.get_piece(pos),
            &|id: PieceId| self.get_pos(id),
            &|pos: Position, side: Side| possible_moves.is_dangerous(pos, side),
            &|id: PieceId| self.history.moved_before(id),
        )?;
        for mve in king_moves {
            possible_moves.add(mve);
        }
        Ok(possible_moves)
    }

    /// Runs the generator for `piece` from its own seat and maps the result
    /// back to absolute coordinates.
    fn gen_rotated_moves(&self, piece: &Piece) -> Result<Vec<Move>, BoardError> {
        let side = piece.side;
        let piece_at = |pos: Position| self.get_piece(pos.from_canonical(side));
        let pos_of = |id: PieceId| self.get_pos(id).map(|pos| pos.to_canonical(side));
        // Only the move just played can enable en passant.
        let last_move = |mover: Side| {
            self.history
                .last_move()
                .filter(|mve| mve.piece.side == mover)
                .map(|mve| mve.with_dest(mve.dest.to_canonical(side)))
        };

        let moves = gen_piece_moves(piece, &piece_at, &pos_of, &last_move)?;
        Ok(moves
            .into_iter()
            .map(|mve| mve.with_dest(mve.dest.from_canonical(side)))
            .collect())
    }

    fn hypothetical(&self) -> Board {
        Board {
            pieces: self.pieces.clone(),
            positions: self.positions.clone(),
            kings: self.kings.clone(),
            history: self.history.clone(),
            possible_moves: PossibleMoves::default(),
            next_id: self.next_id,
            simulation: true,
        }
    }

    /// Drops every move that would leave a threatened king attacked.
    fn resolve_checks(&mut self) -> Result<(), BoardError> {
        let threatened: Vec<Piece> = self
            .kings
            .values()
            .filter(|king| self.is_in_check(king.side))
            .copied()
            .collect();

        for king in threatened {
            let candidates = self.possible_moves.all_moves(king.side);
            let mut pruned = 0;
            for mve in &candidates {
                let mut hypothetical = self.hypothetical();
                hypothetical.do_move(*mve)?;
                let safe = hypothetical
                    .king(king.side)
                    .filter(|survivor| survivor.id == king.id)
                    .map_or(false, |_| !hypothetical.is_in_check(king.side));
                if !safe {
                    trace!("{:?} leaves {} in check", mve, king.side);
                    self.possible_moves.remove(mve);
                    pruned += 1;
                }
            }
            debug!(
                "{} is in check: {} of {} moves kept",
                king.side,
                candidates.len() - pruned,
                candidates.len()
            );
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=BOARD_SIZE {
            write!(f, "{:>2} ", row)?;
            for col in 1..=BOARD_SIZE {
                let cell = match Position::new(row, col) {
                    Ok(pos) => self
                        .get_piece(pos)
                        .map_or_else(|| "..".to_string(), |piece| piece.to_string()),
                    Err(_) => "  ".to_string(),
                };
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 1..=BOARD_SIZE {
            write!(f, " {:>2}", col)?;
        }
        writeln!(f)
    }
}
