use std::collections::{HashMap, HashSet};

use crate::moves::Move;
use crate::piece::PieceId;
use crate::position::Position;
use crate::side::Side;

/// Every move currently available on a board, by mover and by landing square.
/// Built from scratch on each reevaluation and swapped in whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PossibleMoves {
    by_piece: HashMap<PieceId, HashSet<Move>>,
    by_target: HashMap<(Position, Side), HashSet<Move>>,
}

impl PossibleMoves {
    pub fn add(&mut self, mve: Move) {
        self.by_piece.entry(mve.piece.id).or_default().insert(mve);
        self.by_target
            .entry((mve.dest, mve.piece.side))
            .or_default()
            .insert(mve);
    }

    /// Returns whether the move was present.
    pub fn remove(&mut self, mve: &Move) -> bool {
        let removed = self
            .by_piece
            .get_mut(&mve.piece.id)
            .map_or(false, |moves| moves.remove(mve));
        if let Some(moves) = self.by_target.get_mut(&(mve.dest, mve.piece.side)) {
            moves.remove(mve);
        }
        removed
    }

    pub fn get(&self, piece: PieceId) -> Option<&HashSet<Move>> {
        self.by_piece.get(&piece)
    }

    pub fn all_moves(&self, side: Side) -> Vec<Move> {
        self.by_piece
            .values()
            .flatten()
            .filter(|mve| mve.piece.side == side)
            .copied()
            .collect()
    }

    /// Moves by `side` that land on `pos`.
    pub fn landing_on(&self, pos: Position, side: Side) -> Option<&HashSet<Move>> {
        self.by_target.get(&(pos, side))
    }

    /// Whether any side other than `side` could land on `pos`.
    pub fn is_dangerous(&self, pos: Position, side: Side) -> bool {
        [side.left(), side.front(), side.right()]
            .into_iter()
            .any(|other| self.landing_on(pos, other).map_or(false, |moves| !moves.is_empty()))
    }

    pub fn has_no_moves(&self, side: Side) -> bool {
        !self
            .by_piece
            .values()
            .flatten()
            .any(|mve| mve.piece.side == side)
    }

    pub fn len(&self) -> usize {
        self.by_piece.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
