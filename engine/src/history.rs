use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::piece::PieceId;
use crate::side::Side;

/// Append-only record of every executed move. The per-piece and per-side
/// indices hold offsets into `moves`, so they can never disagree with it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<Move>", into = "Vec<Move>")]
pub struct History {
    moves: Vec<Move>,
    by_piece: HashMap<PieceId, Vec<usize>>,
    by_side: HashMap<Side, Vec<usize>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_move(&mut self, mve: Move) {
        let idx = self.moves.len();
        self.moves.push(mve);
        self.by_piece.entry(mve.piece.id).or_default().push(idx);
        self.by_side.entry(mve.piece.side).or_default().push(idx);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn moves_by_piece(&self, piece: PieceId) -> Vec<Move> {
        self.collect(self.by_piece.get(&piece))
    }

    pub fn moves_by_side(&self, side: Side) -> Vec<Move> {
        self.collect(self.by_side.get(&side))
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn last_move_by_side(&self, side: Side) -> Option<&Move> {
        self.last_of(self.by_side.get(&side))
    }

    pub fn last_move_by_piece(&self, piece: PieceId) -> Option<&Move> {
        self.last_of(self.by_piece.get(&piece))
    }

    pub fn moved_before(&self, piece: PieceId) -> bool {
        self.by_piece.contains_key(&piece)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    fn collect(&self, offsets: Option<&Vec<usize>>) -> Vec<Move> {
        offsets
            .map(|offsets| offsets.iter().map(|&idx| self.moves[idx]).collect())
            .unwrap_or_default()
    }

    fn last_of(&self, offsets: Option<&Vec<usize>>) -> Option<&Move> {
        offsets
            .and_then(|offsets| offsets.last())
            .map(|&idx| &self.moves[idx])
    }
}

impl From<Vec<Move>> for History {
    fn from(moves: Vec<Move>) -> Self {
        let mut history = History::new();
        for mve in moves {
            history.add_move(mve);
        }
        history
    }
}

impl From<History> for Vec<Move> {
    fn from(history: History) -> Self {
        history.moves
    }
}
