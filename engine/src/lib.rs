//! Rules engine for four-player chess on a 14×14 cross-shaped board.

pub mod board;
pub mod game;
pub mod history;
pub mod move_gen;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod position;
pub mod save;
pub mod setup;
pub mod side;

pub use board::{Board, BoardError, PossibleMoves};
pub use game::{Game, GameConfig, GameError, SideStatus};
pub use history::History;
pub use move_gen::MoveGenError;
pub use moves::{Move, MoveType};
pub use perft::{perft, PerftDepthResult, PerftResult};
pub use piece::{CastlingRooks, Piece, PieceId, PieceKind, Promotion};
pub use position::{Direction, Position, PositionError};
pub use save::{GameState, SaveError};
pub use side::Side;
