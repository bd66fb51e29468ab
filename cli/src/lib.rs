mod notation;

pub use notation::MoveNotation;
