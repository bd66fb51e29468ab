//! Saved games. A save holds the starting configuration and every move
//! played; loading replays the moves, so a save can never describe a position
//! the rules would not reach.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::game::{Game, GameConfig, GameError};
use crate::history::History;
use crate::side::Side;

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("games on a custom board can't be saved")]
    CustomBoard,
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed saved game: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved moves don't replay: {0}")]
    Replay(#[from] GameError),
    #[error("saved {field} disagrees with the replayed game")]
    Diverged { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameState {
    pub config: GameConfig,
    pub turn: Side,
    pub eliminated: Vec<Side>,
    pub history: History,
}

impl GameState {
    pub fn from_game(game: &Game) -> Result<Self, SaveError> {
        let config = game.config().ok_or(SaveError::CustomBoard)?.clone();
        let active = game.active_sides();
        let eliminated = config
            .sides
            .iter()
            .copied()
            .filter(|side| !active.contains(side))
            .collect();
        Ok(Self {
            config,
            turn: game.current_turn(),
            eliminated,
            history: game.board().history().clone(),
        })
    }

    /// Replays the saved moves and checks the result against the recorded
    /// turn and eliminations.
    pub fn restore(&self) -> Result<Game, SaveError> {
        let game = Game::replay(self.config.clone(), self.history.moves().iter().copied())?;
        if game.current_turn() != self.turn {
            return Err(SaveError::Diverged { field: "turn" });
        }
        let restored = Self::from_game(&game)?;
        if restored.eliminated != self.eliminated {
            return Err(SaveError::Diverged { field: "eliminated sides" });
        }
        Ok(game)
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, self.to_json()?).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved {} moves to {}", self.history.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
