use std::{io, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use chess4::{Game, GameConfig, GameState, perft};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, prelude::*};

use cli::MoveNotation;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the starting position.
    Board,
    /// Count every move sequence from the starting position.
    Perft { depth: usize },
    /// Play moves written `row,col-row,col[=q|r|b|n]` from the starting position.
    Play {
        moves: Vec<MoveNotation>,
        /// Write the resulting game to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Continue a saved game, optionally playing more moves.
    Load {
        file: PathBuf,
        moves: Vec<MoveNotation>,
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging();

    match cli.command {
        Commands::Board => cli_board(),
        Commands::Perft { depth } => cli_perft(depth),
        Commands::Play { moves, save } => {
            let game = Game::new(GameConfig::default())?;
            cli_play(game, &moves, save.as_deref())
        }
        Commands::Load { file, moves, save } => {
            let game = GameState::load(&file)?
                .restore()
                .with_context(|| format!("could not restore {}", file.display()))?;
            cli_play(game, &moves, save.as_deref())
        }
    }
}

fn cli_board() -> Result<()> {
    let game = Game::new(GameConfig::default())?;
    print!("{}", game.board());
    Ok(())
}

fn cli_perft(depth: usize) -> Result<()> {
    let game = Game::new(GameConfig::default())?;
    let res = perft(&game, depth).with_context(|| format!("perft to depth {} failed", depth))?;
    println!("{}", res);
    Ok(())
}

fn cli_play(mut game: Game, moves: &[MoveNotation], save: Option<&Path>) -> Result<()> {
    let ply_offset = game.board().history().len();
    for (ply, notation) in moves.iter().enumerate() {
        let mve = game
            .find_move(notation.from, notation.to, notation.promotion)
            .with_context(|| {
                format!(
                    "move {} `{}` is not playable for {}",
                    ply_offset + ply + 1,
                    notation,
                    game.current_turn()
                )
            })?;
        debug!("{:?}", mve);
        game.play(mve)?;
    }

    if let Some(path) = save {
        GameState::from_game(&game)?.save(path)?;
    }

    print!("{}", game.board());
    let sides = game.config().map(|config| config.sides.clone()).unwrap_or_default();
    for side in sides {
        println!("{}: {}", side, game.status(side));
    }
    match game.winner() {
        Some(winner) => println!("winner: {}", winner),
        None => println!("to move: {}", game.current_turn()),
    }
    Ok(())
}

fn enable_logging() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    Registry::default().with(stderr_layer).init();
}
