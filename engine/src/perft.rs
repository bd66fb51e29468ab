use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use tabled::{Table, Tabled};

use crate::game::{Game, GameError};
use crate::moves::MoveType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub tot: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub eliminations: u64,
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl PerftDepthResult {
    pub fn new(
        tot: u64,
        captures: u64,
        en_passants: u64,
        castles: u64,
        promotions: u64,
        eliminations: u64,
    ) -> Self {
        PerftDepthResult {
            tot,
            captures,
            en_passants,
            castles,
            promotions,
            eliminations,
        }
    }
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

/// Plays out every legal move sequence `depth` plies deep from `game`.
pub fn perft(game: &Game, depth: usize) -> Result<PerftResult, GameError> {
    let mut depth_results = vec![PerftDepthResult::default(); depth];

    let start = Instant::now();

    perft_helper(&mut depth_results, game, 0)?;

    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().map(|res| res.tot).sum();

    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    Ok(PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    })
}

fn perft_helper(
    depth_results: &mut [PerftDepthResult],
    game: &Game,
    curr_depth: usize,
) -> Result<(), GameError> {
    if curr_depth == depth_results.len() {
        return Ok(());
    }

    for mve in game.legal_moves() {
        let is_capture = mve.kind == MoveType::EnPassant || game.board().get_piece(mve.dest).is_some();

        let mut next = game.clone();
        next.play(mve)?;
        let eliminated = game.active_sides().len().saturating_sub(next.active_sides().len());

        let curr_res = &mut depth_results[curr_depth];
        curr_res.tot += 1;
        curr_res.captures += u64::from(is_capture);
        curr_res.en_passants += u64::from(mve.kind == MoveType::EnPassant);
        curr_res.castles += u64::from(mve.kind.is_castling());
        curr_res.promotions += u64::from(mve.promotion().is_some());
        curr_res.eliminations += eliminated as u64;

        perft_helper(depth_results, &next, curr_depth + 1)?;
    }
    Ok(())
}
