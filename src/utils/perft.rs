use std::time::{Duration, Instant};

use crate::prelude::*;

#[derive(Debug)]
pub struct PerftResult {
    /// Total leaf nodes counted
    pub nodes: u64,
    pub duration: Duration,
    /// Nodes per second
    pub nps: u64,
    /// Per root move counts, only filled for divide runs
    pub move_counts: Option<Vec<(Move, u64)>>,
}

impl PerftResult {
    pub fn new(nodes: u64, duration: Duration, move_counts: Option<Vec<(Move, u64)>>) -> Self {
        let nanos = duration.as_nanos();
        let nps = if nanos > 0 {
            (nodes as u128 * 1_000_000_000 / nanos) as u64
        } else {
            0
        };

        Self {
            nodes,
            duration,
            nps,
            move_counts,
        }
    }
}

/// Counts the leaf nodes of the legal move tree of `board` to `depth`.
/// The board is restored before returning.
pub fn perft(board: &mut Board, depth: u8, divide: bool) -> miette::Result<PerftResult> {
    let start_time = Instant::now();

    if depth == 0 {
        return Ok(PerftResult::new(1, start_time.elapsed(), None));
    }

    let mut legal_moves = Vec::with_capacity(MAX_MOVES);
    board.generate_legal_moves(&mut legal_moves);

    let mut total_nodes = 0;
    let mut move_counts = divide.then(|| Vec::with_capacity(legal_moves.len()));

    for mv in legal_moves {
        let sub_nodes = if depth == 1 {
            1
        } else {
            let move_data = board.make_move(mv)?;
            let nodes = count_nodes(board, depth - 1)?;
            board
                .unmake_move(&move_data)
                .wrap_err_with(|| format!("Unmaking {mv} at depth {depth}"))?;
            nodes
        };

        total_nodes += sub_nodes;
        if let Some(counts) = move_counts.as_mut() {
            counts.push((mv, sub_nodes));
        }
    }

    Ok(PerftResult::new(total_nodes, start_time.elapsed(), move_counts))
}

fn count_nodes(board: &mut Board, depth: u8) -> miette::Result<u64> {
    let mut legal_moves = Vec::with_capacity(MAX_MOVES);
    board.generate_legal_moves(&mut legal_moves);
    if depth == 1 {
        return Ok(legal_moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in legal_moves {
        let move_data = board.make_move(mv)?;
        nodes += count_nodes(board, depth - 1)?;
        board.unmake_move(&move_data)?;
    }
    Ok(nodes)
}

/// Runs perft with a per move breakdown and prints it.
pub fn perft_divide(board: &mut Board, depth: u8) -> miette::Result<PerftResult> {
    let result = perft(board, depth, true)?;

    println!("Perft results at depth {depth}");
    println!("----------------------------");
    if let Some(ref move_counts) = result.move_counts {
        for (mv, count) in move_counts {
            println!("{mv}: {count}");
        }
    }
    println!("----------------------------");
    println!("Total nodes: {}", result.nodes);
    println!("Time: {} ms", result.duration.as_millis());
    println!("Nodes per second: {}", result.nps);

    Ok(result)
}
