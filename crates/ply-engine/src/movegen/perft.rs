//! Perft: leaf counts of the legal move tree, for validating the generator
//! against published numbers.

use super::{generate_legal, make_move};
use crate::Position;

/// Counts leaf nodes `depth` plies below `position`.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&m| perft(&make_move(position, m), depth - 1))
        .sum()
}

/// Per-move subtotals at the root, sorted by move text.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = generate_legal(position)
        .iter()
        .map(|&m| {
            let nodes = if depth > 1 {
                perft(&make_move(position, m), depth - 1)
            } else {
                1
            };
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
