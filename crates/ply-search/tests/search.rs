//! Integration tests for the searcher: agreement with plain minimax,
//! mate distances, repetitions, table behavior and cancellation.

use ply_engine::Position;
use ply_search::{
    static_score, Bound, Searcher, SearcherST, TranspositionTable, MATE, MAX_PLY,
};
use std::time::{Duration, Instant};

/// Exhaustive negamax following the searcher's node rules. `path` holds
/// the keys of the ancestors.
fn reference(
    position: &Position,
    depth: u8,
    ply: usize,
    quiescence: bool,
    path: &mut Vec<u64>,
) -> i32 {
    let moves = position.legal_moves();
    if moves.is_empty() {
        return terminal(position, ply);
    }
    if ply > 0
        && (position.is_insufficient_material()
            || position.halfmove_clock() >= 100
            || path.contains(&position.hash_key()))
    {
        return 0;
    }
    let depth = if depth == 0 && position.is_check() && ply < MAX_PLY - 1 {
        1
    } else {
        depth
    };
    if depth == 0 {
        return reference_quiesce(position, ply, quiescence);
    }
    path.push(position.hash_key());
    let best = moves
        .iter()
        .map(|&m| -reference(&position.make_move(m), depth - 1, ply + 1, quiescence, path))
        .max()
        .unwrap_or(0);
    path.pop();
    best
}

fn reference_quiesce(position: &Position, ply: usize, quiescence: bool) -> i32 {
    let moves = position.legal_moves();
    if moves.is_empty() {
        return terminal(position, ply);
    }
    if !quiescence || ply >= MAX_PLY - 1 {
        return static_score(position);
    }
    let children = moves
        .iter()
        .map(|&m| (m, position.make_move(m)))
        .collect::<Vec<_>>();
    if position.is_check() {
        return children
            .iter()
            .map(|(_, child)| -reference_quiesce(child, ply + 1, quiescence))
            .max()
            .unwrap_or(0);
    }
    children
        .iter()
        .filter(|(m, _)| m.is_capture() || m.is_promotion())
        .map(|(_, child)| -reference_quiesce(child, ply + 1, quiescence))
        .fold(static_score(position), i32::max)
}

fn terminal(position: &Position, ply: usize) -> i32 {
    if position.is_check() {
        -(MATE - ply as i32)
    } else {
        0
    }
}

fn search(position: &Position, depth: u8, quiescence: bool) -> ply_search::SearchResult {
    let mut tt = TranspositionTable::with_size_mb(4);
    SearcherST::new()
        .with_quiescence(quiescence)
        .search(position, depth, None, &mut tt)
}

#[test]
fn test_matches_minimax_on_quiet_positions() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        "8/8/4k3/3p4/3P4/4K3/8/8 b - - 0 40",
    ];
    for fen in fens {
        let position = Position::from_fen(fen).unwrap();
        for depth in 1..=3 {
            let result = search(&position, depth, true);
            assert_eq!(
                result.score(),
                reference(&position, depth, 0, true, &mut Vec::new()),
                "{} at depth {}",
                fen,
                depth
            );
        }
    }
}

#[test]
fn test_matches_minimax_without_quiescence() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ];
    for fen in fens {
        let position = Position::from_fen(fen).unwrap();
        for depth in 1..=3 {
            let result = search(&position, depth, false);
            assert_eq!(
                result.score(),
                reference(&position, depth, 0, false, &mut Vec::new()),
                "{} at depth {}",
                fen,
                depth
            );
        }
    }
}

#[test]
fn test_mate_distance_shrinks_along_mating_line() {
    // Back rank: Re8+ Rxe8 Rxe8#.
    let mut position = Position::from_fen("r5k1/5ppp/8/8/8/8/4RPPP/4R1K1 w - - 0 1").unwrap();
    let line = ["e2e8", "a8e8", "e1e8"];
    let mut tt = TranspositionTable::with_size_mb(4);
    let mut searcher = SearcherST::new();

    for (i, text) in line.iter().enumerate() {
        let result = searcher.search(&position, 4, None, &mut tt);
        let eval = result.evaluation();
        assert!(eval.is_forced_mate(), "ply {}: {}", i, eval);
        assert_eq!(eval.mate_in(), 3 - i as u32, "ply {}", i);
        assert_eq!(eval.winner(), Some(ply_core::Color::White));
        position = position.apply_move(position.find_move(text).unwrap()).unwrap();
    }

    let result = searcher.search(&position, 4, None, &mut tt);
    assert_eq!(result.best_move(), None);
    assert_eq!(result.evaluation().mate_in(), 0);
    assert_eq!(result.evaluation().winner(), Some(ply_core::Color::White));
}

#[test]
fn test_finds_mate_in_one() {
    let position = Position::from_fen(
        "r1bqkbnr/pp1ppppp/2p5/2n5/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
    )
    .unwrap();
    let result = search(&position, 3, true);
    assert_eq!(result.best_move().map(|m| m.to_uci()).as_deref(), Some("f3f7"));
    assert_eq!(result.score(), MATE - 1);
    assert_eq!(result.depth(), 1);
}

#[test]
fn test_principal_variation_is_legal() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ];
    for fen in fens {
        let start = Position::from_fen(fen).unwrap();
        let result = search(&start, 4, true);
        assert!(!result.principal_variation().is_empty());
        assert_eq!(result.best_move(), result.principal_variation().first().copied());
        assert_eq!(result.position_key(), start.hash_key());

        let mut position = start;
        for &m in result.principal_variation() {
            position = position
                .apply_move(m)
                .unwrap_or_else(|e| panic!("{} in {}: {}", m, fen, e));
        }
    }
}

#[test]
fn test_table_entries_are_stable_between_probes() {
    let position = Position::startpos();
    let mut tt = TranspositionTable::with_size_mb(1);
    SearcherST::new().search(&position, 3, None, &mut tt);

    let first = tt.probe(position.hash_key()).copied();
    let second = tt.probe(position.hash_key()).copied();
    assert!(first.is_some());
    assert_eq!(first, second);
    let entry = first.unwrap();
    assert_eq!(entry.depth, 3);
    assert_eq!(entry.bound, Bound::Exact);
}

#[test]
fn test_reused_table_gives_same_answer() {
    let position = Position::from_fen(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    )
    .unwrap();
    let mut tt = TranspositionTable::with_size_mb(4);
    let mut searcher = SearcherST::new();
    let cold = searcher.search(&position, 3, None, &mut tt);
    let cold_nodes = searcher.nodes();
    let warm = searcher.search(&position, 3, None, &mut tt);
    assert_eq!(warm.score(), cold.score());
    assert!(searcher.nodes() <= cold_nodes);
}

#[test]
fn test_searches_are_deterministic() {
    let position = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let a = search(&position, 3, true);
    let b = search(&position, 3, true);
    assert_eq!(a, b);
}

#[test]
fn test_expired_deadline_returns_fallback() {
    let position = Position::startpos();
    let mut tt = TranspositionTable::with_size_mb(1);
    let started = Instant::now();
    let result = SearcherST::new().search(&position, 20, Some(started), &mut tt);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(result.depth(), 0);
    assert!(result.principal_variation().is_empty());
    assert_eq!(result.score(), static_score(&position));
    assert_eq!(result.best_move(), position.legal_moves().first());
}

#[test]
fn test_deadline_stops_deep_search() {
    let position = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let mut tt = TranspositionTable::with_size_mb(1);
    let deadline = Instant::now() + Duration::from_millis(50);
    let result = SearcherST::new().search(&position, 60, Some(deadline), &mut tt);
    assert!(Instant::now() < deadline + Duration::from_secs(2));
    assert!(result.depth() < 60);
    assert!(result.best_move().is_some());
    assert!(position.legal_moves().contains(result.best_move().unwrap()));
}
