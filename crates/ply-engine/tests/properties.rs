//! Random playout properties: every generated move is legal, hash keys
//! stay consistent with a fresh computation, and FEN round trips preserve
//! the position.

use ply_core::Move;
use ply_engine::{Game, Position};
use proptest::prelude::*;

const STARTS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

/// Plays `choices` as indices into each position's move list, stopping
/// early at the end of the game.
fn playout(start: &str, choices: &[usize]) -> Vec<(Position, Move)> {
    let mut position = Position::from_fen(start).unwrap();
    let mut steps = Vec::new();
    for &choice in choices {
        let moves = position.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = moves[choice % moves.len()];
        let next = position.apply_move(m).unwrap();
        steps.push((position, m));
        position = next;
    }
    steps
}

fn sorted_moves(position: &Position) -> Vec<u16> {
    let mut moves: Vec<u16> = position.legal_moves().iter().map(|m| m.bits()).collect();
    moves.sort_unstable();
    moves
}

proptest! {
    #[test]
    fn moves_never_leave_the_mover_in_check(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(0usize..256, 0..80),
    ) {
        for (position, m) in playout(STARTS[start], &choices) {
            let mover = position.side_to_move();
            let next = position.make_move(m);
            prop_assert!(!next.is_in_check(mover), "{} left king in check in {}", m, position.to_fen());
            prop_assert_eq!(next.side_to_move(), mover.opposite());
            prop_assert!(next.king_square(mover).is_some());
            prop_assert!(next.king_square(mover.opposite()).is_some());
        }
    }

    #[test]
    fn incremental_key_matches_fresh_position(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(0usize..256, 1..80),
    ) {
        for (position, m) in playout(STARTS[start], &choices) {
            let next = position.make_move(m);
            let rebuilt = Position::from_fen(&next.to_fen()).unwrap();
            prop_assert_eq!(next.hash_key(), rebuilt.hash_key(), "after {} from {}", m, position.to_fen());
        }
    }

    #[test]
    fn fen_round_trip_preserves_position(
        start in 0..STARTS.len(),
        choices in prop::collection::vec(0usize..256, 0..60),
    ) {
        for (position, _) in playout(STARTS[start], &choices) {
            let fen = position.to_fen();
            let parsed = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(parsed.to_fen(), fen);
            prop_assert_eq!(parsed.hash_key(), position.hash_key());
            prop_assert_eq!(sorted_moves(&parsed), sorted_moves(&position));
        }
    }

    #[test]
    fn undo_restores_every_position(
        choices in prop::collection::vec(0usize..256, 0..40),
    ) {
        let mut game = Game::new();
        for &choice in &choices {
            let moves = game.legal_next_moves();
            if moves.is_empty() {
                break;
            }
            game.apply_move(moves[choice % moves.len()]).unwrap();
        }
        let history = game.history().to_vec();
        for expected in history.iter().rev().skip(1) {
            game.undo().unwrap();
            prop_assert_eq!(game.current_position(), expected);
        }
        prop_assert!(game.undo().is_err());
    }
}

#[test]
fn test_transpositions_share_a_key() {
    let mut a = Game::new();
    let mut b = Game::new();
    for text in ["g1f3", "g8f6", "b1c3", "b8c6"] {
        a.apply_uci(text).unwrap();
    }
    for text in ["b1c3", "b8c6", "g1f3", "g8f6"] {
        b.apply_uci(text).unwrap();
    }
    assert_eq!(a.current_position().hash_key(), b.current_position().hash_key());
    assert_eq!(a.to_fen(), b.to_fen());
}
