//! Perft counts against published reference numbers.
//!
//! The slow cases are ignored by default. Run them with:
//! `cargo test --release -p ply-engine --test perft -- --ignored`

use ply_engine::{perft, perft_divide, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_4_MIRRORED: &str =
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn check(fen: &str, expected: &[u64]) {
    let position = Position::from_fen(fen).unwrap();
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(perft(&position, depth), nodes, "{} at depth {}", fen, depth);
    }
}

#[test]
fn test_startpos() {
    check(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[20, 400, 8902, 197_281],
    );
}

#[test]
fn test_kiwipete() {
    check(KIWIPETE, &[48, 2039, 97_862]);
}

#[test]
fn test_position_3() {
    check(POSITION_3, &[14, 191, 2812, 43_238]);
}

#[test]
fn test_position_4() {
    check(POSITION_4, &[6, 264, 9467]);
}

#[test]
fn test_position_4_mirrored() {
    check(POSITION_4_MIRRORED, &[6, 264, 9467]);
}

#[test]
fn test_position_5() {
    check(POSITION_5, &[44, 1486, 62_379]);
}

#[test]
fn test_divide_sums_to_total() {
    let position = Position::from_fen(KIWIPETE).unwrap();
    let divide = perft_divide(&position, 3);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 97_862);
    // Kiwipete reference subtotal for castling kingside.
    let castle = divide.iter().find(|(m, _)| m == "e1g1").unwrap();
    assert_eq!(castle.1, 2059);
}

#[test]
#[ignore = "slow in debug builds"]
fn test_startpos_deep() {
    let position = Position::startpos();
    assert_eq!(perft(&position, 5), 4_865_609);
}

#[test]
#[ignore = "slow in debug builds"]
fn test_kiwipete_deep() {
    let position = Position::from_fen(KIWIPETE).unwrap();
    assert_eq!(perft(&position, 4), 4_085_603);
}
