//! Static evaluation: material, piece-square tables and a bishop pair
//! bonus, with king placement tapered between middlegame and endgame.

use crate::evaluation::{Evaluation, EVAL_LIMIT};
use ply_core::{Color, PieceType, Square};
use ply_engine::Position;

/// Piece values in centipawns, indexed by [`PieceType::index`].
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

const BISHOP_PAIR: i32 = 30;

/// Game phase contribution per piece type; 24 is the full opening set.
const PHASE_WEIGHTS: [i32; 6] = [0, 1, 1, 2, 4, 0];
const MAX_PHASE: i32 = 24;

// Tables are laid out as seen from White's side: first row is rank 8.

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_PST: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_PST: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

const PIECE_PSTS: [&[i32; 64]; 5] = [&PAWN_PST, &KNIGHT_PST, &BISHOP_PST, &ROOK_PST, &QUEEN_PST];

/// Table index of `sq` for a piece of `color`.
#[inline]
fn pst_index(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.flip_rank().idx(),
        Color::Black => sq.idx(),
    }
}

/// Remaining non-pawn material, 0 (bare) to 24 (opening).
pub fn game_phase(position: &Position) -> i32 {
    let board = position.board();
    let phase: i32 = PieceType::ALL
        .iter()
        .map(|&piece| PHASE_WEIGHTS[piece.index()] * board.pieces(piece).count() as i32)
        .sum();
    phase.min(MAX_PHASE)
}

/// Heuristic score in centipawns, positive when White is better. Ignores
/// checkmate and draws.
pub fn white_score(position: &Position) -> i32 {
    let board = position.board();
    let mut middlegame = 0;
    let mut endgame = 0;

    for color in Color::BOTH {
        let sign = color.sign();
        for piece in PieceType::ALL {
            for sq in board.occupancy(piece, color) {
                let index = pst_index(sq, color);
                let value = PIECE_VALUES[piece.index()];
                match piece {
                    PieceType::King => {
                        middlegame += sign * KING_MIDDLEGAME_PST[index];
                        endgame += sign * KING_ENDGAME_PST[index];
                    }
                    _ => {
                        let total = value + PIECE_PSTS[piece.index()][index];
                        middlegame += sign * total;
                        endgame += sign * total;
                    }
                }
            }
        }
        if board.occupancy(PieceType::Bishop, color).count() >= 2 {
            middlegame += sign * BISHOP_PAIR;
            endgame += sign * BISHOP_PAIR;
        }
    }

    let phase = game_phase(position);
    let tapered = (middlegame * phase + endgame * (MAX_PHASE - phase)) / MAX_PHASE;
    tapered.clamp(-EVAL_LIMIT, EVAL_LIMIT)
}

/// Heuristic score from the side to move's point of view, as used at
/// search leaves.
#[inline]
pub fn static_score(position: &Position) -> i32 {
    white_score(position) * position.side_to_move().sign()
}

/// Full evaluation of a position: checkmate and draws are detected exactly,
/// everything else is scored heuristically.
pub fn evaluate(position: &Position) -> Evaluation {
    if position.legal_moves().is_empty() {
        return if position.is_check() {
            Evaluation::mate(position.side_to_move().opposite(), 0)
        } else {
            Evaluation::draw()
        };
    }
    if position.is_insufficient_material() || position.halfmove_clock() >= 100 {
        return Evaluation::draw();
    }
    Evaluation::heuristic(white_score(position))
}
