//! Zobrist keys.
//!
//! A position key is the XOR of one random number per (piece, color,
//! square), one for Black to move, one per castling right held, and one for
//! the en passant file when a target square is set. Move counters are not
//! part of the key.

use crate::position::CastlingRights;
use crate::Occboard;
use ply_core::{Color, PieceType, Square};

pub struct ZobristKeys {
    /// [piece][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    pub black_to_move: u64,
    /// One key per castling right, in `CastlingRights` bit order.
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
}

const fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

impl ZobristKeys {
    /// Fills the tables from a fixed-seed xorshift64 stream.
    pub const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift(state);
                    pieces[piece][color][sq] = state;
                    sq += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = xorshift(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece(&self, piece: PieceType, color: Color, sq: Square) -> u64 {
        self.pieces[piece.index()][color.index()][sq.idx()]
    }

    /// XOR of the keys of every right held.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.bits();
        (0..4)
            .filter(|i| bits & (1 << i) != 0)
            .fold(0, |acc, i| acc ^ self.castling[i])
    }

    #[inline]
    pub fn en_passant(&self, target: Option<Square>) -> u64 {
        target.map_or(0, |sq| self.en_passant[sq.file_index() as usize])
    }

    #[inline]
    pub fn side(&self, side: Color) -> u64 {
        match side {
            Color::White => 0,
            Color::Black => self.black_to_move,
        }
    }

    /// Computes a key from scratch.
    pub fn compute(
        &self,
        board: &Occboard,
        side: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> u64 {
        let mut key = self.side(side) ^ self.castling(castling) ^ self.en_passant(en_passant);
        for piece in PieceType::ALL {
            for color in Color::BOTH {
                for sq in board.occupancy(piece, color) {
                    key ^= self.piece(piece, color, sq);
                }
            }
        }
        key
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
