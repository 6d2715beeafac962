//! Chess position representation.

use crate::movegen::{self, MoveList};
use crate::occboard::{bishop_attacks_with, rook_attacks_with};
use crate::movegen::attacks::{king_attacks, knight_attacks, pawn_attacks};
use crate::zobrist::ZOBRIST;
use crate::{Bitboard, Occboard};
use ply_core::{Color, FenError, FenFields, Move, MoveText, PieceType, Square};
use std::fmt;
use thiserror::Error;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(0b0001);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(0b0010);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(0b0100);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(0b1000);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 | other.0)
    }

    #[inline]
    pub const fn kingside(color: Color) -> CastlingRights {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    pub const fn queenside(color: Color) -> CastlingRights {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Rights that survive a move touching `sq` (as origin or destination).
    #[inline]
    pub const fn after_touching(self, sq: Square) -> CastlingRights {
        let lost = match sq.index() {
            0 => Self::WHITE_QUEENSIDE.0,
            4 => Self::WHITE_KINGSIDE.0 | Self::WHITE_QUEENSIDE.0,
            7 => Self::WHITE_KINGSIDE.0,
            56 => Self::BLACK_QUEENSIDE.0,
            60 => Self::BLACK_KINGSIDE.0 | Self::BLACK_QUEENSIDE.0,
            63 => Self::BLACK_KINGSIDE.0,
            _ => 0,
        };
        CastlingRights(self.0 & !lost)
    }

    /// The same rights with the colors exchanged.
    #[inline]
    pub const fn swapped(self) -> CastlingRights {
        CastlingRights(((self.0 & 0b0011) << 2) | ((self.0 & 0b1100) >> 2))
    }

    /// Parses the canonical `KQkq` field (empty for none).
    fn from_fen_field(field: &str) -> CastlingRights {
        field.chars().fold(Self::NONE, |acc, c| match c {
            'K' => acc.union(Self::WHITE_KINGSIDE),
            'Q' => acc.union(Self::WHITE_QUEENSIDE),
            'k' => acc.union(Self::BLACK_KINGSIDE),
            'q' => acc.union(Self::BLACK_QUEENSIDE),
            _ => acc,
        })
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Errors building a position from a description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid position description: {0}")]
    InvalidDescription(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("pawn on the first or last rank")]
    PawnOnBackRank,

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Errors resolving or applying a move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move {0}")]
    Illegal(Move),

    #[error("cannot parse move {0:?}")]
    Unparsable(String),

    #[error("no legal move matches {0:?}")]
    NoMatch(String),
}

/// Complete chess position state.
///
/// Positions are values: applying a move returns a new position and leaves
/// the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: Occboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Indexed by color.
    pub(crate) in_check: [bool; 2],
    pub(crate) key: u64,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenFields::STARTPOS).expect("start position is valid")
    }

    /// Builds a position from FEN text, rejecting positions that cannot
    /// arise in a game.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fields = FenFields::parse(fen)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields(fields: &FenFields) -> Result<Self, PositionError> {
        let mut board = Occboard::new();
        for (index, placed) in fields.placement.iter().enumerate() {
            if let Some((piece, color)) = *placed {
                board.put(piece, color, Square::from_index_unchecked(index as u8));
            }
        }

        for color in Color::BOTH {
            match board.occupancy(PieceType::King, color).count() {
                0 => return Err(PositionError::MissingKing(color)),
                1 => {}
                _ => return Err(PositionError::TooManyKings(color)),
            }
        }
        if (board.pieces(PieceType::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
            return Err(PositionError::PawnOnBackRank);
        }

        let castling = CastlingRights::from_fen_field(&fields.castling);
        let mut position = Position {
            board,
            side_to_move: fields.side_to_move,
            castling,
            en_passant: fields.en_passant,
            halfmove_clock: fields.halfmove_clock,
            fullmove_number: fields.fullmove_number,
            in_check: [false; 2],
            key: 0,
        };
        position.refresh_derived();

        if position.in_check[position.side_to_move.opposite().index()] {
            return Err(PositionError::OpponentInCheck);
        }
        Ok(position)
    }

    /// Recomputes check flags and the key from scratch.
    fn refresh_derived(&mut self) {
        self.refresh_checks();
        self.key = self.compute_key();
    }

    pub(crate) fn refresh_checks(&mut self) {
        for color in Color::BOTH {
            self.in_check[color.index()] = self.king_attacked(color);
        }
    }

    pub(crate) fn compute_key(&self) -> u64 {
        ZOBRIST.compute(&self.board, self.side_to_move, self.castling, self.en_passant)
    }

    pub fn to_fields(&self) -> FenFields {
        let mut placement = [None; 64];
        for (index, slot) in placement.iter_mut().enumerate() {
            *slot = self.piece_at(Square::from_index_unchecked(index as u8));
        }
        let castling = match self.castling {
            CastlingRights::NONE => String::new(),
            rights => rights.to_string(),
        };
        FenFields {
            placement,
            side_to_move: self.side_to_move,
            castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    pub fn to_fen(&self) -> String {
        self.to_fields().to_string()
    }

    #[inline]
    pub fn board(&self) -> &Occboard {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist key of pieces, side to move, castling rights and en passant
    /// square.
    #[inline]
    pub fn hash_key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    /// True if the side to move is in check.
    #[inline]
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.side_to_move)
    }

    pub fn piece_at(&self, sq: Square) -> Option<(PieceType, Color)> {
        Some((self.board.piece_at(sq)?, self.board.color_at(sq)?))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king(color)
    }

    /// Pieces of `by` attacking `sq` under the current occupancy.
    pub fn attackers_to(&self, sq: Square, by: Color) -> Bitboard {
        self.attackers_with(sq, by, self.board.all_occupied())
    }

    /// Pieces of `by` attacking `sq` if the board were occupied by `occupied`.
    pub(crate) fn attackers_with(&self, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
        let b = &self.board;
        let queens = b.occupancy(PieceType::Queen, by);
        (pawn_attacks(sq, by.opposite()) & b.occupancy(PieceType::Pawn, by))
            | (knight_attacks(sq) & b.occupancy(PieceType::Knight, by))
            | (king_attacks(sq) & b.occupancy(PieceType::King, by))
            | (bishop_attacks_with(sq, occupied) & (b.occupancy(PieceType::Bishop, by) | queens))
            | (rook_attacks_with(sq, occupied) & (b.occupancy(PieceType::Rook, by) | queens))
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, by).any()
    }

    fn king_attacked(&self, color: Color) -> bool {
        self.board
            .king(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opposite()))
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        movegen::generate_legal(self)
    }

    /// Applies `m` if it is legal here.
    pub fn apply_move(&self, m: Move) -> Result<Position, MoveError> {
        if !self.legal_moves().contains(m) {
            return Err(MoveError::Illegal(m));
        }
        Ok(movegen::make_move(self, m))
    }

    /// Applies a move taken from [`Position::legal_moves`] without checking
    /// it again. Passing any other move is a logic error.
    #[inline]
    pub fn make_move(&self, m: Move) -> Position {
        movegen::make_move(self, m)
    }

    /// Resolves long algebraic text (`e2e4`, `e7e8q`) to a legal move.
    pub fn find_move(&self, text: &str) -> Result<Move, MoveError> {
        let parsed = MoveText::parse(text).ok_or_else(|| MoveError::Unparsable(text.to_string()))?;
        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.matches(parsed.from, parsed.to, parsed.promotion))
            .ok_or_else(|| MoveError::NoMatch(text.to_string()))
    }

    /// True when neither side can possibly deliver mate: bare kings, a
    /// single minor piece, or only bishops all standing on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(PieceType::Pawn) | b.pieces(PieceType::Rook) | b.pieces(PieceType::Queen);
        if heavy.any() {
            return false;
        }
        let knights = b.pieces(PieceType::Knight);
        let bishops = b.pieces(PieceType::Bishop);
        if (knights | bishops).count() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::DARK_SQUARES).is_empty()
                || (bishops & !Bitboard::DARK_SQUARES).is_empty())
    }

    /// The position with colors exchanged and ranks mirrored, so White's
    /// prospects here are Black's prospects there.
    pub fn mirrored(&self) -> Position {
        let mut board = Occboard::new();
        for piece in PieceType::ALL {
            for color in Color::BOTH {
                for sq in self.board.occupancy(piece, color) {
                    board.put(piece, color.opposite(), sq.flip_rank());
                }
            }
        }
        let mut position = Position {
            board,
            side_to_move: self.side_to_move.opposite(),
            castling: self.castling.swapped(),
            en_passant: self.en_passant.map(Square::flip_rank),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            in_check: [false; 2],
            key: 0,
        };
        position.refresh_derived();
        position
    }

    /// Multi-line rendering: board, FEN, key and check flags.
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            out.push((b'1' + rank) as char);
            out.push(' ');
            for file in 0..8u8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                out.push(match self.piece_at(sq) {
                    Some((piece, color)) => piece.to_fen_char(color),
                    None => '.',
                });
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out.push_str(&format!("fen: {}\n", self.to_fen()));
        out.push_str(&format!("key: {:016x}\n", self.key));
        out.push_str(&format!(
            "check: white={} black={}",
            self.in_check[Color::White.index()],
            self.in_check[Color::Black.index()]
        ));
        out
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_string())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
