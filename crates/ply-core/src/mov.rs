//! Compact move representation.

use crate::{PieceType, Square};
use std::fmt;

/// What a move does besides relocating a piece.
///
/// The kind is assigned by move generation; a bare from/to pair parsed from
/// text has to be resolved against a position to learn it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0,
    DoublePush = 1,
    CastleKingside = 2,
    CastleQueenside = 3,
    Capture = 4,
    EnPassant = 5,
    PromoteKnight = 8,
    PromoteBishop = 9,
    PromoteRook = 10,
    PromoteQueen = 11,
    PromoteKnightCapture = 12,
    PromoteBishopCapture = 13,
    PromoteRookCapture = 14,
    PromoteQueenCapture = 15,
}

impl MoveKind {
    const CAPTURE_BIT: u8 = 0b0100;
    const PROMOTION_BIT: u8 = 0b1000;

    const fn from_bits(bits: u8) -> MoveKind {
        match bits & 0xF {
            1 => MoveKind::DoublePush,
            2 => MoveKind::CastleKingside,
            3 => MoveKind::CastleQueenside,
            4 => MoveKind::Capture,
            5 => MoveKind::EnPassant,
            8 => MoveKind::PromoteKnight,
            9 => MoveKind::PromoteBishop,
            10 => MoveKind::PromoteRook,
            11 => MoveKind::PromoteQueen,
            12 => MoveKind::PromoteKnightCapture,
            13 => MoveKind::PromoteBishopCapture,
            14 => MoveKind::PromoteRookCapture,
            15 => MoveKind::PromoteQueenCapture,
            _ => MoveKind::Quiet,
        }
    }

    /// The promotion kind for `piece`, capturing or not.
    ///
    /// Pawns and kings are not promotion targets; they map to a queen.
    pub const fn promotion(piece: PieceType, capture: bool) -> MoveKind {
        let base = match piece {
            PieceType::Knight => 8,
            PieceType::Bishop => 9,
            PieceType::Rook => 10,
            _ => 11,
        };
        Self::from_bits(if capture { base | Self::CAPTURE_BIT } else { base })
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        (self as u8) & Self::CAPTURE_BIT != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self as u8) & Self::PROMOTION_BIT != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }

    /// The piece a promotion produces.
    pub const fn promotion_piece(self) -> Option<PieceType> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self as u8) & 0b11 {
            0 => PieceType::Knight,
            1 => PieceType::Bishop,
            2 => PieceType::Rook,
            _ => PieceType::Queen,
        })
    }
}

/// A single ply: origin, destination and [`MoveKind`], packed in 16 bits.
///
/// Layout: bits 0-5 origin, bits 6-11 destination, bits 12-15 kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Placeholder that no position ever generates (a1 to a1).
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move((from.index() as u16) | ((to.index() as u16) << 6) | ((kind as u16) << 12))
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveKind::Quiet)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & 0x3F) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as u8)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits((self.0 >> 12) as u8)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceType> {
        self.kind().promotion_piece()
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Raw 16-bit encoding.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Long algebraic text, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// True if this move has the given origin, destination and promotion.
    #[inline]
    pub fn matches(self, from: Square, to: Square, promotion: Option<PieceType>) -> bool {
        self.from() == from && self.to() == to && self.promotion() == promotion
    }
}

/// A move read from long algebraic text, not yet resolved to a [`MoveKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveText {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl MoveText {
    /// Parses `e2e4` / `e7e8q`. Returns `None` on malformed text.
    pub fn parse(s: &str) -> Option<Self> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_char(c)? {
                PieceType::Pawn | PieceType::King => return None,
                piece => Some(piece),
            },
        };
        Some(MoveText {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self, self.kind())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn packs_squares_and_kind() {
        let m = Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush);
        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.kind(), MoveKind::DoublePush);
        assert!(!m.is_capture());
    }

    #[test]
    fn promotion_kinds_carry_piece_and_capture() {
        for piece in PieceType::PROMOTIONS {
            let quiet = MoveKind::promotion(piece, false);
            let capture = MoveKind::promotion(piece, true);
            assert_eq!(quiet.promotion_piece(), Some(piece));
            assert_eq!(capture.promotion_piece(), Some(piece));
            assert!(!quiet.is_capture());
            assert!(capture.is_capture());
        }
        assert_eq!(MoveKind::Capture.promotion_piece(), None);
    }

    #[test]
    fn en_passant_counts_as_capture() {
        assert!(MoveKind::EnPassant.is_capture());
        assert!(!MoveKind::CastleKingside.is_capture());
        assert!(MoveKind::CastleQueenside.is_castle());
    }

    #[test]
    fn display_long_algebraic() {
        let promo = Move::new(sq("b7"), sq("a8"), MoveKind::PromoteKnightCapture);
        assert_eq!(promo.to_string(), "b7a8n");
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(format!("{:?}", Move::quiet(sq("g1"), sq("f3"))), "Move(g1f3, Quiet)");
    }

    #[test]
    fn parse_move_text() {
        let text = MoveText::parse("e7e8q").unwrap();
        assert_eq!(text.promotion, Some(PieceType::Queen));
        assert_eq!(MoveText::parse("e2e4").unwrap().promotion, None);
        assert!(MoveText::parse("e7e8k").is_none());
        assert!(MoveText::parse("e2e9").is_none());
        assert!(MoveText::parse("e2").is_none());
        assert!(MoveText::parse("e2e4qq").is_none());
    }
}
