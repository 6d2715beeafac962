//! FEN (Forsyth-Edwards Notation) decoding and encoding.
//!
//! This layer is purely textual: it checks that every field is well formed
//! and converts it into typed values. Whether the described position can
//! actually occur (one king per side, no pawns on the back rank, ...) is
//! decided by the engine when it builds a position from these fields.

use crate::{Color, PieceType, Square};
use std::fmt;
use thiserror::Error;

/// Errors produced while decoding FEN text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 or 6 space-separated fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid active color {0:?}, expected 'w' or 'b'")]
    ActiveColor(String),

    #[error("invalid castling field {0:?}")]
    Castling(String),

    #[error("invalid en passant field {0:?}")]
    EnPassant(String),

    #[error("invalid halfmove clock {0:?}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number {0:?}")]
    FullmoveNumber(String),
}

/// One occupied square in a decoded placement.
pub type Placed = (PieceType, Color);

/// The decoded fields of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Square contents indexed by [`Square::idx`].
    pub placement: [Option<Placed>; 64],
    pub side_to_move: Color,
    /// Castling availability in canonical `KQkq` order, each letter at most once.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenFields {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Decodes a FEN record. The two move counters may be omitted, in which
    /// case they default to `0 1`.
    pub fn parse(text: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::ActiveColor(other.to_string())),
        };

        let castling = parse_castling(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let square = Square::from_algebraic(text)
                    .ok_or_else(|| FenError::EnPassant(text.to_string()))?;
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if square.rank_index() != expected_rank {
                    return Err(FenError::EnPassant(text.to_string()));
                }
                Some(square)
            }
        };

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            let halfmove = fields[4]
                .parse::<u32>()
                .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;
            let fullmove = fields[5]
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| FenError::FullmoveNumber(fields[5].to_string()))?;
            (halfmove, fullmove)
        } else {
            (0, 1)
        };

        Ok(FenFields {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_placement(text: &str) -> Result<[Option<Placed>; 64], FenError> {
    let rows: Vec<&str> = text.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut placement = [None; 64];
    for (row, row_text) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in row_text.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
            } else if let Some(placed) = PieceType::from_fen_char(c) {
                if file < 8 {
                    placement[(rank * 8 + file) as usize] = Some(placed);
                }
                file += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "unexpected {:?} on rank {}",
                    c,
                    rank + 1
                )));
            }
            if file > 8 {
                return Err(FenError::Placement(format!(
                    "rank {} overflows 8 squares",
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!(
                "rank {} covers {} squares",
                rank + 1,
                file
            )));
        }
    }
    Ok(placement)
}

fn parse_castling(text: &str) -> Result<String, FenError> {
    if text == "-" {
        return Ok(String::new());
    }
    let mut seen = [false; 4];
    for c in text.chars() {
        let slot = "KQkq"
            .find(c)
            .ok_or_else(|| FenError::Castling(text.to_string()))?;
        if seen[slot] {
            return Err(FenError::Castling(text.to_string()));
        }
        seen[slot] = true;
    }
    Ok("KQkq"
        .chars()
        .zip(seen)
        .filter_map(|(c, on)| on.then_some(c))
        .collect())
}

impl fmt::Display for FenFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.placement[(rank * 8 + file) as usize] {
                    Some((piece, color)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_fen_char(color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        let castling = if self.castling.is_empty() {
            "-"
        } else {
            &self.castling
        };
        write!(f, " {} {} ", self.side_to_move.to_fen_char(), castling)?;
        match self.en_passant {
            Some(square) => write!(f, "{}", square)?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let fields = FenFields::parse(FenFields::STARTPOS).unwrap();
        assert_eq!(fields.side_to_move, Color::White);
        assert_eq!(fields.castling, "KQkq");
        assert_eq!(fields.placement[Square::E1.idx()], Some((PieceType::King, Color::White)));
        assert_eq!(fields.to_string(), FenFields::STARTPOS);
    }

    #[test]
    fn counters_are_optional() {
        let fields = FenFields::parse("8/8/8/8/8/8/8/K6k b - -").unwrap();
        assert_eq!(fields.halfmove_clock, 0);
        assert_eq!(fields.fullmove_number, 1);
        assert_eq!(fields.to_string(), "8/8/8/8/8/8/8/K6k b - - 0 1");
    }

    #[test]
    fn castling_is_canonicalised() {
        let fields = FenFields::parse("r3k2r/8/8/8/8/8/8/R3K2R w qkQ - 0 1").unwrap();
        assert_eq!(fields.castling, "Qkq");
        assert!(matches!(
            FenFields::parse("r3k2r/8/8/8/8/8/8/R3K2R w KK - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn en_passant_rank_must_match_side() {
        let ok = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
        assert_eq!(FenFields::parse(ok).unwrap().to_string(), ok);
        assert!(matches!(
            FenFields::parse("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 2"),
            Err(FenError::EnPassant(_))
        ));
    }

    #[test]
    fn malformed_fields() {
        assert_eq!(FenFields::parse("garbage"), Err(FenError::FieldCount(1)));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("rnbqkbnrr/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("7x/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::ActiveColor(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = FenFields::parse("8/8/8/8/8/8/8/8 w - z9 0 1").unwrap_err();
        assert!(err.to_string().contains("z9"));
    }
}
