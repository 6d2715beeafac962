//! Core chess types.
//!
//! This crate holds the vocabulary shared by the engine and the searcher:
//! - [`Color`] and [`PieceType`]
//! - [`Square`], [`File`] and [`Rank`] coordinates
//! - [`Move`], a 16-bit move with its [`MoveKind`], and [`MoveText`] for
//!   long algebraic input
//! - [`FenFields`], the FEN codec

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenFields, Placed};
pub use mov::{Move, MoveKind, MoveText};
pub use piece::PieceType;
pub use square::{File, ParseSquareError, Rank, Square};
