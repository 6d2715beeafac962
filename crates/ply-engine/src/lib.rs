//! Bitboard chess engine: board representation, legal move generation and
//! game history.
//!
//! - [`Bitboard`] - 64-bit square sets
//! - [`Occboard`] - occupancy per piece and color, with sliding attacks
//! - [`Position`] - full game state, legal moves and move application
//! - [`Game`] - history of positions with undo and end-of-game detection
//!
//! # Example
//!
//! ```
//! use ply_engine::{Game, Position};
//!
//! let position = Position::startpos();
//! assert_eq!(position.legal_moves().len(), 20);
//!
//! let mut game = Game::new();
//! game.apply_uci("e2e4").unwrap();
//! game.apply_uci("e7e5").unwrap();
//! assert_eq!(
//!     game.to_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
//! );
//! ```

mod bitboard;
mod game;
pub mod movegen;
mod occboard;
mod position;
mod zobrist;

pub use bitboard::Bitboard;
pub use game::{Game, GameError, Outcome};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::MoveList;
pub use occboard::Occboard;
pub use position::{CastlingRights, MoveError, Position, PositionError};
