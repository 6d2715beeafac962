//! Game history.
//!
//! A [`Game`] is the list of positions reached so far, starting position
//! first. It grows by one legal move at a time and shrinks with
//! [`Game::undo`]; the current position is always the last entry.

use crate::position::{MoveError, PositionError};
use crate::{MoveList, Position};
use ply_core::{Color, Move};
use thiserror::Error;

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    InvalidPositionDescription(#[from] PositionError),

    #[error(transparent)]
    IllegalMove(#[from] MoveError),

    #[error("no move to undo")]
    NoHistory,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    /// Never empty; the last entry is the current position.
    positions: Vec<Position>,
    moves: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_position(position: Position) -> Self {
        Game {
            positions: vec![position],
            moves: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn current_position(&self) -> &Position {
        // `positions` always holds at least the starting position.
        &self.positions[self.positions.len() - 1]
    }

    pub fn start_position(&self) -> &Position {
        &self.positions[0]
    }

    pub fn legal_next_moves(&self) -> MoveList {
        self.current_position().legal_moves()
    }

    /// Plays `m`. The game is unchanged if the move is illegal.
    pub fn apply_move(&mut self, m: Move) -> Result<(), GameError> {
        let next = self.current_position().apply_move(m)?;
        tracing::trace!(mv = %m, ply = self.moves.len() + 1, "apply move");
        self.positions.push(next);
        self.moves.push(m);
        Ok(())
    }

    /// Plays a move given in long algebraic notation.
    pub fn apply_uci(&mut self, text: &str) -> Result<Move, GameError> {
        let m = self.current_position().find_move(text)?;
        self.apply_move(m)?;
        Ok(m)
    }

    /// Takes back the last move and returns it.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let m = self.moves.pop().ok_or(GameError::NoHistory)?;
        self.positions.pop();
        tracing::trace!(mv = %m, ply = self.moves.len(), "undo move");
        Ok(m)
    }

    /// All positions reached, starting position first.
    pub fn history(&self) -> &[Position] {
        &self.positions
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// How many times the current position has occurred, counting itself.
    pub fn repetition_count(&self) -> usize {
        let key = self.current_position().hash_key();
        self.positions
            .iter()
            .filter(|p| p.hash_key() == key)
            .count()
    }

    /// The result if the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        let position = self.current_position();
        if position.legal_moves().is_empty() {
            return Some(if position.is_check() {
                Outcome::Checkmate {
                    winner: position.side_to_move().opposite(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        if position.is_insufficient_material() {
            return Some(Outcome::InsufficientMaterial);
        }
        if position.halfmove_clock() >= 100 {
            return Some(Outcome::FiftyMoveRule);
        }
        if self.repetition_count() >= 3 {
            return Some(Outcome::ThreefoldRepetition);
        }
        None
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// The current position as FEN text.
    pub fn to_fen(&self) -> String {
        self.current_position().to_fen()
    }
}
