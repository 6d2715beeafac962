//! A game together with the searcher and transposition table that play it.

use crate::config::SearchConfig;
use crate::result::SearchResult;
use crate::searcher::{Searcher, SearcherST};
use crate::tt::TranspositionTable;
use ply_core::Move;
use ply_engine::{Game, GameError};
use std::time::Instant;

pub struct Session {
    config: SearchConfig,
    game: Game,
    tt: TranspositionTable,
    searcher: SearcherST,
}

impl Session {
    /// A session from the standard starting position.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_game(config, Game::new())
    }

    pub fn from_fen(config: SearchConfig, fen: &str) -> Result<Self, GameError> {
        Ok(Self::with_game(config, Game::from_fen(fen)?))
    }

    fn with_game(config: SearchConfig, game: Game) -> Self {
        let tt = TranspositionTable::with_size_mb(config.tt_size_mb);
        let searcher = SearcherST::new().with_quiescence(config.quiescence);
        Session {
            config,
            game,
            tt,
            searcher,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Searches the current position within the configured limits. The
    /// table is kept between calls, and positions earlier in the game count
    /// as repetitions.
    pub fn search(&mut self) -> SearchResult {
        if let Some((_, earlier)) = self.game.history().split_last() {
            let keys: Vec<u64> = earlier.iter().map(|p| p.hash_key()).collect();
            self.searcher.set_history(&keys);
        }
        let deadline = self.config.move_time().map(|budget| Instant::now() + budget);
        let started = Instant::now();
        let result = self.searcher.search(
            self.game.current_position(),
            self.config.max_depth,
            deadline,
            &mut self.tt,
        );
        tracing::info!(
            ply = self.game.ply_count(),
            depth = result.depth(),
            eval = %result.evaluation(),
            nodes = result.nodes(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            best = ?result.best_move(),
            "search finished"
        );
        result
    }

    /// Searches and plays the best move. Returns `None` without searching
    /// once the game is over.
    pub fn play_best(&mut self) -> Result<Option<Move>, GameError> {
        if let Some(outcome) = self.game.outcome() {
            tracing::info!(?outcome, "game over");
            return Ok(None);
        }
        let best = self.search().best_move();
        if let Some(m) = best {
            self.game.apply_move(m)?;
        }
        Ok(best)
    }

    /// Back to the starting position with an empty table.
    pub fn new_game(&mut self) {
        self.game = Game::new();
        self.tt.clear();
    }
}
