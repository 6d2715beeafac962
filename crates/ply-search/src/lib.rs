//! Position evaluation and search.
//!
//! [`SearcherST`] runs an iterative-deepening alpha-beta search over
//! [`ply_engine::Position`]s, memoizing bounds in a caller-owned
//! [`TranspositionTable`], and reports a [`SearchResult`]. [`Session`]
//! ties a searcher, a table and a [`ply_engine::Game`] together under a
//! [`SearchConfig`].
//!
//! ```
//! use ply_engine::Position;
//! use ply_search::{Searcher, SearcherST, TranspositionTable};
//!
//! let position = Position::startpos();
//! let mut tt = TranspositionTable::with_size_mb(1);
//! let result = SearcherST::new().search(&position, 3, None, &mut tt);
//! assert_eq!(result.depth(), 3);
//! assert!(result.best_move().is_some());
//! ```

pub mod config;
pub mod eval;
mod evaluation;
mod result;
mod searcher;
mod session;
pub mod tt;

pub use config::{ConfigError, SearchConfig};
pub use eval::{evaluate, static_score};
pub use evaluation::{is_mate_score, Evaluation, EVAL_LIMIT, MATE, MATE_BOUND, MAX_PLY};
pub use result::SearchResult;
pub use searcher::{Searcher, SearcherST, INFINITY};
pub use session::Session;
pub use tt::{Bound, Entry, TranspositionTable};
