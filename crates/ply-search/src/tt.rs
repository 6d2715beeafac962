//! Transposition table.
//!
//! A single-slot, always-replace hash table keyed by the Zobrist key of a
//! position. A slot keeps a deeper entry for the same position over a
//! shallower one; any other collision overwrites.

use crate::evaluation::MATE_BOUND;
use core::mem::size_of;
use ply_core::Move;

const MIN_ENTRIES: usize = 1;

/// Default table size in megabytes.
pub const DEFAULT_SIZE_MB: usize = 16;

/// Largest table a configuration may ask for.
pub const MAX_SIZE_MB: usize = 64 * 1024;

/// How the stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact: it fell strictly inside the search window.
    Exact,
    /// The search failed high; the true score is at least this.
    Lower,
    /// The search failed low; the true score is at most this.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u8,
    /// Mate scores are stored relative to this node, not the root.
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl Entry {
    /// Whether this entry settles a node searched to `depth` with window
    /// `(alpha, beta)`, given its score already converted with
    /// [`score_from_tt`].
    pub fn cuts_off(&self, depth: u8, score: i32, alpha: i32, beta: i32) -> bool {
        if self.depth < depth {
            return false;
        }
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
}

impl TranspositionTable {
    pub fn with_size_bytes(bytes: usize) -> Self {
        let entry_size = size_of::<Option<Entry>>().max(1);
        let count = (bytes / entry_size).max(MIN_ENTRIES);
        Self {
            entries: vec![None; count],
        }
    }

    pub fn with_size_mb(mb: usize) -> Self {
        Self::with_size_bytes(mb.saturating_mul(1024 * 1024))
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn probe(&self, key: u64) -> Option<&Entry> {
        let idx = self.index(key);
        self.entries[idx].as_ref().filter(|entry| entry.key == key)
    }

    pub fn store(&mut self, entry: Entry) {
        let idx = self.index(entry.key);
        match &self.entries[idx] {
            Some(existing) if existing.key == entry.key && existing.depth > entry.depth => {}
            _ => self.entries[idx] = Some(entry),
        }
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::with_size_mb(DEFAULT_SIZE_MB)
    }
}

/// Converts a root-relative score found `ply` plies deep into the
/// node-relative form kept in the table.
#[inline]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`] for a node `ply` plies from the root.
#[inline]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}
