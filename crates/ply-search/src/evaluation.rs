//! Scores and mate distances.

use ply_core::Color;
use std::cmp::Ordering;
use std::fmt;

/// Score of a side delivering mate on the spot. A mate `n` plies away
/// scores `MATE - n`.
pub const MATE: i32 = 32_000;

/// Deepest ply the searcher will reach.
pub const MAX_PLY: usize = 128;

/// Scores at or beyond this magnitude are mate scores.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Heuristic scores are clamped to `±EVAL_LIMIT`, well inside `MATE_BOUND`.
pub const EVAL_LIMIT: i32 = 20_000;

/// True for scores that encode a forced mate.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// A White-relative verdict on a position.
///
/// `score` is in centipawns and positive when White is better. When
/// `forced_mate` is set the score is `±(MATE - mate_in)` and `mate_in` is
/// the distance to mate in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evaluation {
    score: i32,
    forced_mate: bool,
    mate_in: u32,
}

impl Evaluation {
    /// Interprets a White-relative score, recognising mate scores.
    pub fn from_score(score: i32) -> Self {
        if is_mate_score(score) {
            let score = score.clamp(-MATE, MATE);
            Evaluation {
                score,
                forced_mate: true,
                mate_in: (MATE - score.abs()) as u32,
            }
        } else {
            Self::heuristic(score)
        }
    }

    /// A non-mate score, clamped into the heuristic range.
    pub fn heuristic(score: i32) -> Self {
        Evaluation {
            score: score.clamp(-EVAL_LIMIT, EVAL_LIMIT),
            forced_mate: false,
            mate_in: 0,
        }
    }

    /// Converts a score relative to `side` into a White-relative evaluation.
    pub fn from_side_relative(score: i32, side: Color) -> Self {
        Self::from_score(score * side.sign())
    }

    pub fn draw() -> Self {
        Self::heuristic(0)
    }

    /// `winner` mates in `plies`.
    pub fn mate(winner: Color, plies: u32) -> Self {
        let plies = plies.min(MAX_PLY as u32);
        Evaluation {
            score: winner.sign() * (MATE - plies as i32),
            forced_mate: true,
            mate_in: plies,
        }
    }

    #[inline]
    pub fn score(self) -> i32 {
        self.score
    }

    #[inline]
    pub fn is_forced_mate(self) -> bool {
        self.forced_mate
    }

    /// Plies to mate; zero unless [`Self::is_forced_mate`].
    #[inline]
    pub fn mate_in(self) -> u32 {
        self.mate_in
    }

    /// The side delivering a forced mate.
    pub fn winner(self) -> Option<Color> {
        match (self.forced_mate, self.score.signum()) {
            (true, 1) => Some(Color::White),
            (true, -1) => Some(Color::Black),
            _ => None,
        }
    }

    /// Score from the point of view of `side`.
    #[inline]
    pub fn relative_to(self, side: Color) -> i32 {
        self.score * side.sign()
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `+0.35` for heuristic scores, `#3` / `#-3` when White / Black mates in
/// three plies.
impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.forced_mate {
            let sign = if self.score < 0 { "-" } else { "" };
            write!(f, "#{}{}", sign, self.mate_in)
        } else {
            let sign = if self.score < 0 { '-' } else { '+' };
            let abs = self.score.abs();
            write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
        }
    }
}
