use crate::evaluation::Evaluation;
use ply_core::{Color, Move};

/// Outcome of one search call.
///
/// `score` is relative to the side to move at the searched position;
/// [`SearchResult::evaluation`] gives the White-relative reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    best_move: Option<Move>,
    score: i32,
    depth: u8,
    pv: Vec<Move>,
    position_key: u64,
    nodes: u64,
    side_to_move: Color,
}

impl SearchResult {
    pub(crate) fn new(
        best_move: Option<Move>,
        score: i32,
        depth: u8,
        pv: Vec<Move>,
        position_key: u64,
        nodes: u64,
        side_to_move: Color,
    ) -> Self {
        SearchResult {
            best_move,
            score,
            depth,
            pv,
            position_key,
            nodes,
            side_to_move,
        }
    }

    /// `None` only when the searched position has no legal moves.
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Deepest fully completed iteration; 0 if none completed.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn principal_variation(&self) -> &[Move] {
        &self.pv
    }

    /// Hash key of the searched position.
    pub fn position_key(&self) -> u64 {
        self.position_key
    }

    /// Nodes visited across all iterations, including an aborted one.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation::from_side_relative(self.score, self.side_to_move)
    }

    /// The principal variation as space-separated long algebraic moves.
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(|m| m.to_uci())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::MATE;
    use ply_core::Square;

    #[test]
    fn accessors_and_formatting() {
        let e4 = Move::quiet(Square::from_algebraic("e2").unwrap(), Square::from_algebraic("e4").unwrap());
        let e5 = Move::quiet(Square::from_algebraic("e7").unwrap(), Square::from_algebraic("e5").unwrap());
        let result = SearchResult::new(Some(e4), 35, 2, vec![e4, e5], 42, 1000, Color::White);
        assert_eq!(result.best_move(), Some(e4));
        assert_eq!(result.depth(), 2);
        assert_eq!(result.principal_variation(), &[e4, e5]);
        assert_eq!(result.position_key(), 42);
        assert_eq!(result.nodes(), 1000);
        assert_eq!(result.pv_string(), "e2e4 e7e5");
        assert_eq!(result.evaluation().to_string(), "+0.35");
    }

    #[test]
    fn evaluation_is_white_relative() {
        let result = SearchResult::new(None, MATE - 3, 3, Vec::new(), 0, 0, Color::Black);
        let eval = result.evaluation();
        assert_eq!(eval.winner(), Some(Color::Black));
        assert_eq!(eval.mate_in(), 3);
        assert_eq!(result.pv_string(), "");
    }
}
