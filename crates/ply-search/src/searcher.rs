//! Iterative-deepening alpha-beta search.

use crate::eval::{static_score, PIECE_VALUES};
use crate::evaluation::{is_mate_score, MATE, MAX_PLY};
use crate::result::SearchResult;
use crate::tt::{score_from_tt, score_to_tt, Bound, Entry, TranspositionTable};
use ply_core::{Move, PieceType};
use ply_engine::{MoveList, Position};
use std::cmp::Reverse;
use std::time::Instant;

/// Wider than any reachable score.
pub const INFINITY: i32 = MATE + 1;

/// Anything that can pick a move for a position.
pub trait Searcher {
    /// Searches `position` to at most `max_depth` plies, stopping early once
    /// `deadline` passes. The table is read and updated in place and may be
    /// reused across calls.
    fn search(
        &mut self,
        position: &Position,
        max_depth: u8,
        deadline: Option<Instant>,
        tt: &mut TranspositionTable,
    ) -> SearchResult;
}

/// Triangular principal variation table: `lines[ply]` holds the best line
/// found from the node at `ply`.
struct PvTable {
    lines: Vec<[Move; MAX_PLY]>,
    lengths: [usize; MAX_PLY],
}

impl PvTable {
    fn new() -> Self {
        PvTable {
            lines: vec![[Move::NULL; MAX_PLY]; MAX_PLY],
            lengths: [0; MAX_PLY],
        }
    }

    #[inline]
    fn clear(&mut self, ply: usize) {
        self.lengths[ply] = 0;
    }

    /// `m` followed by the line of the child at `ply + 1`.
    fn update(&mut self, ply: usize, m: Move) {
        let (head, tail) = self.lines.split_at_mut(ply + 1);
        let line = &mut head[ply];
        line[0] = m;
        let child_len = match tail.first() {
            Some(child) => {
                let len = self.lengths[ply + 1].min(MAX_PLY - 1);
                line[1..=len].copy_from_slice(&child[..len]);
                len
            }
            None => 0,
        };
        self.lengths[ply] = child_len + 1;
    }

    fn line(&self, ply: usize) -> &[Move] {
        &self.lines[ply][..self.lengths[ply]]
    }
}

/// Single-threaded searcher.
pub struct SearcherST {
    quiescence: bool,
    nodes: u64,
    deadline: Option<Instant>,
    aborted: bool,
    pv: PvTable,
    /// Principal variation of the last completed iteration.
    prev_pv: Vec<Move>,
    /// Keys of the game so far followed by the current search path.
    keys: Vec<u64>,
    /// How many of `keys` came from the game.
    game_keys: usize,
}

impl Default for SearcherST {
    fn default() -> Self {
        Self::new()
    }
}

impl SearcherST {
    pub fn new() -> Self {
        SearcherST {
            quiescence: true,
            nodes: 0,
            deadline: None,
            aborted: false,
            pv: PvTable::new(),
            prev_pv: Vec::new(),
            keys: Vec::new(),
            game_keys: 0,
        }
    }

    /// With quiescence disabled, leaves are scored by the static evaluation
    /// alone.
    pub fn with_quiescence(mut self, enabled: bool) -> Self {
        self.quiescence = enabled;
        self
    }

    /// Keys of the positions played before the one about to be searched,
    /// oldest first. Reaching any of them again scores as a draw.
    pub fn set_history(&mut self, keys: &[u64]) {
        self.keys.clear();
        self.keys.extend_from_slice(keys);
        self.game_keys = keys.len();
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Polls the deadline, latching the abort flag once it has passed.
    #[inline]
    fn out_of_time(&mut self) -> bool {
        if !self.aborted {
            if let Some(deadline) = self.deadline {
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }

    /// True if `position` already occurred on the game or search path.
    /// Only positions since the last capture or pawn move can match.
    fn is_repetition(&self, position: &Position) -> bool {
        let key = position.hash_key();
        self.keys
            .iter()
            .rev()
            .take(position.halfmove_clock() as usize)
            .any(|&k| k == key)
    }

    fn negamax(
        &mut self,
        position: &Position,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        tt: &mut TranspositionTable,
    ) -> i32 {
        self.pv.clear(ply);
        if self.out_of_time() {
            return 0;
        }
        self.nodes += 1;

        let mut moves = position.legal_moves();
        let in_check = position.is_check();
        if moves.is_empty() {
            return if in_check { -(MATE - ply as i32) } else { 0 };
        }
        if ply > 0
            && (position.is_insufficient_material()
                || position.halfmove_clock() >= 100
                || self.is_repetition(position))
        {
            return 0;
        }
        // A side in check never stands pat at the horizon.
        let depth = if depth == 0 && in_check && ply < MAX_PLY - 1 {
            1
        } else {
            depth
        };
        if depth == 0 {
            return self.quiesce_moves(position, &moves, ply, alpha, beta);
        }

        let key = position.hash_key();
        let entry = tt.probe(key).copied();
        if let Some(entry) = entry {
            let score = score_from_tt(entry.score, ply);
            if ply > 0 && entry.cuts_off(depth, score, alpha, beta) {
                return score;
            }
        }

        let tt_move = entry.and_then(|e| e.best_move);
        let pv_move = self.prev_pv.get(ply).copied();
        order_moves(position, &mut moves, tt_move, pv_move);

        let original_alpha = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;
        self.keys.push(key);
        for &m in moves.iter() {
            let child = position.make_move(m);
            let score = -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha, tt);
            if self.aborted {
                break;
            }
            if score > best {
                best = score;
                best_move = Some(m);
                if score > alpha {
                    alpha = score;
                    self.pv.update(ply, m);
                }
                if score >= beta {
                    break;
                }
            }
        }
        self.keys.pop();
        if self.aborted {
            return 0;
        }

        let bound = if best >= beta {
            Bound::Lower
        } else if best > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        tt.store(Entry {
            key,
            depth,
            score: score_to_tt(best, ply),
            bound,
            best_move,
        });
        best
    }

    fn quiesce(&mut self, position: &Position, ply: usize, alpha: i32, beta: i32) -> i32 {
        if self.out_of_time() {
            return 0;
        }
        self.nodes += 1;
        let moves = position.legal_moves();
        if moves.is_empty() {
            return if position.is_check() {
                -(MATE - ply as i32)
            } else {
                0
            };
        }
        self.quiesce_moves(position, &moves, ply, alpha, beta)
    }

    /// Stand pat, then try captures and promotions only. In check there is
    /// no stand pat and every evasion is searched. Nothing found here joins
    /// the principal variation. `moves` must not be empty.
    fn quiesce_moves(
        &mut self,
        position: &Position,
        moves: &MoveList,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        if !self.quiescence || ply >= MAX_PLY - 1 {
            return static_score(position);
        }

        let in_check = position.is_check();
        let mut best = -INFINITY;
        if !in_check {
            best = static_score(position);
            if best >= beta {
                return best;
            }
            alpha = alpha.max(best);
        }

        let mut candidates: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|m| in_check || m.is_capture() || m.is_promotion())
            .collect();
        candidates.sort_by_key(|&m| Reverse(tactical_priority(position, m)));

        for m in candidates {
            let child = position.make_move(m);
            let score = -self.quiesce(&child, ply + 1, -beta, -alpha);
            if self.aborted {
                return 0;
            }
            if score > best {
                best = score;
                alpha = alpha.max(score);
                if score >= beta {
                    break;
                }
            }
        }
        best
    }
}

impl Searcher for SearcherST {
    fn search(
        &mut self,
        position: &Position,
        max_depth: u8,
        deadline: Option<Instant>,
        tt: &mut TranspositionTable,
    ) -> SearchResult {
        self.nodes = 0;
        self.deadline = deadline;
        self.aborted = false;
        self.prev_pv.clear();
        self.keys.truncate(self.game_keys);

        let key = position.hash_key();
        let side = position.side_to_move();
        let moves = position.legal_moves();
        if moves.is_empty() {
            let score = if position.is_check() { -MATE } else { 0 };
            return SearchResult::new(None, score, 0, Vec::new(), key, 0, side);
        }

        let mut best_move = moves.first();
        let mut best_score = static_score(position);
        let mut completed = 0;
        let mut pv = Vec::new();

        let max_depth = max_depth.min((MAX_PLY - 1) as u8);
        for depth in 1..=max_depth {
            let score = self.negamax(position, depth, 0, -INFINITY, INFINITY, tt);
            if self.aborted {
                tracing::debug!(depth, nodes = self.nodes, "search aborted, keeping depth {}", completed);
                break;
            }

            pv = self.pv.line(0).to_vec();
            pv.truncate(depth as usize);
            best_move = pv.first().copied().or(best_move);
            best_score = score;
            completed = depth;
            tracing::debug!(
                depth,
                score,
                nodes = self.nodes,
                pv = %pv_text(&pv),
                "iteration complete"
            );
            self.prev_pv.clone_from(&pv);

            if is_mate_score(score) && MATE - score.abs() <= depth as i32 {
                break;
            }
        }

        SearchResult::new(best_move, best_score, completed, pv, key, self.nodes, side)
    }
}

fn pv_text(pv: &[Move]) -> String {
    pv.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ")
}

/// Orders `moves` in place: hash move, previous principal variation move,
/// captures by MVV-LVA, promotions, then quiet moves in generation order.
fn order_moves(position: &Position, moves: &mut MoveList, tt_move: Option<Move>, pv_move: Option<Move>) {
    moves.as_mut_slice().sort_by_key(|&m| {
        let priority = if Some(m) == tt_move {
            3_000_000
        } else if Some(m) == pv_move {
            2_000_000
        } else {
            tactical_priority(position, m)
        };
        Reverse(priority)
    });
}

/// MVV-LVA for captures, piece value for quiet promotions, zero otherwise.
fn tactical_priority(position: &Position, m: Move) -> i32 {
    let board = position.board();
    let promotion = m.promotion().map_or(0, |piece| PIECE_VALUES[piece.index()]);
    if m.is_capture() {
        let victim = if m.is_en_passant() {
            PieceType::Pawn
        } else {
            board.piece_at(m.to()).unwrap_or(PieceType::Pawn)
        };
        let attacker = board.piece_at(m.from()).unwrap_or(PieceType::Pawn);
        1_000_000 + 10 * PIECE_VALUES[victim.index()] - attacker.index() as i32 + promotion
    } else if promotion > 0 {
        500_000 + promotion
    } else {
        0
    }
}
