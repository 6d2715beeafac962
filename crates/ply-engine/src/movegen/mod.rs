//! Legal move generation.
//!
//! Check and pin information is computed once per position, then each
//! piece only generates moves that respect it. King moves are tested
//! against attacks with the king lifted off the board, and en passant is
//! verified by playing it out, which also catches the rare case of two
//! pawns leaving a rank at once and exposing the king.

pub(crate) mod attacks;
pub mod perft;

use crate::occboard::{bishop_attacks_with, rook_attacks_with};
use crate::zobrist::ZOBRIST;
use crate::{Bitboard, Position};
use attacks::{between, king_attacks, knight_attacks, line_through, pawn_attacks};
use ply_core::{Color, Move, MoveKind, PieceType, Square};

/// A list of moves with a fixed maximum capacity.
///
/// No position has more than 218 legal moves, so a fixed array avoids heap
/// allocation during search.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    #[inline]
    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// What the side to move may do, given checks and pins against its king.
struct Constraints {
    us: Color,
    king: Square,
    ours: Bitboard,
    theirs: Bitboard,
    checkers: Bitboard,
    /// Destinations that resolve a check (everything when not in check).
    evasion: Bitboard,
    pinned: Bitboard,
}

impl Constraints {
    fn new(position: &Position, us: Color, king: Square) -> Self {
        let them = us.opposite();
        let b = &position.board;
        let ours = b.color(us);
        let occupied = b.all_occupied();

        let checkers = position.attackers_to(king, them);
        let evasion = match checkers.count() {
            0 => Bitboard::FULL,
            1 => checkers | checkers.lsb().map_or(Bitboard::EMPTY, |c| between(king, c)),
            _ => Bitboard::EMPTY,
        };

        let queens = b.occupancy(PieceType::Queen, them);
        let snipers = (rook_attacks_with(king, Bitboard::EMPTY)
            & (b.occupancy(PieceType::Rook, them) | queens))
            | (bishop_attacks_with(king, Bitboard::EMPTY)
                & (b.occupancy(PieceType::Bishop, them) | queens));
        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers {
            let blockers = between(king, sniper) & occupied;
            if blockers.count() == 1 && (blockers & ours).any() {
                pinned |= blockers;
            }
        }

        Constraints {
            us,
            king,
            ours,
            theirs: b.color(them),
            checkers,
            evasion,
            pinned,
        }
    }

    /// Destinations open to the non-king piece on `from`.
    #[inline]
    fn allowed(&self, from: Square) -> Bitboard {
        let mut allowed = !self.ours & self.evasion;
        if self.pinned.contains(from) {
            allowed &= line_through(self.king, from);
        }
        allowed
    }

    #[inline]
    fn kind_for(&self, to: Square) -> MoveKind {
        if self.theirs.contains(to) {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        }
    }
}

/// Generates all legal moves: pawns, knights, bishops, rooks, queens, king,
/// then castling, each group by ascending origin square.
pub fn generate_legal(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move;
    let Some(king) = position.board.king(us) else {
        return moves;
    };
    let c = Constraints::new(position, us, king);

    if !c.checkers.has_several() {
        generate_pawn_moves(position, &c, &mut moves);
        for piece in [
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
        ] {
            generate_piece_moves(position, &c, piece, &mut moves);
        }
    }
    generate_king_moves(position, &c, &mut moves);
    if c.checkers.is_empty() {
        generate_castling_moves(position, &c, &mut moves);
    }
    moves
}

fn push_pawn_move(from: Square, to: Square, capture: bool, us: Color, moves: &mut MoveList) {
    if to.rank_index() == us.promotion_rank() {
        for piece in PieceType::PROMOTIONS {
            moves.push(Move::new(from, to, MoveKind::promotion(piece, capture)));
        }
    } else if capture {
        moves.push(Move::new(from, to, MoveKind::Capture));
    } else {
        moves.push(Move::quiet(from, to));
    }
}

fn generate_pawn_moves(position: &Position, c: &Constraints, moves: &mut MoveList) {
    let us = c.us;
    let occupied = position.board.all_occupied();
    let forward: i8 = match us {
        Color::White => 1,
        Color::Black => -1,
    };
    let start_rank = match us {
        Color::White => 1,
        Color::Black => 6,
    };

    for from in position.board.occupancy(PieceType::Pawn, us) {
        let allowed = c.allowed(from);

        if let Some(one) = from.offset(forward, 0).filter(|sq| !occupied.contains(*sq)) {
            if allowed.contains(one) {
                push_pawn_move(from, one, false, us, moves);
            }
            if from.rank_index() == start_rank {
                if let Some(two) = one.offset(forward, 0) {
                    if !occupied.contains(two) && allowed.contains(two) {
                        moves.push(Move::new(from, two, MoveKind::DoublePush));
                    }
                }
            }
        }

        for to in pawn_attacks(from, us) & c.theirs & allowed {
            push_pawn_move(from, to, true, us, moves);
        }

        if let Some(target) = position.en_passant {
            if pawn_attacks(from, us).contains(target) && en_passant_is_legal(position, from, target) {
                moves.push(Move::new(from, target, MoveKind::EnPassant));
            }
        }
    }
}

fn en_passant_is_legal(position: &Position, from: Square, target: Square) -> bool {
    let us = position.side_to_move;
    let back = match us {
        Color::White => -1,
        Color::Black => 1,
    };
    let victim_present = target.offset(back, 0).is_some_and(|victim| {
        position
            .board
            .occupancy(PieceType::Pawn, us.opposite())
            .contains(victim)
    });
    if !victim_present || position.board.all_occupied().contains(target) {
        return false;
    }
    let after = make_move(position, Move::new(from, target, MoveKind::EnPassant));
    !after.is_in_check(us)
}

fn generate_piece_moves(
    position: &Position,
    c: &Constraints,
    piece: PieceType,
    moves: &mut MoveList,
) {
    let board = &position.board;
    for from in board.occupancy(piece, c.us) {
        let attacks = match piece {
            PieceType::Knight => knight_attacks(from),
            PieceType::Bishop => board.bishop_attacks(from),
            PieceType::Rook => board.rook_attacks(from),
            _ => board.queen_attacks(from),
        };
        for to in attacks & c.allowed(from) {
            moves.push(Move::new(from, to, c.kind_for(to)));
        }
    }
}

fn generate_king_moves(position: &Position, c: &Constraints, moves: &mut MoveList) {
    let them = c.us.opposite();
    let without_king = position.board.all_occupied().without(c.king);
    for to in king_attacks(c.king) & !c.ours {
        if position.attackers_with(to, them, without_king).is_empty() {
            moves.push(Move::new(c.king, to, c.kind_for(to)));
        }
    }
}

fn generate_castling_moves(position: &Position, c: &Constraints, moves: &mut MoveList) {
    use crate::position::CastlingRights;

    let us = c.us;
    let rank = us.home_rank();
    let on_home = |file: u8| Square::from_index_unchecked(rank * 8 + file);
    if c.king != on_home(4) {
        return;
    }
    let occupied = position.board.all_occupied();
    let rooks = position.board.occupancy(PieceType::Rook, us);
    let them = us.opposite();

    // (right, rook file, files that must be empty, files the king crosses, kind)
    let sides = [
        (
            CastlingRights::kingside(us),
            7,
            &[5u8, 6][..],
            &[5u8, 6][..],
            MoveKind::CastleKingside,
        ),
        (
            CastlingRights::queenside(us),
            0,
            &[1u8, 2, 3][..],
            &[3u8, 2][..],
            MoveKind::CastleQueenside,
        ),
    ];
    for (right, rook_file, empty, transit, kind) in sides {
        if !position.castling.contains(right) || !rooks.contains(on_home(rook_file)) {
            continue;
        }
        if empty.iter().any(|&f| occupied.contains(on_home(f))) {
            continue;
        }
        if transit
            .iter()
            .any(|&f| position.is_square_attacked(on_home(f), them))
        {
            continue;
        }
        let to = match kind {
            MoveKind::CastleKingside => on_home(6),
            _ => on_home(2),
        };
        moves.push(Move::new(c.king, to, kind));
    }
}

/// Plays a move known to be legal (or, for en passant probing, pseudo-legal)
/// and returns the resulting position.
pub(crate) fn make_move(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;
    let them = us.opposite();
    let from = m.from();
    let to = m.to();

    let Some(piece) = position.board.piece_at(from) else {
        debug_assert!(false, "no piece on {} for {:?}", from, m);
        return next;
    };

    let mut key = position.key
        ^ ZOBRIST.black_to_move
        ^ ZOBRIST.en_passant(position.en_passant)
        ^ ZOBRIST.castling(position.castling);

    let victim_square = if m.is_en_passant() {
        Square::from_index_unchecked(match us {
            Color::White => to.index() - 8,
            Color::Black => to.index() + 8,
        })
    } else {
        to
    };
    if m.is_capture() {
        if let Some(captured) = position.board.piece_at(victim_square) {
            next.board.remove(captured, them, victim_square);
            key ^= ZOBRIST.piece(captured, them, victim_square);
        }
    }

    let placed = m.promotion().unwrap_or(piece);
    next.board.remove(piece, us, from);
    next.board.put(placed, us, to);
    key ^= ZOBRIST.piece(piece, us, from) ^ ZOBRIST.piece(placed, us, to);

    if m.is_castle() {
        let rank = us.home_rank() * 8;
        let (rook_from, rook_to) = match m.kind() {
            MoveKind::CastleKingside => (rank + 7, rank + 5),
            _ => (rank, rank + 3),
        };
        let rook_from = Square::from_index_unchecked(rook_from);
        let rook_to = Square::from_index_unchecked(rook_to);
        next.board.remove(PieceType::Rook, us, rook_from);
        next.board.put(PieceType::Rook, us, rook_to);
        key ^= ZOBRIST.piece(PieceType::Rook, us, rook_from) ^ ZOBRIST.piece(PieceType::Rook, us, rook_to);
    }

    next.castling = position.castling.after_touching(from).after_touching(to);
    next.en_passant = match m.kind() {
        MoveKind::DoublePush => Square::from_index((from.index() + to.index()) / 2),
        _ => None,
    };
    key ^= ZOBRIST.castling(next.castling) ^ ZOBRIST.en_passant(next.en_passant);

    next.halfmove_clock = if piece == PieceType::Pawn || m.is_capture() {
        0
    } else {
        position.halfmove_clock + 1
    };
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = them;
    next.key = key;
    next.refresh_checks();

    debug_assert_eq!(next.key, next.compute_key());
    debug_assert!(next.board.is_consistent());
    next
}
