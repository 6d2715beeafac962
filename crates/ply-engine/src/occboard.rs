//! Piece occupancy.

use crate::movegen::attacks::{
    anti_diagonal_line, diagonal_line, file_line, rank_line, ray_attacks, Direction,
};
use crate::Bitboard;
use ply_core::{Color, PieceType, Square};

/// Occupancy per piece type and per color, with a cached union.
///
/// Every piece bit belongs to exactly one color set, the color sets are
/// disjoint and `all` is their union.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Occboard {
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    all: Bitboard,
}

impl Occboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Squares holding `piece` of `color`.
    #[inline]
    pub fn occupancy(&self, piece: PieceType, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Squares holding `piece` of either color.
    #[inline]
    pub fn pieces(&self, piece: PieceType) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn all_occupied(&self) -> Bitboard {
        self.all
    }

    /// Occupied squares on the rank through `sq`.
    #[inline]
    pub fn rank_mask(&self, sq: Square) -> Bitboard {
        self.all & rank_line(sq)
    }

    /// Occupied squares on the file through `sq`.
    #[inline]
    pub fn file_mask(&self, sq: Square) -> Bitboard {
        self.all & file_line(sq)
    }

    /// Occupied squares on the a1-h8 direction diagonal through `sq`.
    #[inline]
    pub fn diagonal_mask(&self, sq: Square) -> Bitboard {
        self.all & diagonal_line(sq)
    }

    /// Occupied squares on the h1-a8 direction diagonal through `sq`.
    #[inline]
    pub fn anti_diagonal_mask(&self, sq: Square) -> Bitboard {
        self.all & anti_diagonal_line(sq)
    }

    /// Rook attacks from `sq`, first blocker of either color included.
    pub fn rook_attacks(&self, sq: Square) -> Bitboard {
        rook_attacks_with(sq, self.all)
    }

    /// Bishop attacks from `sq`, first blocker of either color included.
    pub fn bishop_attacks(&self, sq: Square) -> Bitboard {
        bishop_attacks_with(sq, self.all)
    }

    pub fn queen_attacks(&self, sq: Square) -> Bitboard {
        self.rook_attacks(sq) | self.bishop_attacks(sq)
    }

    /// Places a piece on an empty square.
    #[inline]
    pub fn put(&mut self, piece: PieceType, color: Color, sq: Square) {
        debug_assert!(!self.all.contains(sq), "{} is occupied", sq);
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
        self.all.set(sq);
    }

    /// Removes a piece known to be on `sq`.
    #[inline]
    pub fn remove(&mut self, piece: PieceType, color: Color, sq: Square) {
        debug_assert!(self.occupancy(piece, color).contains(sq), "no {} {} on {}", color, piece, sq);
        self.pieces[piece.index()].clear(sq);
        self.colors[color.index()].clear(sq);
        self.all.clear(sq);
    }

    pub fn piece_at(&self, sq: Square) -> Option<PieceType> {
        if !self.all.contains(sq) {
            return None;
        }
        PieceType::ALL
            .into_iter()
            .find(|&piece| self.pieces[piece.index()].contains(sq))
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        Color::BOTH
            .into_iter()
            .find(|&color| self.colors[color.index()].contains(sq))
    }

    /// The king square of `color`, if there is one.
    #[inline]
    pub fn king(&self, color: Color) -> Option<Square> {
        self.occupancy(PieceType::King, color).lsb()
    }

    /// Checks the occupancy invariants.
    pub fn is_consistent(&self) -> bool {
        let white = self.colors[0];
        let black = self.colors[1];
        let union = self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        let pairwise_disjoint = (0..6).all(|i| {
            (i + 1..6).all(|j| (self.pieces[i] & self.pieces[j]).is_empty())
        });
        (white & black).is_empty() && self.all == white | black && union == self.all && pairwise_disjoint
    }
}

/// Rook attacks from `sq` for an arbitrary blocker set.
pub(crate) fn rook_attacks_with(sq: Square, occupied: Bitboard) -> Bitboard {
    let file = occupied & file_line(sq);
    let rank = occupied & rank_line(sq);
    ray_attacks(Direction::North, sq, file)
        | ray_attacks(Direction::South, sq, file)
        | ray_attacks(Direction::East, sq, rank)
        | ray_attacks(Direction::West, sq, rank)
}

/// Bishop attacks from `sq` for an arbitrary blocker set.
pub(crate) fn bishop_attacks_with(sq: Square, occupied: Bitboard) -> Bitboard {
    let diagonal = occupied & diagonal_line(sq);
    let anti = occupied & anti_diagonal_line(sq);
    ray_attacks(Direction::NorthEast, sq, diagonal)
        | ray_attacks(Direction::SouthWest, sq, diagonal)
        | ray_attacks(Direction::NorthWest, sq, anti)
        | ray_attacks(Direction::SouthEast, sq, anti)
}

impl std::fmt::Debug for Occboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                let c = match (self.piece_at(sq), self.color_at(sq)) {
                    (Some(piece), Some(color)) => piece.to_fen_char(color),
                    _ => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn board(placed: &[(PieceType, Color, &str)]) -> Occboard {
        let mut occ = Occboard::new();
        for &(piece, color, name) in placed {
            occ.put(piece, color, sq(name));
        }
        occ
    }

    #[test]
    fn put_and_remove_keep_invariants() {
        let mut occ = board(&[
            (PieceType::King, Color::White, "e1"),
            (PieceType::King, Color::Black, "e8"),
            (PieceType::Rook, Color::White, "a1"),
        ]);
        assert!(occ.is_consistent());
        assert_eq!(occ.all_occupied().count(), 3);
        assert_eq!(occ.piece_at(Square::A1), Some(PieceType::Rook));
        assert_eq!(occ.color_at(Square::E8), Some(Color::Black));
        assert_eq!(occ.king(Color::White), Some(Square::E1));

        occ.remove(PieceType::Rook, Color::White, Square::A1);
        assert!(occ.is_consistent());
        assert_eq!(occ.piece_at(Square::A1), None);
        assert_eq!(occ.color_at(Square::A1), None);
    }

    #[test]
    fn line_masks() {
        let occ = board(&[
            (PieceType::Rook, Color::White, "d4"),
            (PieceType::Pawn, Color::Black, "d7"),
            (PieceType::Pawn, Color::White, "g4"),
            (PieceType::Bishop, Color::Black, "a1"),
            (PieceType::Knight, Color::Black, "a7"),
        ]);
        assert_eq!(occ.file_mask(sq("d4")).count(), 2);
        assert_eq!(occ.rank_mask(sq("d4")).count(), 2);
        assert_eq!(occ.diagonal_mask(sq("d4")).count(), 2);
        assert_eq!(occ.anti_diagonal_mask(sq("d4")).count(), 2);
    }

    #[test]
    fn rook_stops_at_blockers_of_both_colors() {
        let occ = board(&[
            (PieceType::Rook, Color::White, "d4"),
            (PieceType::Pawn, Color::Black, "d7"),
            (PieceType::Pawn, Color::White, "f4"),
        ]);
        let attacks = occ.rook_attacks(sq("d4"));
        assert!(attacks.contains(sq("d7")));
        assert!(!attacks.contains(sq("d8")));
        assert!(attacks.contains(sq("f4")));
        assert!(!attacks.contains(sq("g4")));
        assert!(attacks.contains(sq("a4")));
        assert!(attacks.contains(sq("d1")));
        assert_eq!(attacks.count(), 3 + 2 + 3 + 3);
    }

    #[test]
    fn bishop_on_empty_board() {
        let occ = board(&[(PieceType::Bishop, Color::White, "d4")]);
        assert_eq!(occ.bishop_attacks(sq("d4")).count(), 13);
        assert_eq!(occ.queen_attacks(sq("d4")).count(), 27);
    }
}
