//! Precomputed attack tables.
//!
//! Leapers (knight, king, pawn) get one table per square. Sliders are
//! handled with classical rays: [`ray`] gives every square reachable in a
//! direction on an empty board and [`Occboard`](crate::Occboard) cuts it at
//! the first blocker.

use crate::Bitboard;
use ply_core::{Color, Square};

/// The eight sliding directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    NorthEast = 2,
    NorthWest = 3,
    South = 4,
    West = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    /// (rank delta, file delta) of one step.
    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::East => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (1, -1),
            Direction::South => (-1, 0),
            Direction::West => (0, -1),
            Direction::SouthEast => (-1, 1),
            Direction::SouthWest => (-1, -1),
        }
    }

    /// True when stepping this way increases the square index, so the
    /// nearest blocker is the lowest set bit.
    #[inline]
    pub const fn is_positive(self) -> bool {
        (self as u8) < 4
    }

    /// The direction leading from `from` to `to`, if they share a line.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        let dr = to.rank_index() as i8 - from.rank_index() as i8;
        let df = to.file_index() as i8 - from.file_index() as i8;
        if dr == 0 && df == 0 {
            return None;
        }
        if dr != 0 && df != 0 && dr.abs() != df.abs() {
            return None;
        }
        Some(match (dr.signum(), df.signum()) {
            (1, 0) => Direction::North,
            (0, 1) => Direction::East,
            (1, 1) => Direction::NorthEast,
            (1, -1) => Direction::NorthWest,
            (-1, 0) => Direction::South,
            (0, -1) => Direction::West,
            (-1, 1) => Direction::SouthEast,
            _ => Direction::SouthWest,
        })
    }
}

const KNIGHT_ATTACKS: [Bitboard; 64] =
    leaper_table(&[(2, 1), (2, -1), (-2, 1), (-2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2)]);

const KING_ATTACKS: [Bitboard; 64] =
    leaper_table(&[(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)]);

/// Pawn captures, [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(1, 1), (1, -1)]),
    leaper_table(&[(-1, 1), (-1, -1)]),
];

/// Empty-board rays, [direction][square]. The origin is excluded.
const RAYS: [[Bitboard; 64]; 8] = compute_rays();

/// Whole lines through each square, origin included.
const RANK_LINES: [Bitboard; 64] = line_table(Direction::East, Direction::West);
const FILE_LINES: [Bitboard; 64] = line_table(Direction::North, Direction::South);
const DIAGONAL_LINES: [Bitboard; 64] = line_table(Direction::NorthEast, Direction::SouthWest);
const ANTI_DIAGONAL_LINES: [Bitboard; 64] = line_table(Direction::NorthWest, Direction::SouthEast);

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let origin = Square::from_index_unchecked(sq);
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            if let Some(target) = origin.offset(deltas[i].0, deltas[i].1) {
                bits |= target.bit();
            }
            i += 1;
        }
        table[sq as usize] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_from(origin: Square, dir: Direction) -> u64 {
    let (dr, df) = dir.delta();
    let mut bits = 0u64;
    let mut current = origin;
    while let Some(next) = current.offset(dr, df) {
        bits |= next.bit();
        current = next;
    }
    bits
}

const fn compute_rays() -> [[Bitboard; 64]; 8] {
    const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::South,
        Direction::West,
        Direction::SouthEast,
        Direction::SouthWest,
    ];
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut d = 0;
    while d < 8 {
        let mut sq = 0u8;
        while sq < 64 {
            rays[d][sq as usize] = Bitboard(ray_from(Square::from_index_unchecked(sq), ALL[d]));
            sq += 1;
        }
        d += 1;
    }
    rays
}

const fn line_table(a: Direction, b: Direction) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let origin = Square::from_index_unchecked(sq);
        table[sq as usize] = Bitboard(ray_from(origin, a) | ray_from(origin, b) | origin.bit());
        sq += 1;
    }
    table
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.idx()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.idx()]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.idx()]
}

/// Every square reachable from `sq` in `dir` on an empty board.
#[inline]
pub fn ray(dir: Direction, sq: Square) -> Bitboard {
    RAYS[dir as usize][sq.idx()]
}

#[inline]
pub fn rank_line(sq: Square) -> Bitboard {
    RANK_LINES[sq.idx()]
}

#[inline]
pub fn file_line(sq: Square) -> Bitboard {
    FILE_LINES[sq.idx()]
}

#[inline]
pub fn diagonal_line(sq: Square) -> Bitboard {
    DIAGONAL_LINES[sq.idx()]
}

#[inline]
pub fn anti_diagonal_line(sq: Square) -> Bitboard {
    ANTI_DIAGONAL_LINES[sq.idx()]
}

/// Cuts the ray from `sq` in `dir` at the first square set in `blockers`.
/// The blocker itself stays in the result.
#[inline]
pub fn ray_attacks(dir: Direction, sq: Square, blockers: Bitboard) -> Bitboard {
    let full = ray(dir, sq);
    let hits = full & blockers;
    let nearest = if dir.is_positive() { hits.lsb() } else { hits.msb() };
    match nearest {
        Some(blocker) => full & !ray(dir, blocker),
        None => full,
    }
}

/// Squares strictly between `a` and `b`; empty unless they share a line.
pub fn between(a: Square, b: Square) -> Bitboard {
    match Direction::between(a, b) {
        Some(dir) => ray(dir, a) & !ray(dir, b) & !Bitboard::from_square(b),
        None => Bitboard::EMPTY,
    }
}

/// The full line through `a` and `b`; empty unless they share one.
pub fn line_through(a: Square, b: Square) -> Bitboard {
    match Direction::between(a, b) {
        Some(Direction::North | Direction::South) => file_line(a),
        Some(Direction::East | Direction::West) => rank_line(a),
        Some(Direction::NorthEast | Direction::SouthWest) => diagonal_line(a),
        Some(_) => anti_diagonal_line(a),
        None => Bitboard::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn knight_corner_and_center() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert!(knight_attacks(Square::G1).contains(sq("f3")));
    }

    #[test]
    fn king_edges() {
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(king_attacks(sq("e4")).count(), 8);
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(sq("e4"), Color::White);
        assert!(white.contains(sq("d5")) && white.contains(sq("f5")));
        let black = pawn_attacks(sq("a5"), Color::Black);
        assert_eq!(black, Bitboard::from_square(sq("b4")));
    }

    #[test]
    fn rays_exclude_origin() {
        assert_eq!(ray(Direction::North, Square::A1).count(), 7);
        assert!(!ray(Direction::North, Square::A1).contains(Square::A1));
        assert!(ray(Direction::East, Square::H1).is_empty());
        assert_eq!(ray(Direction::NorthEast, Square::A1).count(), 7);
    }

    #[test]
    fn lines_include_origin() {
        assert_eq!(rank_line(sq("d4")).count(), 8);
        assert_eq!(file_line(sq("d4")).count(), 8);
        assert_eq!(diagonal_line(Square::A1).count(), 8);
        assert_eq!(anti_diagonal_line(Square::A1), Bitboard::from_square(Square::A1));
        assert!(diagonal_line(sq("d4")).contains(sq("d4")));
    }

    #[test]
    fn ray_attacks_stop_at_blocker() {
        let blockers = Bitboard::from_square(sq("a4"));
        let north = ray_attacks(Direction::North, Square::A1, blockers);
        assert_eq!(north.count(), 3);
        assert!(north.contains(sq("a4")));
        assert!(!north.contains(sq("a5")));

        let blockers = Bitboard::from_square(sq("b1")) | Bitboard::from_square(sq("d1"));
        let west = ray_attacks(Direction::West, Square::E1, blockers);
        assert_eq!(west, Bitboard::from_square(sq("d1")));
    }

    #[test]
    fn between_and_line() {
        assert_eq!(between(Square::A1, Square::H8).count(), 6);
        assert_eq!(between(Square::E1, Square::H1).count(), 2);
        assert!(between(Square::E1, sq("f3")).is_empty());
        assert!(between(Square::E1, Square::F1).is_empty());
        assert_eq!(line_through(sq("c3"), sq("e5")), diagonal_line(Square::A1));
        assert!(line_through(Square::A1, sq("b3")).is_empty());
    }
}
