//! Piece kinds, their fixed matrices and pure rotation.

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// Square grid of cell values. 0 is empty; a piece's filled cells all share its value.
pub type Matrix = Vec<Vec<u8>>;

/// The seven piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    I,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::T, Self::O, Self::L, Self::J, Self::I, Self::S, Self::Z];

    /// Fill value used by this kind's cells; doubles as its colour index (1..=7).
    pub const fn value(self) -> u8 {
        match self {
            Self::T => 1,
            Self::O => 2,
            Self::L => 3,
            Self::J => 4,
            Self::I => 5,
            Self::S => 6,
            Self::Z => 7,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::T => 'T',
            Self::O => 'O',
            Self::L => 'L',
            Self::J => 'J',
            Self::I => 'I',
            Self::S => 'S',
            Self::Z => 'Z',
        }
    }

    /// Fresh copy of the spawn matrix for this kind.
    pub fn matrix(self) -> Matrix {
        let v = self.value();
        let rows: &[&[u8]] = match self {
            Self::T => &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::L => &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
            Self::J => &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
            Self::I => &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        rows.iter()
            .map(|row| row.iter().map(|&filled| filled * v).collect())
            .collect()
    }
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Matrix turned 90° in `dir`: transpose, then mirror rows (clockwise) or flip row order.
///
/// Panics if `matrix` is not square.
pub fn rotated(matrix: &Matrix, dir: Direction) -> Matrix {
    let n = matrix.len();
    assert!(
        matrix.iter().all(|row| row.len() == n),
        "rotation needs a square matrix"
    );
    let mut out: Matrix = (0..n)
        .map(|y| (0..n).map(|x| matrix[x][y]).collect())
        .collect();
    match dir {
        Direction::Clockwise => out.iter_mut().for_each(|row| row.reverse()),
        Direction::CounterClockwise => out.reverse(),
    }
    out
}

/// Width of the matrix's bounding box.
pub fn width(matrix: &Matrix) -> usize {
    matrix.first().map_or(0, Vec::len)
}
