//! Score and direction matrices, stored as flat row-major buffers.
//!
//! Both matrices are created once per run by [`init_matrices`], written only
//! by the fill, and read-only afterwards. Cell `(y, x)` lives at
//! `y * columns + x`; `y` walks seq2 and `x` walks seq1.
use std::fmt;

use crate::common::{NeedleError, NeedleParams, Shape};

/// Set of optimal moves into a cell: any subset of DIAG, UP, LEFT.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Directions(u8);

impl Directions {
    pub const NONE: Directions = Directions(0);
    pub const DIAG: Directions = Directions(0b001);
    pub const UP: Directions = Directions(0b010);
    pub const LEFT: Directions = Directions(0b100);

    #[inline]
    pub fn contains(self, other: Directions) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Directions) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of moves in the set (0..=3).
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitOr for Directions {
    type Output = Directions;
    fn bitor(self, rhs: Directions) -> Directions {
        Directions(self.0 | rhs.0)
    }
}

impl fmt::Debug for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Directions::DIAG) {
            set.entry(&format_args!("DIAG"));
        }
        if self.contains(Directions::UP) {
            set.entry(&format_args!("UP"));
        }
        if self.contains(Directions::LEFT) {
            set.entry(&format_args!("LEFT"));
        }
        set.finish()
    }
}

/// Arrow glyphs, in the order DIAG, UP, LEFT.
impl fmt::Display for Directions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Directions::DIAG) {
            f.write_str("↖")?;
        }
        if self.contains(Directions::UP) {
            f.write_str("↑")?;
        }
        if self.contains(Directions::LEFT) {
            f.write_str("←")?;
        }
        Ok(())
    }
}

/// Optimal prefix-alignment scores, `rows × columns`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrix {
    shape: Shape,
    cells: Vec<i32>,
}

impl ScoreMatrix {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> i32 {
        self.cells[self.shape.index(y, x)]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, value: i32) {
        let i = self.shape.index(y, x);
        self.cells[i] = value;
    }

    pub fn row(&self, y: usize) -> &[i32] {
        let start = self.shape.index(y, 0);
        &self.cells[start..start + self.shape.columns]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    /// Score of the full global alignment, at `(rows-1, columns-1)`.
    pub fn final_score(&self) -> i32 {
        self.get(self.shape.rows - 1, self.shape.columns - 1)
    }

    /// Copy out as nested rows; handy for comparisons in tests and output.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..self.shape.rows).map(|y| self.row(y).to_vec()).collect()
    }
}

/// Optimal-move sets, `rows × columns`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionMatrix {
    shape: Shape,
    cells: Vec<Directions>,
}

impl DirectionMatrix {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> Directions {
        self.cells[self.shape.index(y, x)]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, value: Directions) {
        let i = self.shape.index(y, x);
        self.cells[i] = value;
    }

    pub fn row(&self, y: usize) -> &[Directions] {
        let start = self.shape.index(y, 0);
        &self.cells[start..start + self.shape.columns]
    }

    pub fn as_slice(&self) -> &[Directions] {
        &self.cells
    }

    /// Number of interior cells holding more than one optimal move.
    pub fn tie_count(&self) -> usize {
        self.cells.iter().filter(|d| d.count() > 1).count()
    }
}

/// Allocate both matrices and fill the gap-only border.
///
/// Interior cells are left at `0` / empty. Row 0 gets `x * gap_penalty` and
/// `{LEFT}`, column 0 gets `y * gap_penalty` and `{UP}`, `(0,0)` is `0` and
/// the empty set.
///
/// ## Errors
/// [`NeedleError::Computation`] if a border score does not fit in `i32`.
pub fn init_matrices(shape: Shape, params: &NeedleParams) -> Result<(ScoreMatrix, DirectionMatrix), NeedleError> {
    let mut scores = ScoreMatrix { shape, cells: vec![0; shape.len()] };
    let mut dirs = DirectionMatrix { shape, cells: vec![Directions::NONE; shape.len()] };

    let gap_run = |n: usize| -> Result<i32, NeedleError> {
        i32::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(params.gap_penalty))
            .ok_or_else(|| NeedleError::Computation(format!("border score overflow at offset {n}")))
    };

    for x in 1..shape.columns {
        scores.set(0, x, gap_run(x)?);
        dirs.set(0, x, Directions::LEFT);
    }
    for y in 1..shape.rows {
        scores.set(y, 0, gap_run(y)?);
        dirs.set(y, 0, Directions::UP);
    }
    Ok((scores, dirs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: NeedleParams = NeedleParams { match_score: 1, mismatch: -1, gap_penalty: -1 };
    const L: Directions = Directions::LEFT;
    const U: Directions = Directions::UP;
    const E: Directions = Directions::NONE;

    #[test]
    fn rectangular_border() {
        let (s, d) = init_matrices(Shape::new(3, 4), &P).unwrap();
        assert_eq!(s.to_rows(), vec![vec![0, -1, -2, -3], vec![-1, 0, 0, 0], vec![-2, 0, 0, 0]]);
        assert_eq!(d.row(0), &[E, L, L, L]);
        assert_eq!(d.row(1), &[U, E, E, E]);
        assert_eq!(d.row(2), &[U, E, E, E]);
    }

    #[test]
    fn square_border() {
        let (s, _) = init_matrices(Shape::new(3, 3), &P).unwrap();
        assert_eq!(s.to_rows(), vec![vec![0, -1, -2], vec![-1, 0, 0], vec![-2, 0, 0]]);
    }

    #[test]
    fn single_cell() {
        let (s, d) = init_matrices(Shape::new(1, 1), &P).unwrap();
        assert_eq!(s.to_rows(), vec![vec![0]]);
        assert!(d.get(0, 0).is_empty());
    }

    #[test]
    fn single_column_and_single_row() {
        let (s, d) = init_matrices(Shape::new(4, 1), &P).unwrap();
        assert_eq!(s.as_slice(), &[0, -1, -2, -3]);
        assert_eq!(d.as_slice(), &[E, U, U, U]);

        let (s, d) = init_matrices(Shape::new(1, 4), &P).unwrap();
        assert_eq!(s.as_slice(), &[0, -1, -2, -3]);
        assert_eq!(d.as_slice(), &[E, L, L, L]);
    }

    #[test]
    fn border_scales_with_gap_penalty() {
        let p = NeedleParams { gap_penalty: -3, ..P };
        let (s, _) = init_matrices(Shape::new(3, 2), &p).unwrap();
        assert_eq!(s.get(0, 1), -3);
        assert_eq!(s.get(2, 0), -6);
    }

    #[test]
    fn border_overflow_is_reported() {
        let p = NeedleParams { gap_penalty: i32::MIN, ..P };
        assert!(matches!(init_matrices(Shape::new(3, 1), &p), Err(NeedleError::Computation(_))));
    }

    #[test]
    fn direction_set_ops() {
        let mut d = Directions::DIAG;
        d.insert(Directions::UP);
        assert!(d.contains(Directions::DIAG) && d.contains(Directions::UP));
        assert!(!d.contains(Directions::LEFT));
        assert!(!d.contains(Directions::NONE));
        assert_eq!(d.count(), 2);
        assert_eq!(d.to_string(), "↖↑");
        assert_eq!(format!("{:?}", d), "{DIAG, UP}");
        assert_eq!(Directions::DIAG | Directions::LEFT, Directions(0b101));
    }
}
