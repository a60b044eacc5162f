//! Exhaustive traceback over the direction matrix.
//!
//! Starting at the bottom-right cell, every recorded move is followed, so
//! each tie in the direction matrix forks the walk. The walk uses an explicit
//! work stack rather than recursion. Moves are pushed in the order DIAG, LEFT,
//! UP and popped last-in first-out, which fixes the order of the output.
use log::warn;

use crate::common::NeedleParams;
use crate::matrix::{DirectionMatrix, Directions};

/// Gap symbol used in aligned strings.
pub const GAP: u8 = b'-';

/// One optimal global alignment: two equal-length rows over `ACTG-`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlignmentPair {
    /// Row for seq1 (including gaps `-`).
    pub first: String,
    /// Row for seq2 (including gaps `-`).
    pub second: String,
}

impl AlignmentPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self { first: first.into(), second: second.into() }
    }

    fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.first.bytes().zip(self.second.bytes())
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    pub fn identities(&self) -> usize {
        self.columns().filter(|&(a, b)| a == b && a != GAP).count()
    }

    pub fn mismatches(&self) -> usize {
        self.columns().filter(|&(a, b)| a != b && a != GAP && b != GAP).count()
    }

    pub fn gaps(&self) -> usize {
        self.columns().filter(|&(a, b)| a == GAP || b == GAP).count()
    }

    /// Percent identity over aligned columns (0..=100).
    pub fn pct_identity(&self) -> f64 {
        self.identities() as f64 * 100.0 / self.len().max(1) as f64
    }

    /// Percent gap columns (0..=100).
    pub fn pct_gaps(&self) -> f64 {
        self.gaps() as f64 * 100.0 / self.len().max(1) as f64
    }

    /// Run-length encoded operations: `M` aligned column, `I` gap in seq1,
    /// `D` gap in seq2 (e.g. `1M3D`).
    pub fn cigar(&self) -> String {
        let mut ops: Vec<(char, usize)> = Vec::new();
        for (a, b) in self.columns() {
            let op = if a == GAP { 'I' } else if b == GAP { 'D' } else { 'M' };
            match ops.last_mut() {
                Some(last) if last.0 == op => last.1 += 1,
                _ => ops.push((op, 1)),
            }
        }
        ops.into_iter().map(|(op, len)| format!("{len}{op}")).collect()
    }

    /// Score of this alignment under `params`, summed column by column.
    pub fn score(&self, params: &NeedleParams) -> i64 {
        self.columns()
            .map(|(a, b)| {
                if a == GAP || b == GAP {
                    params.gap_penalty as i64
                } else {
                    params.pair_score(a, b) as i64
                }
            })
            .sum()
    }
}

struct WorkItem {
    y: usize,
    x: usize,
    // aligned suffixes, stored back to front
    rev1: Vec<u8>,
    rev2: Vec<u8>,
}

/// Every optimal alignment of `seq1` (columns) against `seq2` (rows).
///
/// `dirs` must be a filled direction matrix of shape
/// `(len(seq2) + 1, len(seq1) + 1)`.
pub fn traceback(dirs: &DirectionMatrix, seq1: &[u8], seq2: &[u8]) -> Vec<AlignmentPair> {
    traceback_limited(dirs, seq1, seq2, None)
}

/// Like [`traceback`], but stops after `limit` alignments.
///
/// The result is always a prefix of the unlimited output. Returns no
/// alignments if `dirs` does not have shape `(len(seq2) + 1, len(seq1) + 1)`.
pub fn traceback_limited(
    dirs: &DirectionMatrix,
    seq1: &[u8],
    seq2: &[u8],
    limit: Option<usize>,
) -> Vec<AlignmentPair> {
    let shape = dirs.shape();
    if (shape.rows, shape.columns) != (seq2.len() + 1, seq1.len() + 1) {
        warn!(
            "direction matrix is {}x{}, sequences need {}x{}",
            shape.rows,
            shape.columns,
            seq2.len() + 1,
            seq1.len() + 1
        );
        return Vec::new();
    }
    let limit = limit.unwrap_or(usize::MAX);
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }

    let capacity = seq1.len() + seq2.len();
    let mut stack = vec![WorkItem {
        y: shape.rows - 1,
        x: shape.columns - 1,
        rev1: Vec::with_capacity(capacity),
        rev2: Vec::with_capacity(capacity),
    }];

    while let Some(WorkItem { y, x, mut rev1, mut rev2 }) = stack.pop() {
        if y == 0 || x == 0 {
            // remaining prefix of one side against a gap run on the other
            rev1.extend(seq1[..x].iter().rev());
            rev2.extend(std::iter::repeat(GAP).take(x));
            rev1.extend(std::iter::repeat(GAP).take(y));
            rev2.extend(seq2[..y].iter().rev());
            out.push(finish(rev1, rev2));
            if out.len() >= limit {
                break;
            }
            continue;
        }

        let cell = dirs.get(y, x);
        let (a, b) = (seq1[x - 1], seq2[y - 1]);
        let moves = [
            (Directions::DIAG, y - 1, x - 1, a, b),
            (Directions::LEFT, y, x - 1, a, GAP),
            (Directions::UP, y - 1, x, GAP, b),
        ];
        for (dir, ny, nx, c1, c2) in moves {
            if !cell.contains(dir) {
                continue;
            }
            let mut r1 = rev1.clone();
            let mut r2 = rev2.clone();
            r1.push(c1);
            r2.push(c2);
            stack.push(WorkItem { y: ny, x: nx, rev1: r1, rev2: r2 });
        }
    }
    out
}

fn finish(mut rev1: Vec<u8>, mut rev2: Vec<u8>) -> AlignmentPair {
    rev1.reverse();
    rev2.reverse();
    // both rows are built from ASCII nucleotides and '-'
    AlignmentPair {
        first: String::from_utf8_lossy(&rev1).into_owned(),
        second: String::from_utf8_lossy(&rev2).into_owned(),
    }
}

/// Number of distinct optimal paths from the bottom-right cell to the border,
/// saturating at `u128::MAX`.
///
/// Useful to size the output before running [`traceback`].
pub fn count_optimal_paths(dirs: &DirectionMatrix) -> u128 {
    let shape = dirs.shape();
    // paths[y][x] = number of ways to finish from (y, x)
    let mut paths = vec![0u128; shape.len()];
    for y in 0..shape.rows {
        for x in 0..shape.columns {
            let i = shape.index(y, x);
            if y == 0 || x == 0 {
                paths[i] = 1;
                continue;
            }
            let cell = dirs.get(y, x);
            let mut n = 0u128;
            if cell.contains(Directions::DIAG) {
                n = n.saturating_add(paths[shape.index(y - 1, x - 1)]);
            }
            if cell.contains(Directions::LEFT) {
                n = n.saturating_add(paths[shape.index(y, x - 1)]);
            }
            if cell.contains(Directions::UP) {
                n = n.saturating_add(paths[shape.index(y - 1, x)]);
            }
            paths[i] = n;
        }
    }
    paths[shape.index(shape.rows - 1, shape.columns - 1)]
}
