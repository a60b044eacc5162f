//! Types shared by every stage of the pipeline: the error enum, the scoring
//! parameters, and the matrix [`Shape`].
//!
//! ## Scoring
//! [`NeedleParams`] holds the three integers of the linear-gap model. There
//! are no defaults: callers always state all three.
//!
//! ## Examples
//! ```rust
//! use needlewave::{NeedleParams, Shape};
//! let params = NeedleParams { match_score: 1, mismatch: -1, gap_penalty: -1 };
//! assert_eq!(params.pair_score(b'A', b'A'), 1);
//! let shape = Shape::for_sequences(b"ACTA", b"A");
//! assert_eq!((shape.rows, shape.columns), (2, 5));
//! ```

/// Errors that can be returned by the algorithms in this crate.
#[derive(thiserror::Error, Debug)]
pub enum NeedleError {
    /// Returned by the validator when a sequence is empty after trimming.
    #[error("Insertion error in the {label} (''): the sequence cannot be empty")]
    EmptySequence { label: String },
    /// Returned by the validator on the first symbol outside A, C, T, G.
    #[error("Insertion error in the {label} ('{sequence}'): invalid nucleotide '{character}'. Sequences must contain only A, C, T, or G.")]
    InvalidNucleotide { character: char, sequence: String, label: String },
    /// Returned when the core is handed input that bypassed validation.
    #[error("invalid sequence input: {0}")]
    InvalidSequence(&'static str),
    /// A wave worker failed; the fill is abandoned as a whole.
    #[error("matrix fill failed: {0}")]
    Computation(String),
}

/// Scoring parameters for one alignment run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeedleParams {
    /// Reward for a pair of identical nucleotides.
    pub match_score: i32,
    /// Score for a pair of different nucleotides (usually negative).
    pub mismatch: i32,
    /// Score added per gap column (usually negative).
    pub gap_penalty: i32,
}

impl NeedleParams {
    /// Substitution score for aligning `a` against `b`.
    #[inline]
    pub fn pair_score(&self, a: u8, b: u8) -> i32 {
        if a == b { self.match_score } else { self.mismatch }
    }
}

/// Matrix dimensions: `rows = len(seq2) + 1`, `columns = len(seq1) + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Shape of the DP matrices for `seq1` (columns) against `seq2` (rows).
    pub fn for_sequences(seq1: &[u8], seq2: &[u8]) -> Self {
        Self { rows: seq2.len() + 1, columns: seq1.len() + 1 }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major offset of cell `(y, x)`.
    #[inline]
    pub fn index(&self, y: usize, x: usize) -> usize {
        y * self.columns + x
    }
}
