//! # needlewave
//!
//! Needleman–Wunsch global alignment of two nucleotide sequences, with a
//! wavefront-parallel matrix fill and an exhaustive traceback that returns
//! **every** optimal alignment, not just one.
//!
//! ## Model
//! Linear gap costs: a fixed `match_score`, `mismatch` and `gap_penalty`
//! (all explicit, see [`NeedleParams`]). For seq1 of length *n* and seq2 of
//! length *m* the score matrix has `m + 1` rows and `n + 1` columns:
//!
//! ```text
//! S[y][x] = max( S[y-1][x]   + gap,
//!                S[y][x-1]   + gap,
//!                S[y-1][x-1] + (match if seq1[x-1] == seq2[y-1] else mismatch) )
//! ```
//!
//! Each cell also records the set of moves reaching the maximum, so tied
//! sub-alignments survive into the traceback.
//!
//! ## Pipeline
//! 1. [`check_sequence`] trims, validates and uppercases the raw inputs.
//! 2. [`init_matrices`] fills the gap-only border.
//! 3. [`anti_diagonals`] plans the interior as waves of constant `x + y`.
//! 4. [`fill_matrices`] scores each wave concurrently, one wave at a time.
//! 5. [`traceback`] walks all tied paths back from the bottom-right cell.
//!
//! ### Example
//! ```
//! use needlewave::{align_raw, AlignOptions, NeedleParams};
//! let params = NeedleParams { match_score: 1, mismatch: -1, gap_penalty: -1 };
//! let run = align_raw("ACTA", "a", &params, &AlignOptions::default()).unwrap();
//! assert_eq!(run.score, -2);
//! assert_eq!(run.alignments.len(), 2);
//! assert_eq!(run.alignments[0].first, "ACTA");
//! assert_eq!(run.alignments[0].second, "A---");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod common;
pub mod matrix;
pub mod render;
pub mod sequence;
pub mod traceback;
pub mod wavefront;

use log::{debug, info};

pub use common::{NeedleError, NeedleParams, Shape};
pub use matrix::{init_matrices, DirectionMatrix, Directions, ScoreMatrix};
pub use render::{
    format_alignments, format_direction_matrix, format_score_matrix, match_line, write_report,
    ReportOptions,
};
pub use sequence::{check_sequence, parse_fasta, FastaRecord, Nucleotides};
pub use traceback::{count_optimal_paths, traceback, traceback_limited, AlignmentPair};
pub use wavefront::{
    all_anti_diagonals, anti_diagonals, fill_matrices, CellScore, CellScorer, FillStrategy, Wave,
    MIN_CELLS_PER_TASK,
};

/// Label used for seq1 in validation errors.
pub const FIRST_LABEL: &str = "first sequence";
/// Label used for seq2 in validation errors.
pub const SECOND_LABEL: &str = "second sequence";

/// Knobs for one run that do not affect the result set.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlignOptions {
    /// How the waves are evaluated.
    pub strategy: FillStrategy,
    /// Stop the traceback after this many alignments (`None` = all).
    pub max_alignments: Option<usize>,
}

/// Everything one alignment run produces.
#[derive(Clone, Debug)]
pub struct NeedleRun {
    pub seq1: Nucleotides,
    pub seq2: Nucleotides,
    pub params: NeedleParams,
    /// Optimal global score, `scores[rows-1][columns-1]`.
    pub score: i32,
    pub scores: ScoreMatrix,
    pub directions: DirectionMatrix,
    /// Optimal alignments in traceback order.
    pub alignments: Vec<AlignmentPair>,
    /// Number of optimal alignments in total (saturating).
    pub path_count: u128,
    /// `true` if `alignments` was cut short by `max_alignments`.
    pub truncated: bool,
}

/// Initialise and fill both matrices for `seq1` (columns) against `seq2` (rows).
///
/// ## Errors
/// - [`NeedleError::InvalidSequence`] if either sequence is empty.
/// - [`NeedleError::Computation`] if the fill fails; no matrices are returned.
pub fn compute_matrices(
    seq1: &[u8],
    seq2: &[u8],
    params: &NeedleParams,
    strategy: FillStrategy,
) -> Result<(ScoreMatrix, DirectionMatrix), NeedleError> {
    if seq1.is_empty() || seq2.is_empty() {
        return Err(NeedleError::InvalidSequence("empty sequence"));
    }
    let shape = Shape::for_sequences(seq1, seq2);
    let (mut scores, mut dirs) = init_matrices(shape, params)?;
    let waves = anti_diagonals(shape);
    let scorer = CellScorer::new(seq1, seq2, params);
    fill_matrices(&waves, &scorer, &mut scores, &mut dirs, strategy)?;
    Ok((scores, dirs))
}

/// Align two validated sequences and collect every optimal alignment.
pub fn align(
    seq1: &Nucleotides,
    seq2: &Nucleotides,
    params: &NeedleParams,
    opts: &AlignOptions,
) -> Result<NeedleRun, NeedleError> {
    let (scores, directions) = compute_matrices(seq1.as_bytes(), seq2.as_bytes(), params, opts.strategy)?;
    let score = scores.final_score();
    debug!("{} cells hold tied moves", directions.tie_count());
    let path_count = count_optimal_paths(&directions);
    let alignments = traceback_limited(&directions, seq1.as_bytes(), seq2.as_bytes(), opts.max_alignments);
    let truncated = (alignments.len() as u128) < path_count;
    info!(
        "aligned {}x{}: score {}, {} optimal alignment(s){}",
        seq1.len(),
        seq2.len(),
        score,
        path_count,
        if truncated { format!(", kept {}", alignments.len()) } else { String::new() }
    );
    Ok(NeedleRun {
        seq1: seq1.clone(),
        seq2: seq2.clone(),
        params: *params,
        score,
        scores,
        directions,
        alignments,
        path_count,
        truncated,
    })
}

/// Validate raw input strings, then [`align`] them.
///
/// Validation failures are returned before any matrix is allocated.
pub fn align_raw(
    seq1: &str,
    seq2: &str,
    params: &NeedleParams,
    opts: &AlignOptions,
) -> Result<NeedleRun, NeedleError> {
    let s1 = check_sequence(seq1, FIRST_LABEL)?;
    let s2 = check_sequence(seq2, SECOND_LABEL)?;
    align(&s1, &s2, params, opts)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dna(max_len: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')], 1..=max_len)
            .prop_map(|v| v.into_iter().collect())
    }

    fn params() -> impl Strategy<Value = NeedleParams> {
        (0..=5i32, -5..=0i32, -5..=0i32)
            .prop_map(|(match_score, mismatch, gap_penalty)| NeedleParams { match_score, mismatch, gap_penalty })
    }

    fn small_run(a: &str, b: &str, p: &NeedleParams, strategy: FillStrategy) -> NeedleRun {
        // cap the output; tie-heavy parameter sets can explode combinatorially
        let opts = AlignOptions { strategy, max_alignments: Some(256) };
        align_raw(a, b, p, &opts).unwrap()
    }

    proptest! {
        #[test]
        fn score_is_symmetric(a in dna(24), b in dna(24), p in params()) {
            let ab = small_run(&a, &b, &p, FillStrategy::Sequential);
            let ba = small_run(&b, &a, &p, FillStrategy::Sequential);
            prop_assert_eq!(ab.score, ba.score);
        }

        #[test]
        fn pairs_reconstruct_inputs(a in dna(16), b in dna(16), p in params()) {
            let r = small_run(&a, &b, &p, FillStrategy::default());
            prop_assert!(!r.alignments.is_empty());
            for pair in &r.alignments {
                prop_assert_eq!(pair.first.len(), pair.second.len());
                prop_assert_eq!(pair.first.replace('-', ""), a.clone());
                prop_assert_eq!(pair.second.replace('-', ""), b.clone());
                prop_assert!(pair.first.bytes().zip(pair.second.bytes()).all(|(x, y)| !(x == b'-' && y == b'-')));
                prop_assert_eq!(pair.score(&p), r.score as i64);
            }
        }

        #[test]
        fn border_is_gap_run(a in dna(20), b in dna(20), p in params()) {
            let r = small_run(&a, &b, &p, FillStrategy::default());
            let shape = r.scores.shape();
            for x in 0..shape.columns {
                prop_assert_eq!(r.scores.get(0, x), x as i32 * p.gap_penalty);
            }
            for y in 0..shape.rows {
                prop_assert_eq!(r.scores.get(y, 0), y as i32 * p.gap_penalty);
            }
        }

        #[test]
        fn parallel_fill_is_bit_identical(
            a in dna(40),
            b in dna(40),
            p in params(),
            threads in 1..=4usize,
            min_cells_per_task in 1..=4usize,
        ) {
            let seq = compute_matrices(a.as_bytes(), b.as_bytes(), &p, FillStrategy::Sequential).unwrap();
            let strategy = FillStrategy::Parallel { threads, min_cells_per_task };
            let par = compute_matrices(a.as_bytes(), b.as_bytes(), &p, strategy).unwrap();
            prop_assert_eq!(seq, par);
        }

        #[test]
        fn pipeline_is_idempotent(a in dna(16), b in dna(16), p in params()) {
            let r1 = small_run(&a, &b, &p, FillStrategy::default());
            let r2 = small_run(&a, &b, &p, FillStrategy::default());
            prop_assert_eq!(r1.score, r2.score);
            prop_assert_eq!(&r1.scores, &r2.scores);
            prop_assert_eq!(&r1.directions, &r2.directions);
            prop_assert_eq!(&r1.alignments, &r2.alignments);
        }
    }
}
