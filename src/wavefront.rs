//! Anti-diagonal (wavefront) fill of the DP matrices.
//!
//! Every interior cell `(y, x)` depends only on `(y-1, x)`, `(y, x-1)` and
//! `(y-1, x-1)`, all of which sit on anti-diagonal `x + y - 1` or earlier.
//! Cells sharing `x + y` are therefore independent: each wave is scored
//! concurrently against a read-only view of the matrices, then written back
//! before the next wave starts.
use std::panic::{self, AssertUnwindSafe};

use log::{debug, trace};
use rayon::prelude::*;

use crate::common::{NeedleError, NeedleParams, Shape};
use crate::matrix::{DirectionMatrix, Directions, ScoreMatrix};

/// One anti-diagonal, as `(x, y)` coordinates.
pub type Wave = Vec<(usize, usize)>;

/// Default minimum task size, in cells, for [`FillStrategy::Parallel`].
pub const MIN_CELLS_PER_TASK: usize = 64;

/// Interior waves in dependency order.
///
/// Wave `k` holds every `(x, y)` with `x + y = k + 2`, `1 <= x < columns`
/// and `1 <= y < rows`, walked from the top-right end (largest `x` first).
/// Shapes without interior cells yield no waves.
pub fn anti_diagonals(shape: Shape) -> Vec<Wave> {
    if shape.rows < 2 || shape.columns < 2 {
        return Vec::new();
    }
    (2..=shape.rows + shape.columns - 2)
        .map(|d| diagonal(shape, d, 1))
        .collect()
}

/// All anti-diagonals including the border row and column: `rows + columns - 1`
/// waves, the first one being `[(0, 0)]`.
pub fn all_anti_diagonals(shape: Shape) -> Vec<Wave> {
    if shape.is_empty() {
        return Vec::new();
    }
    (0..=shape.rows + shape.columns - 2)
        .map(|d| diagonal(shape, d, 0))
        .collect()
}

fn diagonal(shape: Shape, d: usize, min: usize) -> Wave {
    let x_hi = d.saturating_sub(min).min(shape.columns - 1);
    let x_lo = d.saturating_sub(shape.rows - 1).max(min);
    (x_lo..=x_hi).rev().map(|x| (x, d - x)).collect()
}

/// Score and optimal-move set of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellScore {
    pub score: i32,
    pub directions: Directions,
}

/// Read-only inputs of the recurrence, shared by every worker.
#[derive(Clone, Copy, Debug)]
pub struct CellScorer<'a> {
    seq1: &'a [u8],
    seq2: &'a [u8],
    params: &'a NeedleParams,
}

impl<'a> CellScorer<'a> {
    pub fn new(seq1: &'a [u8], seq2: &'a [u8], params: &'a NeedleParams) -> Self {
        Self { seq1, seq2, params }
    }

    /// Score interior cell `(y, x)` from its three finished neighbours.
    ///
    /// Every move reaching the maximum is kept in the direction set. Border
    /// cells (`y == 0` or `x == 0`) must not be passed in.
    ///
    /// ## Errors
    /// [`NeedleError::Computation`] if a candidate score overflows `i32`.
    pub fn score_cell(&self, scores: &ScoreMatrix, y: usize, x: usize) -> Result<CellScore, NeedleError> {
        debug_assert!(y >= 1 && x >= 1, "border cell ({y}, {x}) scheduled");
        let overflow = || NeedleError::Computation(format!("score overflow at cell ({y}, {x})"));

        let up = scores.get(y - 1, x).checked_add(self.params.gap_penalty).ok_or_else(overflow)?;
        let left = scores.get(y, x - 1).checked_add(self.params.gap_penalty).ok_or_else(overflow)?;
        let diag = scores
            .get(y - 1, x - 1)
            .checked_add(self.params.pair_score(self.seq1[x - 1], self.seq2[y - 1]))
            .ok_or_else(overflow)?;

        let score = up.max(left).max(diag);
        let mut directions = Directions::NONE;
        if diag == score {
            directions.insert(Directions::DIAG);
        }
        if up == score {
            directions.insert(Directions::UP);
        }
        if left == score {
            directions.insert(Directions::LEFT);
        }
        Ok(CellScore { score, directions })
    }
}

/// How the waves are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillStrategy {
    /// One worker, cells in plan order.
    Sequential,
    /// A dedicated rayon pool; `threads == 0` lets rayon pick. A wave is
    /// never split into tasks smaller than `min_cells_per_task` cells.
    Parallel { threads: usize, min_cells_per_task: usize },
}

impl FillStrategy {
    /// Parallel fill on `threads` workers with the default task size.
    pub fn parallel(threads: usize) -> Self {
        FillStrategy::Parallel { threads, min_cells_per_task: MIN_CELLS_PER_TASK }
    }
}

impl Default for FillStrategy {
    fn default() -> Self {
        FillStrategy::parallel(0)
    }
}

/// Run every wave of `waves` in order, writing scores and direction sets.
///
/// Both matrices must come from [`crate::init_matrices`] for the same shape.
/// On error nothing is returned as valid: the caller must drop the
/// partially-filled matrices.
pub fn fill_matrices(
    waves: &[Wave],
    scorer: &CellScorer<'_>,
    scores: &mut ScoreMatrix,
    dirs: &mut DirectionMatrix,
    strategy: FillStrategy,
) -> Result<(), NeedleError> {
    debug_assert_eq!(scores.shape(), dirs.shape());
    let cells: usize = waves.iter().map(Vec::len).sum();
    match strategy {
        FillStrategy::Sequential => {
            debug!("filling {} waves ({} cells) sequentially", waves.len(), cells);
            for wave in waves {
                for &(x, y) in wave {
                    let cell = scorer.score_cell(scores, y, x)?;
                    scores.set(y, x, cell.score);
                    dirs.set(y, x, cell.directions);
                }
            }
            Ok(())
        }
        FillStrategy::Parallel { threads, min_cells_per_task } => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("needlewave-fill-{i}"))
                .build()
                .map_err(|e| NeedleError::Computation(format!("cannot start worker pool: {e}")))?;
            let min_len = min_cells_per_task.max(1);
            debug!(
                "filling {} waves ({} cells) on {} workers, {} cells per task minimum",
                waves.len(),
                cells,
                pool.current_num_threads(),
                min_len
            );
            let run = panic::catch_unwind(AssertUnwindSafe(|| {
                pool.install(|| fill_waves_parallel(waves, scorer, scores, dirs, min_len))
            }));
            match run {
                Ok(result) => result,
                Err(payload) => Err(NeedleError::Computation(panic_message(payload.as_ref()))),
            }
        }
    }
}

fn fill_waves_parallel(
    waves: &[Wave],
    scorer: &CellScorer<'_>,
    scores: &mut ScoreMatrix,
    dirs: &mut DirectionMatrix,
    min_len: usize,
) -> Result<(), NeedleError> {
    for (k, wave) in waves.iter().enumerate() {
        // join point: all of wave k is computed before any of it is written
        let computed: Vec<CellScore> = {
            let view: &ScoreMatrix = scores;
            wave.par_iter()
                .with_min_len(min_len)
                .map(|&(x, y)| scorer.score_cell(view, y, x))
                .collect::<Result<_, _>>()?
        };
        for (&(x, y), cell) in wave.iter().zip(computed) {
            scores.set(y, x, cell.score);
            dirs.set(y, x, cell.directions);
        }
        trace!("wave {} done ({} cells)", k, wave.len());
    }
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}
