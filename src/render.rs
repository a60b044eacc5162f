//! Plain-text rendering of matrices and alignments.
//!
//! ```text
//! ┌───┬───┐
//! │   │   │
//! │   │←  │
//! ├───┼───┤
//! ```
use std::io;

use crate::matrix::{DirectionMatrix, Directions, ScoreMatrix};
use crate::traceback::{AlignmentPair, GAP};

const TOP: [char; 3] = ['┌', '┬', '┐'];
const MIDDLE: [char; 3] = ['├', '┼', '┤'];
const BOTTOM: [char; 3] = ['└', '┴', '┘'];
const WALL: &str = "───";

/// Column marker: `|` identical, ` ` gap on either side, `·` mismatch.
pub fn match_line(pair: &AlignmentPair) -> String {
    pair.first
        .bytes()
        .zip(pair.second.bytes())
        .map(|(a, b)| {
            if a == GAP || b == GAP {
                ' '
            } else if a == b {
                '|'
            } else {
                '·'
            }
        })
        .collect()
}

/// Score matrix as a right-aligned table, seq1 across and seq2 down.
pub fn format_score_matrix(scores: &ScoreMatrix, seq1: &[u8], seq2: &[u8]) -> String {
    let width = scores.as_slice().iter().map(|v| v.to_string().len()).max().unwrap_or(1);
    let mut out = String::new();
    out.push(' ');
    for label in std::iter::once(GAP).chain(seq1.iter().copied()) {
        out.push_str(&format!(" {:>width$}", label as char));
    }
    out.push('\n');
    for (y, label) in std::iter::once(GAP).chain(seq2.iter().copied()).enumerate() {
        out.push(label as char);
        for v in scores.row(y) {
            out.push_str(&format!(" {:>width$}", v));
        }
        out.push('\n');
    }
    out
}

fn separator(corners: [char; 3], columns: usize) -> String {
    let mut s = String::new();
    s.push(corners[0]);
    for x in 0..columns {
        s.push_str(WALL);
        s.push(if x + 1 == columns { corners[2] } else { corners[1] });
    }
    s
}

/// Direction matrix as a box-drawn grid; each cell spans two text lines.
///
/// First line shows `↖` (DIAG) and `↑` (UP), second line `←` (LEFT).
pub fn format_direction_matrix(dirs: &DirectionMatrix) -> String {
    let shape = dirs.shape();
    let mut out = String::new();
    out.push_str(&separator(TOP, shape.columns));
    out.push('\n');
    for y in 0..shape.rows {
        if y > 0 {
            out.push_str(&separator(MIDDLE, shape.columns));
            out.push('\n');
        }
        let mut upper = String::from("│");
        let mut lower = String::from("│");
        for &d in dirs.row(y) {
            upper.push_str(if d.contains(Directions::DIAG) { "↖ " } else { "  " });
            upper.push_str(if d.contains(Directions::UP) { "↑" } else { " " });
            upper.push('│');
            lower.push_str(if d.contains(Directions::LEFT) { "←  " } else { "   " });
            lower.push('│');
        }
        out.push_str(&upper);
        out.push('\n');
        out.push_str(&lower);
        out.push('\n');
    }
    out.push_str(&separator(BOTTOM, shape.columns));
    out.push('\n');
    out
}

/// Each pair as three lines (seq1 row, match line, seq2 row) and a blank line.
pub fn format_alignments(pairs: &[AlignmentPair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&format!("{}\n{}\n{}\n\n", pair.first, match_line(pair), pair.second));
    }
    out
}

/// What [`write_report`] includes besides alignments and score.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportOptions {
    /// Print the score and direction matrices.
    pub matrices: bool,
    /// Print identity/gaps/CIGAR under each alignment.
    pub summary: bool,
}

/// Full human-readable report for one run.
pub fn write_report<W: io::Write>(
    w: &mut W,
    run: &crate::NeedleRun,
    opts: ReportOptions,
) -> io::Result<()> {
    writeln!(w, "First sequence: {}", run.seq1)?;
    writeln!(w, "Second sequence: {}", run.seq2)?;
    if opts.matrices {
        write!(w, "{}", format_score_matrix(&run.scores, run.seq1.as_bytes(), run.seq2.as_bytes()))?;
        write!(w, "{}", format_direction_matrix(&run.directions))?;
    }
    for pair in &run.alignments {
        writeln!(w, "{}", pair.first)?;
        writeln!(w, "{}", match_line(pair))?;
        writeln!(w, "{}", pair.second)?;
        if opts.summary {
            writeln!(
                w,
                "Identity: {:.2}%   Gaps: {:.2}%   CIGAR: {}",
                pair.pct_identity(),
                pair.pct_gaps(),
                pair.cigar()
            )?;
        }
        writeln!(w)?;
    }
    if run.truncated {
        writeln!(w, "(showing {} of {} optimal alignments)", run.alignments.len(), run.path_count)?;
    }
    writeln!(w, "Alignment score: {}", run.score)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{NeedleParams, Shape};
    use crate::matrix::init_matrices;

    const P: NeedleParams = NeedleParams { match_score: 1, mismatch: -1, gap_penalty: -1 };

    #[test]
    fn match_line_marks() {
        assert_eq!(match_line(&AlignmentPair::new("AC-T", "AGTT")), "|· |");
        assert_eq!(match_line(&AlignmentPair::new("ACTA", "---A")), "   |");
    }

    #[test]
    fn direction_grid_border_only() {
        let (_, d) = init_matrices(Shape::new(2, 2), &P).unwrap();
        let expected = "\
┌───┬───┐
│   │   │
│   │←  │
├───┼───┤
│  ↑│   │
│   │   │
└───┴───┘
";
        assert_eq!(format_direction_matrix(&d), expected);
    }

    #[test]
    fn direction_cell_with_all_moves() {
        let (_, mut d) = init_matrices(Shape::new(1, 1), &P).unwrap();
        d.set(0, 0, Directions::DIAG | Directions::UP | Directions::LEFT);
        assert_eq!(format_direction_matrix(&d), "┌───┐\n│↖ ↑│\n│←  │\n└───┘\n");
    }

    #[test]
    fn score_table_layout() {
        let (s, _) = init_matrices(Shape::new(2, 3), &P).unwrap();
        assert_eq!(format_score_matrix(&s, b"AC", b"T"), "   -  A  C\n-  0 -1 -2\nT -1  0  0\n");
    }

    #[test]
    fn alignment_blocks() {
        let pairs = vec![AlignmentPair::new("A", "A"), AlignmentPair::new("A", "T")];
        assert_eq!(format_alignments(&pairs), "A\n|\nA\n\nA\n·\nT\n\n");
    }
}
