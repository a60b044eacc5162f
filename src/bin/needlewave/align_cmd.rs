use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Args;
use needlewave::*;

/// Options for the `align` subcommand.
#[derive(Debug, Args)]
pub struct AlignCmd {
    /// First sequence (laid out across the matrix columns).
    #[arg(long, value_name="SEQ", required_unless_present="asequence", conflicts_with="asequence")]
    pub seq1: Option<String>,
    /// Second sequence (laid out down the matrix rows).
    #[arg(long, value_name="SEQ", required_unless_present="bsequence", conflicts_with="bsequence")]
    pub seq2: Option<String>,
    /// FASTA file for the first sequence (first record used).
    #[arg(long, value_name="FILE")]
    pub asequence: Option<PathBuf>,
    /// FASTA file for the second sequence (first record used).
    #[arg(long, value_name="FILE")]
    pub bsequence: Option<PathBuf>,
    /// Score added per gap column (usually negative).
    #[arg(short='g', long="gap-penalty", visible_alias="gapPenalty", allow_negative_numbers=true)]
    pub gap_penalty: i32,
    /// Score for a matching pair.
    #[arg(short='m', long="match", allow_negative_numbers=true)]
    pub match_score: i32,
    /// Score for a mismatching pair (usually negative).
    #[arg(short='x', long="mismatch", visible_alias="misMatch", allow_negative_numbers=true)]
    pub mismatch: i32,
    /// Worker threads for the matrix fill (0 = one per core).
    #[arg(long, default_value_t=0)]
    pub threads: usize,
    /// Fill the matrices on a single worker.
    #[arg(long, default_value_t=false, conflicts_with="threads")]
    pub sequential: bool,
    /// Report at most this many optimal alignments.
    #[arg(long, value_name="N")]
    pub max_alignments: Option<usize>,
    /// Do not print the score and direction matrices.
    #[arg(long, default_value_t=false)]
    pub no_matrices: bool,
    /// Print identity, gaps and CIGAR under each alignment.
    #[arg(long, default_value_t=false)]
    pub summary: bool,
    /// Write the report here instead of stdout.
    #[arg(long, value_name="FILE")]
    pub outfile: Option<PathBuf>,
}

fn read_first(path: &Path) -> Result<String> {
    let mut s = String::new();
    File::open(path).with_context(|| format!("open FASTA: {}", path.display()))?.read_to_string(&mut s)?;
    let rec = parse_fasta(&s).into_iter().next().ok_or_else(|| anyhow::anyhow!("no FASTA records in {}", path.display()))?;
    log::debug!("read '{}' ({} symbols) from {}", rec.id, rec.seq.len(), path.display());
    Ok(rec.seq)
}

fn source(literal: Option<String>, file: Option<&PathBuf>) -> Result<String> {
    match (literal, file) {
        (Some(s), _) => Ok(s),
        (None, Some(p)) => read_first(p),
        (None, None) => Err(anyhow::anyhow!("no sequence given")),
    }
}

pub fn run(cmd: AlignCmd) -> Result<()> {
    let raw1 = source(cmd.seq1, cmd.asequence.as_ref())?;
    let raw2 = source(cmd.seq2, cmd.bsequence.as_ref())?;

    // validation errors stop the run before any matrix is built
    let seq1 = check_sequence(&raw1, FIRST_LABEL)?;
    let seq2 = check_sequence(&raw2, SECOND_LABEL)?;

    let params = NeedleParams { match_score: cmd.match_score, mismatch: cmd.mismatch, gap_penalty: cmd.gap_penalty };
    let strategy = if cmd.sequential { FillStrategy::Sequential } else { FillStrategy::parallel(cmd.threads) };
    let opts = AlignOptions { strategy, max_alignments: cmd.max_alignments };

    let run = align(&seq1, &seq2, &params, &opts)?;

    let mut out: Box<dyn Write> = match &cmd.outfile {
        Some(p) => Box::new(BufWriter::new(File::create(p).with_context(|| format!("create {}", p.display()))?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_report(&mut out, &run, ReportOptions { matrices: !cmd.no_matrices, summary: cmd.summary })?;
    out.flush()?;
    Ok(())
}
