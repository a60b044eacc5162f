//! Command-line interface for the `needlewave` crate.
//!
//! Subcommands live in separate files under `src/bin/needlewave/`:
//! - `align_cmd.rs`
//!
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name="needlewave", version=env!("CARGO_PKG_VERSION"), about="Needleman–Wunsch global alignment with a wavefront-parallel fill", disable_help_subcommand=true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins if set.
    #[arg(short, long, action=ArgAction::Count, global=true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Align two nucleotide sequences and print every optimal global alignment.
    Align(align_cmd::AlignCmd),
}

#[path = "needlewave/align_cmd.rs"] mod align_cmd;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match cli.command {
        Command::Align(cmd) => align_cmd::run(cmd),
    }
}
