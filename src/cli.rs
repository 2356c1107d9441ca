use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate reads for the "count accession" jobs read from stdin
    Simulate {
        /// Read-length histogram ("count length" per line)
        lengths_file: PathBuf,

        /// Per-position quality histogram (one JSON object per line)
        qualities_file: PathBuf,

        /// BLAST database to fetch reference sequences from
        #[arg(long = "db")]
        database: Option<String>,

        /// Directory the database lookup runs in
        #[arg(long = "db-dir")]
        database_dir: Option<PathBuf>,

        /// Seed for reproducible simulations
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the verbatim genome window instead of the error-injected sequence
        #[arg(long)]
        error_free: bool,

        /// Write records to a file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Build the two distribution files from an observed FASTQ
    Profile {
        /// Observed reads, FASTQ (plain or gzip)
        reads_file: PathBuf,

        /// Output path for the length histogram
        #[arg(long, default_value = "lengths.txt")]
        lengths_out: PathBuf,

        /// Output path for the per-position quality histogram
        #[arg(long, default_value = "qualities.jsons")]
        qualities_out: PathBuf,

        /// Ignore reads longer than this many bases
        #[arg(long, default_value = "1000")]
        max_positions: usize,
    },
}
