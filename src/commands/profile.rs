use crate::model::DistributionProfile;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

pub fn run(
    reads_file: PathBuf,
    lengths_out: PathBuf,
    qualities_out: PathBuf,
    max_positions: usize,
) -> Result<()> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    progress.set_message(format!("Profiling {}", reads_file.display()));
    progress.enable_steady_tick(Duration::from_millis(100));

    let profile = DistributionProfile::from_fastq(&reads_file, max_positions)?;
    progress.finish_with_message(format!(
        "Profiled {} read(s), longest {} bases",
        profile.observed(),
        profile.max_observed_length()
    ));

    if profile.skipped() > 0 {
        warn!(
            "Skipped {} read(s) the model cannot represent (empty, longer than {} bases, or with quality symbols outside the alphabet)",
            profile.skipped(),
            max_positions
        );
    }
    if profile.observed() == 0 {
        bail!("No usable reads in {}", reads_file.display());
    }

    let lengths_file = File::create(&lengths_out)
        .with_context(|| format!("Failed to create {}", lengths_out.display()))?;
    let mut lengths_writer = BufWriter::new(lengths_file);
    profile.write_lengths(&mut lengths_writer)?;
    lengths_writer.flush().context("Failed to flush lengths file")?;

    let qualities_file = File::create(&qualities_out)
        .with_context(|| format!("Failed to create {}", qualities_out.display()))?;
    let mut qualities_writer = BufWriter::new(qualities_file);
    profile.write_qualities(&mut qualities_writer)?;
    qualities_writer
        .flush()
        .context("Failed to flush qualities file")?;

    info!(
        "Wrote {} and {}",
        lengths_out.display(),
        qualities_out.display()
    );
    Ok(())
}
