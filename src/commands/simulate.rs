use crate::config::Config;
use crate::generator::{ReadGenerator, ReadWriter};
use crate::genome::{BlastDb, GenomeSource};
use crate::model::{LengthDistribution, QualityModel};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct SimulationStats {
    pub jobs_ok: u64,
    pub jobs_failed: u64,
    pub reads_written: u64,
}

struct Job {
    count: u64,
    accession: String,
}

pub fn run(
    lengths_file: PathBuf,
    qualities_file: PathBuf,
    database: Option<String>,
    database_dir: Option<PathBuf>,
    seed: Option<u64>,
    error_free: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load();
    let database = database.unwrap_or(config.database);
    let database_dir = database_dir.or(config.database_dir);

    let lengths = LengthDistribution::from_path(&lengths_file)?;
    let qualities = QualityModel::from_path(&qualities_file)?;
    info!(
        "Loaded lengths up to {} over {} quality position(s)",
        lengths.max_length(),
        qualities.positions()
    );
    let mut generator = ReadGenerator::new(lengths, qualities, seed)?;

    let source = BlastDb::new(config.blastdbcmd, database, database_dir);
    source.check()?;

    let stdin = io::stdin();
    let stats = match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            run_jobs(
                stdin.lock(),
                BufWriter::new(file),
                &source,
                &mut generator,
                error_free,
            )?
        }
        None => run_jobs(
            stdin.lock(),
            BufWriter::new(io::stdout().lock()),
            &source,
            &mut generator,
            error_free,
        )?,
    };
    info!(
        "{} job(s) succeeded, {} failed, {} read(s) written",
        stats.jobs_ok, stats.jobs_failed, stats.reads_written
    );
    Ok(())
}

/// The job loop, generic over its streams and genome source. Jobs are
/// isolated: a failing job is logged and skipped, the run continues.
pub fn run_jobs<R: BufRead, W: Write, S: GenomeSource>(
    reader: R,
    writer: W,
    source: &S,
    generator: &mut ReadGenerator,
    error_free: bool,
) -> Result<SimulationStats> {
    let mut writer = ReadWriter::new(writer, error_free);
    let mut stats = SimulationStats::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read job line")?;
        let job = match parse_job(&line) {
            Ok(Some(job)) => job,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping job line {}: {:#}", idx + 1, e);
                stats.jobs_failed += 1;
                continue;
            }
        };
        // A job for zero reads is complete by definition; don't touch
        // the database for it.
        if job.count == 0 {
            debug!("Job for {} requests no reads, skipping fetch", job.accession);
            stats.jobs_ok += 1;
            continue;
        }
        match simulate_job(&job, source, generator, &mut writer) {
            Ok(written) => {
                stats.jobs_ok += 1;
                stats.reads_written += written;
            }
            Err(e) => {
                warn!("Skipping job for {}: {:#}", job.accession, e);
                stats.jobs_failed += 1;
            }
        }
    }
    writer.finish()?;
    Ok(stats)
}

fn simulate_job<S: GenomeSource, W: Write>(
    job: &Job,
    source: &S,
    generator: &mut ReadGenerator,
    writer: &mut ReadWriter<W>,
) -> Result<u64> {
    let genome = source.fetch(&job.accession)?;
    debug!("Fetched {} ({} bases)", job.accession, genome.len());

    let progress = ProgressBar::new(job.count);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    progress.set_message(job.accession.clone());

    let mut written = 0;
    for index in 0..job.count {
        let record = generator
            .generate(&job.accession, index, &genome)
            .with_context(|| format!("Gave up after {} of {} read(s)", written, job.count))?;
        writer.write_record(&record)?;
        written += 1;
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(written)
}

fn parse_job(line: &str) -> Result<Option<Job>> {
    let mut fields = line.split_whitespace();
    let (count, accession) = match (fields.next(), fields.next(), fields.next()) {
        (None, ..) => return Ok(None),
        (Some(count), Some(accession), None) => (count, accession),
        _ => bail!("Expected 'count accession', got {:?}", line),
    };
    let count = count
        .parse()
        .with_context(|| format!("Invalid read count {:?}", count))?;
    Ok(Some(Job {
        count,
        accession: accession.to_string(),
    }))
}
