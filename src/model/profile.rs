use crate::model::quality::symbol_index;
use anyhow::{Context, Result};
use bio::io::fastq::{self, FastqRead};
use log::debug;
use niffler::get_reader;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Empirical length and per-position quality histograms accumulated from
/// observed reads, written out in the formats the distribution loaders
/// accept.
///
/// Reads that cannot contribute to a well-formed model are skipped and
/// counted: empty reads, reads longer than the position limit, and reads
/// whose quality string contains symbols outside the alphabet.
pub struct DistributionProfile {
    length_counts: BTreeMap<usize, u64>,
    position_counts: Vec<[u64; 4]>,
    max_positions: usize,
    observed: u64,
    skipped_empty: u64,
    skipped_long: u64,
    skipped_foreign: u64,
}

impl DistributionProfile {
    pub fn new(max_positions: usize) -> Self {
        Self {
            length_counts: BTreeMap::new(),
            position_counts: Vec::new(),
            max_positions,
            observed: 0,
            skipped_empty: 0,
            skipped_long: 0,
            skipped_foreign: 0,
        }
    }

    /// Profile every record of a FASTQ file, transparently decompressing
    /// gzip input.
    pub fn from_fastq(path: &Path, max_positions: usize) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open reads file {}", path.display()))?;
        let (inner_reader, _compression) =
            get_reader(Box::new(file)).context("Failed to detect reads file compression")?;
        let mut reader = fastq::Reader::new(Box::new(BufReader::with_capacity(
            16 * 1024 * 1024,
            inner_reader,
        )));

        let mut profile = Self::new(max_positions);
        let mut record = fastq::Record::new();
        loop {
            reader
                .read(&mut record)
                .with_context(|| format!("Failed to read FASTQ record in {}", path.display()))?;
            if record.id().is_empty() {
                break;
            }
            profile.observe(record.seq().len(), record.qual());
        }
        Ok(profile)
    }

    pub fn observe(&mut self, length: usize, quality: &[u8]) {
        if length == 0 {
            self.skipped_empty += 1;
            return;
        }
        if length > self.max_positions {
            self.skipped_long += 1;
            return;
        }
        let mut indices = Vec::with_capacity(quality.len());
        for &symbol in quality {
            match symbol_index(symbol) {
                Some(idx) => indices.push(idx),
                None => {
                    debug!("Skipping read with quality symbol {:?}", symbol as char);
                    self.skipped_foreign += 1;
                    return;
                }
            }
        }

        *self.length_counts.entry(length).or_insert(0) += 1;
        if self.position_counts.len() < length {
            self.position_counts.resize(length, [0; 4]);
        }
        for (position, idx) in indices.into_iter().enumerate() {
            self.position_counts[position][idx] += 1;
        }
        self.observed += 1;
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_empty + self.skipped_long + self.skipped_foreign
    }

    pub fn max_observed_length(&self) -> usize {
        self.position_counts.len()
    }

    /// Write the `count length` histogram.
    pub fn write_lengths<W: Write>(&self, mut writer: W) -> Result<()> {
        for (length, count) in &self.length_counts {
            writeln!(writer, "{} {}", count, length).context("Failed to write lengths file")?;
        }
        Ok(())
    }

    /// Write one JSON object per read position.
    pub fn write_qualities<W: Write>(&self, mut writer: W) -> Result<()> {
        for counts in &self.position_counts {
            let object = json!({
                "F": counts[0],
                ",": counts[1],
                ":": counts[2],
                "#": counts[3],
            });
            writeln!(writer, "{}", object).context("Failed to write qualities file")?;
        }
        Ok(())
    }
}
