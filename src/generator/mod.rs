pub mod writer;

pub use writer::ReadWriter;

use crate::genome::Genome;
use crate::model::{error_seq, LengthDistribution, QualityModel};
use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Draws are redrawn while they land on ambiguous bases or lengths the
/// genome cannot accommodate; this caps the retries so a degenerate
/// genome fails loudly instead of spinning.
const MAX_DRAW_ATTEMPTS: usize = 1000;

/// One simulated read. Both the verbatim genome window and the
/// error-injected sequence are carried; the writer picks which one to
/// emit.
pub struct ReadRecord {
    pub accession: String,
    pub index: u64,
    pub plain: Vec<u8>,
    pub errored: Vec<u8>,
    pub quality: Vec<u8>,
}

/// Samples reads against the loaded length and quality distributions.
pub struct ReadGenerator {
    lengths: LengthDistribution,
    qualities: QualityModel,
    rng: Xoshiro256StarStar,
}

impl ReadGenerator {
    /// Fails fast when the quality table is too shallow for the longest
    /// observed length, which would otherwise surface as a per-read
    /// error deep into a run.
    pub fn new(
        lengths: LengthDistribution,
        qualities: QualityModel,
        seed: Option<u64>,
    ) -> Result<Self> {
        if lengths.max_length() > qualities.positions() {
            bail!(
                "Longest observed read length ({}) exceeds the quality table ({} positions)",
                lengths.max_length(),
                qualities.positions()
            );
        }
        let rng = match seed {
            Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            None => Xoshiro256StarStar::from_entropy(),
        };
        Ok(Self {
            lengths,
            qualities,
            rng,
        })
    }

    /// Simulate a single read from `genome`.
    pub fn generate(&mut self, accession: &str, index: u64, genome: &Genome) -> Result<ReadRecord> {
        let plain = self.sample_window(genome)?;
        let quality = self.qualities.sample_line(plain.len(), &mut self.rng)?;
        let errored = error_seq(&plain, &quality, &self.qualities, &mut self.rng);
        Ok(ReadRecord {
            accession: accession.to_string(),
            index,
            plain,
            errored,
            quality,
        })
    }

    /// Draw a window of a sampled length containing only unambiguous
    /// bases. A fresh length is drawn on every attempt so a genome
    /// shorter than some of the support still terminates.
    fn sample_window(&mut self, genome: &Genome) -> Result<Vec<u8>> {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let length = self.lengths.sample(&mut self.rng);
            if length > genome.len() {
                continue;
            }
            let start = self.rng.gen_range(0..=genome.len() - length);
            match genome.window(start, length) {
                Some(window) if is_unambiguous(window) => return Ok(window.to_vec()),
                _ => continue,
            }
        }
        bail!(
            "No unambiguous window of a sampled length found in {} bases after {} attempts",
            genome.len(),
            MAX_DRAW_ATTEMPTS
        )
    }
}

fn is_unambiguous(window: &[u8]) -> bool {
    window
        .iter()
        .all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}
