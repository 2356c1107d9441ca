use anyhow::{bail, Context, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Empirical read-length distribution parsed from a histogram file of
/// whitespace-separated `count length` lines.
///
/// Weights are stored densely for every length from 1 to the maximum
/// observed; lengths missing from the file get weight zero and are never
/// drawn.
pub struct LengthDistribution {
    weights: Vec<u64>,
    sampler: WeightedIndex<u64>,
}

impl LengthDistribution {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open lengths file {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse lengths file {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut observed: Vec<(usize, u64)> = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (count, length) = match (fields.next(), fields.next(), fields.next()) {
                (Some(count), Some(length), None) => (count, length),
                _ => bail!("Line {}: expected 'count length', got {:?}", idx + 1, line),
            };
            let count: u64 = count
                .parse()
                .with_context(|| format!("Line {}: invalid count {:?}", idx + 1, count))?;
            let length: usize = length
                .parse()
                .with_context(|| format!("Line {}: invalid length {:?}", idx + 1, length))?;
            if length == 0 {
                bail!("Line {}: read length must be at least 1", idx + 1);
            }
            observed.push((length, count));
        }

        let max_length = match observed.iter().map(|&(length, _)| length).max() {
            Some(max) => max,
            None => bail!("No length entries found"),
        };
        let mut weights = vec![0u64; max_length];
        for (length, count) in observed {
            weights[length - 1] += count;
        }
        let sampler = WeightedIndex::new(&weights)
            .context("Length histogram has no positive weights")?;

        Ok(Self { weights, sampler })
    }

    /// One categorical draw over the observed lengths.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng) + 1
    }

    /// Upper bound of the support, i.e. the largest observed length.
    pub fn max_length(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, length: usize) -> u64 {
        if length == 0 || length > self.weights.len() {
            return 0;
        }
        self.weights[length - 1]
    }
}
