use anyhow::{bail, Context, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The quantized base-call quality symbols emitted by two-color Illumina
/// chemistry, ordered to match the weight tuples throughout this crate.
pub const QUALITY_SYMBOLS: [u8; 4] = [b'F', b',', b':', b'#'];

const QUALITY_KEYS: [&str; 4] = ["F", ",", ":", "#"];

/// Index of a symbol within [`QUALITY_SYMBOLS`], if it is part of the
/// alphabet.
pub fn symbol_index(symbol: u8) -> Option<usize> {
    QUALITY_SYMBOLS.iter().position(|&s| s == symbol)
}

/// Phred error probability encoded by a quality symbol.
fn phred_probability(symbol: u8) -> f64 {
    10f64.powf(-0.1 * (symbol as f64 - 33.0))
}

/// Per-position categorical distributions over the quality alphabet, one
/// distribution per read position, parsed from a file of JSON objects
/// (`{symbol: frequency, ...}`, line index = position).
pub struct QualityModel {
    weights: Vec<[f64; 4]>,
    samplers: Vec<WeightedIndex<f64>>,
    error_probabilities: [f64; 4],
}

impl QualityModel {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open qualities file {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse qualities file {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut weights = Vec::new();
        let mut samplers = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let frequencies: HashMap<String, f64> = serde_json::from_str(&line)
                .with_context(|| format!("Line {}: invalid JSON object", idx + 1))?;
            let row = Self::weight_row(&frequencies);
            let sampler = WeightedIndex::new(row).with_context(|| {
                format!("Line {}: no positive weight for any quality symbol", idx + 1)
            })?;
            weights.push(row);
            samplers.push(sampler);
        }
        if samplers.is_empty() {
            bail!("No quality positions found");
        }

        let error_probabilities = QUALITY_SYMBOLS.map(phred_probability);
        Ok(Self {
            weights,
            samplers,
            error_probabilities,
        })
    }

    // Unknown keys are ignored, matching how the histogram files are
    // produced: anything outside the alphabet never carries weight.
    fn weight_row(frequencies: &HashMap<String, f64>) -> [f64; 4] {
        QUALITY_KEYS.map(|key| frequencies.get(key).copied().unwrap_or(0.0))
    }

    /// Number of read positions the model covers.
    pub fn positions(&self) -> usize {
        self.samplers.len()
    }

    /// Draw a quality symbol for every position of a read of `length`
    /// bases. Lengths beyond the table are an error rather than a panic.
    pub fn sample_line<R: Rng>(&self, length: usize, rng: &mut R) -> Result<Vec<u8>> {
        if length > self.positions() {
            bail!(
                "Read length {} exceeds the {} positions of the quality table",
                length,
                self.positions()
            );
        }
        Ok(self.samplers[..length]
            .iter()
            .map(|sampler| QUALITY_SYMBOLS[sampler.sample(rng)])
            .collect())
    }

    /// Error probability of a symbol; symbols outside the alphabet never
    /// mutate a base.
    pub fn error_probability(&self, symbol: u8) -> f64 {
        symbol_index(symbol)
            .map(|i| self.error_probabilities[i])
            .unwrap_or(0.0)
    }

    pub fn weight(&self, position: usize, symbol: u8) -> f64 {
        let symbol_idx = match symbol_index(symbol) {
            Some(i) => i,
            None => return 0.0,
        };
        self.weights
            .get(position)
            .map(|row| row[symbol_idx])
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::io::Cursor;

    fn uniform_model(positions: usize) -> QualityModel {
        let line = r##"{"F": 10, ",": 10, ":": 10, "#": 10}"##;
        let text = vec![line; positions].join("\n");
        QualityModel::from_reader(Cursor::new(text)).unwrap()
    }

    #[test]
    fn sample_line_has_requested_length_and_alphabet() {
        let model = uniform_model(20);
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let line = model.sample_line(15, &mut rng).unwrap();
        assert_eq!(line.len(), 15);
        assert!(line.iter().all(|q| QUALITY_SYMBOLS.contains(q)));
    }

    #[test]
    fn sample_line_beyond_table_is_an_error() {
        let model = uniform_model(5);
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        assert!(model.sample_line(6, &mut rng).is_err());
        assert!(model.sample_line(5, &mut rng).is_ok());
    }

    #[test]
    fn single_symbol_position_always_draws_that_symbol() {
        let model = QualityModel::from_reader(Cursor::new(r#"{"F": 100}"#)).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(model.sample_line(1, &mut rng).unwrap(), vec![b'F']);
        }
    }

    #[test]
    fn comma_and_colon_weights_are_not_swapped() {
        let model = QualityModel::from_reader(Cursor::new(r#"{",": 100}"#)).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        assert_eq!(model.sample_line(1, &mut rng).unwrap(), vec![b',']);
    }

    #[test]
    fn error_probabilities_follow_the_phred_encoding() {
        let model = uniform_model(1);
        assert!((model.error_probability(b'F') - 10f64.powf(-3.7)).abs() < 1e-12);
        assert!((model.error_probability(b',') - 10f64.powf(-1.1)).abs() < 1e-12);
        assert!((model.error_probability(b':') - 10f64.powf(-2.5)).abs() < 1e-12);
        assert!((model.error_probability(b'#') - 10f64.powf(-0.2)).abs() < 1e-12);
        assert_eq!(model.error_probability(b'X'), 0.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let model =
            QualityModel::from_reader(Cursor::new(r#"{"F": 3, "E": 1000}"#)).unwrap();
        assert_eq!(model.weight(0, b'F'), 3.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        assert_eq!(model.sample_line(1, &mut rng).unwrap(), vec![b'F']);
    }

    #[test]
    fn all_zero_position_is_an_error() {
        assert!(QualityModel::from_reader(Cursor::new(r#"{"E": 10}"#)).is_err());
        assert!(QualityModel::from_reader(Cursor::new("")).is_err());
        assert!(QualityModel::from_reader(Cursor::new("not json")).is_err());
    }
}
