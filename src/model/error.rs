use crate::model::QualityModel;
use rand::Rng;

const BASES: [u8; 4] = *b"ACTG";

/// Mutate a single base with probability `p`. The replacement is drawn
/// uniformly from ACTG independent of the original, so a "mutation" may
/// leave the base unchanged a quarter of the time.
pub fn error_base<R: Rng>(base: u8, p: f64, rng: &mut R) -> u8 {
    if rng.gen::<f64>() < p {
        BASES[rng.gen_range(0..BASES.len())]
    } else {
        base
    }
}

/// Apply the error model to a whole read, position by position. Each base
/// mutates independently with the probability encoded by its quality
/// symbol.
pub fn error_seq<R: Rng>(
    plain: &[u8],
    quality_line: &[u8],
    model: &QualityModel,
    rng: &mut R,
) -> Vec<u8> {
    plain
        .iter()
        .zip(quality_line)
        .map(|(&base, &symbol)| error_base(base, model.error_probability(symbol), rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QualityModel;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::io::Cursor;

    fn model() -> QualityModel {
        QualityModel::from_reader(Cursor::new(r##"{"F": 1, ",": 1, ":": 1, "#": 1}"##)).unwrap()
    }

    #[test]
    fn identical_rng_state_yields_identical_output() {
        let model = model();
        let plain = b"ACGTACGTACGTACGTACGT";
        let quality = vec![b'#'; plain.len()];
        let mut rng_a = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng_b = Xoshiro256StarStar::seed_from_u64(42);
        let a = error_seq(plain, &quality, &model, &mut rng_a);
        let b = error_seq(plain, &quality, &model, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn output_stays_on_the_base_alphabet() {
        let model = model();
        let plain = b"AAAACCCCGGGGTTTT";
        let quality = vec![b'#'; plain.len()];
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let errored = error_seq(plain, &quality, &model, &mut rng);
        assert_eq!(errored.len(), plain.len());
        assert!(errored.iter().all(|b| BASES.contains(b)));
    }

    #[test]
    fn hash_symbol_mutates_near_its_configured_rate() {
        // '#' encodes p = 10^-0.2 ~= 0.631; a uniform redraw restores the
        // original base 1/4 of the time, so observable substitutions
        // converge to 0.75 * p ~= 0.473.
        let mut rng = Xoshiro256StarStar::seed_from_u64(2024);
        let p = 10f64.powf(-0.2);
        let trials = 10_000;
        let changed = (0..trials)
            .filter(|_| error_base(b'A', p, &mut rng) != b'A')
            .count();
        let rate = changed as f64 / trials as f64;
        assert!(
            (rate - 0.75 * p).abs() < 0.02,
            "substitution rate {} too far from {}",
            rate,
            0.75 * p
        );
    }

    #[test]
    fn f_symbol_rarely_mutates() {
        // 'F' encodes p = 10^-3.7 ~= 2e-4.
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let p = 10f64.powf(-3.7);
        let trials = 10_000;
        let changed = (0..trials)
            .filter(|_| error_base(b'G', p, &mut rng) != b'G')
            .count();
        assert!(
            (changed as f64 / trials as f64) < 0.005,
            "{} substitutions out of {}",
            changed,
            trials
        );
    }

    #[test]
    fn zero_probability_never_mutates() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        for _ in 0..1000 {
            assert_eq!(error_base(b'T', 0.0, &mut rng), b'T');
        }
    }
}
