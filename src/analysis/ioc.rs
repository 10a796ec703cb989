//! Index of Coincidence.
//!
//! `IoC = Σ c_i(c_i - 1) / (N(N - 1))`, the probability that two letters
//! drawn without replacement are equal. English sits near 0.066, uniformly
//! random letters near 0.038. Splitting a Vigenère ciphertext at the true key
//! length yields monoalphabetic columns, so the mean column IoC jumps there.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::letter_counts;
use crate::text::split_columns;

/// Decimal places kept in sweep means.
pub const SWEEP_PRECISION: i32 = 5;

/// Mean IoC of the columns produced by one candidate key length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IocSample {
    /// Candidate key length.
    pub key_length: usize,
    /// Mean column IoC, rounded to [`SWEEP_PRECISION`] places.
    pub mean_ioc: f64,
}

/// Computes the Index of Coincidence of a stream.
///
/// Returns `0.0` for streams shorter than two letters.
pub fn index_of_coincidence(stream: &str) -> f64 {
    let counts = letter_counts(stream);
    let n: usize = counts.iter().sum();

    if n < 2 {
        return 0.0;
    }

    let coincidences: usize = counts.iter().map(|&c| c * c.saturating_sub(1)).sum();
    coincidences as f64 / (n * (n - 1)) as f64
}

/// Computes the mean column IoC for every key length in `[1, max_k]`.
///
/// `max_k = 0` yields an empty sweep.
pub fn ioc_sweep(stream: &str, max_k: usize) -> Vec<IocSample> {
    let samples: Vec<IocSample> = (1..=max_k)
        .map(|k| {
            let columns = split_columns(stream, k);
            let total: f64 = columns.iter().map(|c| index_of_coincidence(c)).sum();
            IocSample {
                key_length: k,
                mean_ioc: round_to(total / k as f64, SWEEP_PRECISION),
            }
        })
        .collect();

    debug!(stream_len = stream.len(), max_k, "computed IoC sweep");
    samples
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioc_identical_letters() {
        assert_eq!(index_of_coincidence("AAAA"), 1.0);
    }

    #[test]
    fn test_ioc_short_streams() {
        assert_eq!(index_of_coincidence(""), 0.0);
        assert_eq!(index_of_coincidence("A"), 0.0);
    }

    #[test]
    fn test_ioc_all_distinct() {
        assert_eq!(index_of_coincidence("ABCDEFGHIJKLMNOPQRSTUVWXYZ"), 0.0);
    }

    #[test]
    fn test_ioc_alternating() {
        let ioc = index_of_coincidence("ABABABAB");
        assert!((ioc - 24.0 / 56.0).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_alternating_stream() {
        let sweep = ioc_sweep("ABABABAB", 2);

        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep[0].key_length, 1);
        assert_eq!(sweep[0].mean_ioc, 0.42857);
        assert_eq!(sweep[1].key_length, 2);
        assert_eq!(sweep[1].mean_ioc, 1.0);
    }

    #[test]
    fn test_sweep_covers_every_length() {
        let sweep = ioc_sweep("HELLOWORLD", 12);
        let lengths: Vec<usize> = sweep.iter().map(|s| s.key_length).collect();
        assert_eq!(lengths, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_sweep_empty_stream() {
        let sweep = ioc_sweep("", 3);
        assert_eq!(sweep.len(), 3);
        assert!(sweep.iter().all(|s| s.mean_ioc == 0.0));
    }

    #[test]
    fn test_sweep_zero_max() {
        assert!(ioc_sweep("ABC", 0).is_empty());
    }
}
