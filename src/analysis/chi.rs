//! Chi-square scoring against English letter frequencies.
//!
//! For a column and a candidate shift, the column is shifted back and its
//! histogram compared to the histogram English text of the same length
//! would have. Lower is a better fit.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{letter_value, ALPHABET_SIZE};

/// Relative frequencies of `A-Z` in English text.
pub const ENGLISH_FREQUENCIES: [f64; ALPHABET_SIZE] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, // A-G
    0.06094, 0.06966, 0.00153, 0.00772, 0.04025, 0.02406, 0.06749, // H-N
    0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056, 0.02758, // O-U
    0.00978, 0.02360, 0.00150, 0.01974, 0.00074, // V-Z
];

/// Score returned for empty columns. Never wins a minimization.
pub const EMPTY_COLUMN_SCORE: f64 = 1.0e9;

/// Chi-square statistic of `column` after undoing `shift`.
///
/// Non-letters are ignored. Shifts outside `[0, 25]` wrap.
pub fn chi_for_shift(column: &str, shift: u8) -> f64 {
    let shift = shift % ALPHABET_SIZE as u8;
    let mut observed = [0usize; ALPHABET_SIZE];
    let mut n = 0usize;

    for value in column.chars().filter_map(letter_value) {
        let idx = (value + ALPHABET_SIZE as u8 - shift) % ALPHABET_SIZE as u8;
        observed[idx as usize] += 1;
        n += 1;
    }

    if n == 0 {
        return EMPTY_COLUMN_SCORE;
    }

    observed
        .iter()
        .zip(ENGLISH_FREQUENCIES.iter())
        .map(|(&o, &freq)| {
            let expected = freq * n as f64;
            let diff = o as f64 - expected;
            diff * diff / expected.max(1.0)
        })
        .sum()
}

/// The 26 chi-square scores of one column, indexed by shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiProfile {
    pub scores: [f64; ALPHABET_SIZE],
}

impl ChiProfile {
    /// Score for one shift (wraps modulo 26).
    pub fn score(&self, shift: u8) -> f64 {
        self.scores[(shift % ALPHABET_SIZE as u8) as usize]
    }

    /// Shift with the lowest score; ties go to the smaller shift.
    pub fn best_shift(&self) -> u8 {
        let mut best = 0usize;
        for (shift, &score) in self.scores.iter().enumerate().skip(1) {
            if score < self.scores[best] {
                best = shift;
            }
        }
        best as u8
    }

    /// Shifts ordered by score ascending, ties by smaller shift.
    pub fn ranked(&self) -> Vec<(u8, f64)> {
        let mut ranked: Vec<(u8, f64)> = self
            .scores
            .iter()
            .enumerate()
            .map(|(shift, &score)| (shift as u8, score))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Scores every shift of a column.
pub fn chi_profile(column: &str) -> ChiProfile {
    let mut scores = [0.0; ALPHABET_SIZE];
    for (shift, score) in scores.iter_mut().enumerate() {
        *score = chi_for_shift(column, shift as u8);
    }
    trace!(column_len = column.len(), "scored chi-square profile");
    ChiProfile { scores }
}

/// Best-fit shift of a column (argmin of [`chi_for_shift`], ties to smaller shift).
pub fn best_shift(column: &str) -> u8 {
    chi_profile(column).best_shift()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_text(text: &str, shift: u8) -> String {
        text.chars()
            .filter_map(letter_value)
            .map(|v| crate::letter_for(v + shift))
            .collect()
    }

    const SAMPLE: &str = "It was the best of times it was the worst of times it was the age \
        of wisdom it was the age of foolishness it was the epoch of belief it was the \
        epoch of incredulity it was the season of light it was the season of darkness";

    #[test]
    fn test_frequencies_sum_to_one() {
        let total: f64 = ENGLISH_FREQUENCIES.iter().sum();
        assert!((total - 1.0).abs() < 0.01);
        assert!(ENGLISH_FREQUENCIES.iter().all(|&f| f > 0.0));
    }

    #[test]
    fn test_empty_column_sentinel() {
        assert_eq!(chi_for_shift("", 3), EMPTY_COLUMN_SCORE);
        let profile = chi_profile("");
        assert!(profile.scores.iter().all(|&s| s == EMPTY_COLUMN_SCORE));
        assert_eq!(profile.best_shift(), 0);
    }

    #[test]
    fn test_single_letter_uses_unit_denominator() {
        // n = 1: every expected count is below 1, so each term is (O - f)^2.
        let expected: f64 = ENGLISH_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let o = if i == 4 { 1.0 } else { 0.0 };
                (o - f) * (o - f)
            })
            .sum();
        let score = chi_for_shift("E", 0);
        assert!((score - expected).abs() < 1e-12);
        assert!((score - 0.8114566995).abs() < 1e-9);
    }

    #[test]
    fn test_exact_score_on_pangram() {
        let column = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
        assert!((chi_for_shift(column, 0) - 11.751772604907476).abs() < 1e-9);
        assert!((chi_for_shift(column, 3) - 26.129934426753962).abs() < 1e-9);
    }

    #[test]
    fn test_plain_english_prefers_zero() {
        assert_eq!(best_shift(&shift_text(SAMPLE, 0)), 0);
    }

    #[test]
    fn test_recovers_shift_on_english() {
        for shift in [1u8, 7, 13, 25] {
            assert_eq!(best_shift(&shift_text(SAMPLE, shift)), shift, "shift {}", shift);
        }
    }

    #[test]
    fn test_shift_wraps() {
        let column = shift_text(SAMPLE, 4);
        assert_eq!(chi_for_shift(&column, 30), chi_for_shift(&column, 4));
    }

    #[test]
    fn test_profile_matches_single_scores() {
        let column = shift_text(SAMPLE, 9);
        let profile = chi_profile(&column);
        for shift in 0..26u8 {
            assert_eq!(profile.score(shift), chi_for_shift(&column, shift));
        }
    }

    #[test]
    fn test_ranked_starts_with_best() {
        let column = shift_text(SAMPLE, 11);
        let profile = chi_profile(&column);
        let ranked = profile.ranked();
        assert_eq!(ranked.len(), 26);
        assert_eq!(ranked[0].0, profile.best_shift());
        for pair in ranked.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_ties_go_to_smaller_shift() {
        let profile = ChiProfile { scores: [5.0; ALPHABET_SIZE] };
        assert_eq!(profile.best_shift(), 0);

        let mut scores = [9.0; ALPHABET_SIZE];
        scores[4] = 1.0;
        scores[17] = 1.0;
        assert_eq!(ChiProfile { scores }.best_shift(), 4);
    }
}
