//! # Kasiski - evidence for breaking Vigenère-family ciphers by hand
//!
//! Kasiski is an analysis engine for polyalphabetic substitution ciphers.
//! It computes statistical evidence about the key and leaves every decision
//! to a human analyst.
//!
//! ## Overview
//!
//! - **Normalization**: raw ciphertext is reduced to a stream of `A-Z` letters
//! - **Index of Coincidence sweep**: mean IoC of the columns for every candidate key length
//! - **Kasiski examination**: repeated n-grams, their distances, and factor votes
//! - **Chi-square scoring**: per-column fit to English letter frequencies for all 26 shifts
//! - **Key state**: per-column shifts that are either determined or still unknown
//! - **Partial decoding**: a preview that keeps punctuation and marks unknown letters
//!
//! Nothing here auto-solves. Key lengths and shifts are surfaced as ranked
//! evidence, and the caller commits what it believes.
//!
//! ## Graceful degradation
//!
//! Analysis never fails. Sparse or empty input produces empty tables,
//! `0.0` coincidence values, sentinel chi-square scores and `?` placeholders.
//!
//! ## Example Usage
//!
//! ```rust
//! use kasiski::{encipher, AnalysisSession};
//!
//! let ciphertext = encipher("Attack at dawn, attack at dusk.", "LEMON");
//!
//! let mut session = AnalysisSession::new(&ciphertext);
//! session.pin_key_length(5);
//! session.apply_key_string("LEMON");
//!
//! assert_eq!(session.key_string(), "LEMON");
//! assert_eq!(session.decode_preview(), "ATTACK AT DAWN, ATTACK AT DUSK.");
//! ```
//!
//! ## Modules
//!
//! - [`text`]: Normalization and column splitting
//! - [`analysis`]: IoC, Kasiski and chi-square analyzers, key length resolution
//! - [`key`]: Per-column key state
//! - [`decoder`]: Partial plaintext preview
//! - [`encoder`]: Vigenère encipherment for test material
//! - [`session`]: Analysis session tying everything together

/// Number of letters in the alphabet.
pub const ALPHABET_SIZE: usize = 26;

/// Smallest key length accepted anywhere.
pub const MIN_KEY_LENGTH: usize = 1;

/// Largest key length accepted anywhere.
pub const MAX_KEY_LENGTH: usize = 40;

/// Character emitted for letters whose shift is not yet known.
pub const PLACEHOLDER: char = '?';

pub mod analysis;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod key;
pub mod session;
pub mod text;

// Re-export commonly used types at the crate root
pub use analysis::chi::{best_shift, chi_for_shift, chi_profile, ChiProfile, ENGLISH_FREQUENCIES};
pub use analysis::ioc::{index_of_coincidence, ioc_sweep, IocSample};
pub use analysis::kasiski::{
    distances, factor_votes, find_repeats, kasiski_votes, DistanceMode, FactorVotes,
    NGramOccurrence, RepeatEntry,
};
pub use analysis::resolve::{resolve_key_length, KeyLengthSource, ResolvedKeyLength};
pub use decoder::decode_partial;
pub use encoder::{encipher, random_key};
pub use error::{ConfigError, ParseModeError};
pub use key::{KeyState, ShiftSlot};
pub use session::{AnalysisReport, AnalysisSession, ColumnSummary, SessionConfig, VoteCount};
pub use text::{interleave_columns, normalize, split_columns};

/// Clamps a requested key length into `[MIN_KEY_LENGTH, MAX_KEY_LENGTH]`.
pub fn clamp_key_length(k: usize) -> usize {
    k.clamp(MIN_KEY_LENGTH, MAX_KEY_LENGTH)
}

/// Returns the 0-based alphabet index of an ASCII letter, ignoring case.
pub fn letter_value(c: char) -> Option<u8> {
    if c.is_ascii_alphabetic() {
        Some(c.to_ascii_uppercase() as u8 - b'A')
    } else {
        None
    }
}

/// Returns the uppercase letter for an alphabet index (taken modulo 26).
pub fn letter_for(value: u8) -> char {
    (b'A' + value % ALPHABET_SIZE as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_value() {
        assert_eq!(letter_value('A'), Some(0));
        assert_eq!(letter_value('z'), Some(25));
        assert_eq!(letter_value('5'), None);
        assert_eq!(letter_value('é'), None);
    }

    #[test]
    fn test_letter_for_wraps() {
        assert_eq!(letter_for(0), 'A');
        assert_eq!(letter_for(25), 'Z');
        assert_eq!(letter_for(27), 'B');
    }

    #[test]
    fn test_clamp_key_length() {
        assert_eq!(clamp_key_length(0), 1);
        assert_eq!(clamp_key_length(7), 7);
        assert_eq!(clamp_key_length(99), 40);
    }
}
