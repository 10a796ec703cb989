//! Statistical analyzers.
//!
//! Every function here is a pure function of its inputs. Sparse input
//! degrades to empty tables or sentinel values instead of errors.

pub mod chi;
pub mod ioc;
pub mod kasiski;
pub mod resolve;

pub use chi::{best_shift, chi_for_shift, chi_profile, ChiProfile};
pub use ioc::{index_of_coincidence, ioc_sweep, IocSample};
pub use kasiski::{distances, factor_votes, find_repeats, DistanceMode, FactorVotes, NGramOccurrence};
pub use resolve::{resolve_key_length, KeyLengthSource, ResolvedKeyLength};

use crate::ALPHABET_SIZE;

/// Counts occurrences of each letter `A-Z` (case-insensitive), ignoring the rest.
pub fn letter_counts(text: &str) -> [usize; ALPHABET_SIZE] {
    let mut counts = [0usize; ALPHABET_SIZE];
    for value in text.chars().filter_map(crate::letter_value) {
        counts[value as usize] += 1;
    }
    counts
}
