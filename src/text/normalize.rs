//! Canonical letter stream.
//!
//! Every analyzer works on the same stream: uppercase ASCII letters only,
//! in the order they appear in the raw input. Position `j` in the stream is
//! the `j`-th letter of the raw text, which is what lets the decoder map
//! stream columns back onto the original characters.

/// Normalizes raw input into a canonical stream (uppercase, `A-Z` only).
///
/// Digits, whitespace, punctuation and non-ASCII characters are dropped.
/// Never fails; empty input yields an empty stream.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
