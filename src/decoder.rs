//! Partial decoding.
//!
//! The preview walks the raw input, not the canonical stream, so spacing and
//! punctuation survive. Letters are assigned to columns by how many letters
//! came before them. Letters in columns without a known shift become the
//! placeholder.
//!
//! CRITICAL: This decoder NEVER fails. An invalid key length passes the raw
//! text through unchanged.

use crate::key::{KeyState, ShiftSlot};
use crate::{letter_for, letter_value, ALPHABET_SIZE, PLACEHOLDER};

/// Decodes `raw` with the shifts in `key` at key length `k`.
///
/// Decoded letters are always uppercase. Non-letters are copied verbatim.
/// Slots beyond the end of `key` count as undetermined.
pub fn decode_partial(raw: &str, key: &KeyState, k: usize) -> String {
    if k == 0 {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut letters_seen = 0usize;

    for c in raw.chars() {
        let Some(value) = letter_value(c) else {
            out.push(c);
            continue;
        };

        match key.get(letters_seen % k) {
            ShiftSlot::Determined(shift) => {
                out.push(letter_for(value + ALPHABET_SIZE as u8 - shift % ALPHABET_SIZE as u8));
            }
            ShiftSlot::Undetermined => out.push(PLACEHOLDER),
        }
        letters_seen += 1;
    }

    out
}
