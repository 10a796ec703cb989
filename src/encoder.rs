//! Vigenère encipherment.
//!
//! The counterpart of [`decode_partial`](crate::decoder::decode_partial):
//! same letter walk, same column assignment, shifts added instead of
//! subtracted. Used to produce practice ciphertext and test material.

use rand::Rng;

use crate::{letter_for, letter_value, ALPHABET_SIZE};

/// Enciphers `plaintext` with `key`.
///
/// Letters are uppercased and shifted by the key letter of their column;
/// everything else is copied verbatim and does not consume key letters.
/// A key without letters leaves the letters unshifted.
pub fn encipher(plaintext: &str, key: &str) -> String {
    let shifts: Vec<u8> = key.chars().filter_map(letter_value).collect();
    let mut out = String::with_capacity(plaintext.len());
    let mut letters_seen = 0usize;

    for c in plaintext.chars() {
        match letter_value(c) {
            Some(value) => {
                let shift = if shifts.is_empty() {
                    0
                } else {
                    shifts[letters_seen % shifts.len()]
                };
                out.push(letter_for(value + shift));
                letters_seen += 1;
            }
            None => out.push(c),
        }
    }

    out
}

/// Draws a random key of `len` uppercase letters.
pub fn random_key<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    (0..len)
        .map(|_| letter_for(rng.gen_range(0..ALPHABET_SIZE as u8)))
        .collect()
}
