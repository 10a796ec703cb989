//! Per-column key state.
//!
//! A key of length `k` is tracked as `k` slots, each either a known shift or
//! still undetermined. How a shift was found (chi-square, manual edit, a
//! typed key) is not recorded; the slots are the only truth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{letter_for, letter_value, ALPHABET_SIZE, PLACEHOLDER};

/// One column's shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftSlot {
    /// Shift in `[0, 25]`.
    Determined(u8),
    #[default]
    Undetermined,
}

impl ShiftSlot {
    /// Builds a determined slot, wrapping any integer into `[0, 25]`.
    pub fn wrapped(value: i64) -> Self {
        ShiftSlot::Determined(value.rem_euclid(ALPHABET_SIZE as i64) as u8)
    }

    /// The shift, if determined.
    pub fn shift(self) -> Option<u8> {
        match self {
            ShiftSlot::Determined(s) => Some(s),
            ShiftSlot::Undetermined => None,
        }
    }

    /// Key letter for this slot, or the placeholder.
    pub fn letter(self) -> char {
        match self {
            ShiftSlot::Determined(s) => letter_for(s),
            ShiftSlot::Undetermined => PLACEHOLDER,
        }
    }
}

/// Ordered shifts for every column of the working key length.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyState {
    slots: Vec<ShiftSlot>,
}

impl KeyState {
    /// Creates `k` undetermined slots.
    pub fn new(k: usize) -> Self {
        Self {
            slots: vec![ShiftSlot::Undetermined; k],
        }
    }

    /// Creates a key state of length `k` from a key string.
    ///
    /// Slots stay undetermined if the string has no letters.
    pub fn from_key_string(key: &str, k: usize) -> Self {
        let mut state = Self::new(k);
        state.apply_key_string(key);
        state
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`; out-of-range indexes read as undetermined.
    pub fn get(&self, index: usize) -> ShiftSlot {
        self.slots.get(index).copied().unwrap_or_default()
    }

    pub fn slots(&self) -> &[ShiftSlot] {
        &self.slots
    }

    /// Per-slot shifts, `None` where undetermined.
    pub fn shifts(&self) -> Vec<Option<u8>> {
        self.slots.iter().map(|s| s.shift()).collect()
    }

    /// Returns true once every slot is determined.
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(|s| s.shift().is_some())
    }

    /// Truncates or pads with undetermined slots; existing slots keep their values.
    pub fn resize(&mut self, k: usize) {
        self.slots.resize(k, ShiftSlot::Undetermined);
    }

    /// Sets a shift, wrapping the value modulo 26.
    ///
    /// Returns false (and changes nothing) if `index` is out of range.
    pub fn set_shift(&mut self, index: usize, value: i64) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = ShiftSlot::wrapped(value);
                true
            }
            None => false,
        }
    }

    /// Marks one slot undetermined. Returns false if `index` is out of range.
    pub fn clear_shift(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = ShiftSlot::Undetermined;
                true
            }
            None => false,
        }
    }

    /// Applies a key string across all slots.
    ///
    /// Non-letters are ignored; letters cycle when the key is shorter than
    /// the slot count and extra letters are dropped. A string with no
    /// letters leaves the state untouched and returns false.
    pub fn apply_key_string(&mut self, key: &str) -> bool {
        let shifts: Vec<u8> = key.chars().filter_map(letter_value).collect();

        if shifts.is_empty() {
            return false;
        }

        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = ShiftSlot::Determined(shifts[i % shifts.len()]);
        }
        true
    }

    /// Marks every slot undetermined.
    pub fn reset(&mut self) {
        self.slots.fill(ShiftSlot::Undetermined);
    }

    /// Key letters, with the placeholder for undetermined slots.
    pub fn key_string(&self) -> String {
        self.slots.iter().map(|s| s.letter()).collect()
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_string())
    }
}
