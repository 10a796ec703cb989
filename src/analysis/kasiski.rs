//! Kasiski examination.
//!
//! Repeated n-grams in a Vigenère ciphertext usually come from the same
//! plaintext enciphered at the same key offset, so the distances between
//! repeats tend to be multiples of the key length. Every integer factor of
//! every distance gets one vote.
//!
//! Cost: pairwise mode emits `m(m-1)/2` distances for a gram seen `m` times,
//! and factor voting is linear in each distance (bounded by the factor
//! limit). Long, highly repetitive inputs therefore grow quadratically per
//! repeat group. Nothing is capped.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseModeError;

/// Which distances to derive from a list of occurrence positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DistanceMode {
    /// Every `positions[j] - positions[i]` with `i < j`.
    #[default]
    Pairwise,
    /// Only `positions[i + 1] - positions[i]`.
    Successive,
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMode::Pairwise => write!(f, "pairwise"),
            DistanceMode::Successive => write!(f, "successive"),
        }
    }
}

impl FromStr for DistanceMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairwise" | "all" => Ok(DistanceMode::Pairwise),
            "successive" | "consecutive" => Ok(DistanceMode::Successive),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for DistanceMode {
    type Error = ParseModeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A repeated gram and where it starts in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NGramOccurrence {
    /// The repeated substring.
    pub gram: String,
    /// 0-based start positions in the canonical stream, ascending.
    pub positions: Vec<usize>,
}

impl NGramOccurrence {
    /// Number of times the gram occurs.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Distances between occurrences under the given mode.
    pub fn distances(&self, mode: DistanceMode) -> Vec<usize> {
        distances(&self.positions, mode)
    }
}

/// One row of the repeat table: a gram, its positions and its distances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatEntry {
    pub gram: String,
    pub positions: Vec<usize>,
    pub distances: Vec<usize>,
}

impl RepeatEntry {
    /// Builds a table row from an occurrence.
    pub fn from_occurrence(occurrence: &NGramOccurrence, mode: DistanceMode) -> Self {
        Self {
            gram: occurrence.gram.clone(),
            positions: occurrence.positions.clone(),
            distances: occurrence.distances(mode),
        }
    }
}

/// Finds every length-`n` substring that occurs at least twice.
///
/// Overlapping occurrences count. Results are sorted by occurrence count,
/// descending; grams with equal counts keep the order in which they were
/// first seen. `n = 0` or `n` longer than the stream yields no repeats.
pub fn find_repeats(stream: &str, n: usize) -> Vec<NGramOccurrence> {
    let bytes = stream.as_bytes();

    if n == 0 || n > bytes.len() || !stream.is_ascii() {
        return vec![];
    }

    let mut order: Vec<&[u8]> = Vec::new();
    let mut seen: HashMap<&[u8], Vec<usize>> = HashMap::new();

    for (pos, window) in bytes.windows(n).enumerate() {
        seen.entry(window)
            .or_insert_with(|| {
                order.push(window);
                Vec::new()
            })
            .push(pos);
    }

    let mut repeats: Vec<NGramOccurrence> = order
        .into_iter()
        .filter_map(|gram| {
            let positions = seen.remove(gram)?;
            if positions.len() < 2 {
                return None;
            }
            Some(NGramOccurrence {
                gram: String::from_utf8_lossy(gram).into_owned(),
                positions,
            })
        })
        .collect();

    // Stable sort keeps discovery order among equal counts.
    repeats.sort_by(|a, b| b.count().cmp(&a.count()));

    debug!(n, repeats = repeats.len(), "found repeated grams");
    repeats
}

/// Derives distances from occurrence positions.
///
/// Positions are expected in ascending order; out-of-order input still
/// yields absolute distances.
pub fn distances(positions: &[usize], mode: DistanceMode) -> Vec<usize> {
    match mode {
        DistanceMode::Successive => positions.windows(2).map(|w| w[1].abs_diff(w[0])).collect(),
        DistanceMode::Pairwise => {
            let mut out = Vec::with_capacity(positions.len() * positions.len().saturating_sub(1) / 2);
            for (i, &a) in positions.iter().enumerate() {
                for &b in &positions[i + 1..] {
                    out.push(b.abs_diff(a));
                }
            }
            out
        }
    }
}

/// Accumulated factor votes, keyed by candidate key length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorVotes {
    votes: BTreeMap<usize, usize>,
}

impl FactorVotes {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one vote for every factor `f` in `[2, min(limit, d)]` dividing `d`.
    pub fn add_distance(&mut self, d: usize, limit: usize) {
        for f in 2..=limit.min(d) {
            if d % f == 0 {
                *self.votes.entry(f).or_insert(0) += 1;
            }
        }
    }

    /// Votes for a key length (0 if none).
    pub fn get(&self, k: usize) -> usize {
        self.votes.get(&k).copied().unwrap_or(0)
    }

    /// Returns true if no key length has any votes.
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Number of key lengths with votes.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// Iterates `(key_length, votes)` in ascending key length.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.votes.iter().map(|(&k, &v)| (k, v))
    }

    /// Returns a copy keeping only key lengths `<= max_k`.
    pub fn restricted(&self, max_k: usize) -> Self {
        Self {
            votes: self.votes.range(..=max_k).map(|(&k, &v)| (k, v)).collect(),
        }
    }

    /// `(key_length, votes)` by votes descending, ties by smaller key length.
    pub fn ranked(&self) -> Vec<(usize, usize)> {
        let mut ranked: Vec<(usize, usize)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// The top-ranked key length, if any votes exist.
    pub fn leader(&self) -> Option<(usize, usize)> {
        self.ranked().into_iter().next()
    }
}

/// Counts factor votes for a set of distances.
///
/// Each distance `d` votes once for every `f` in `[2, min(limit, d)]` with
/// `d % f == 0`. Votes are unweighted, so grams with more occurrences
/// contribute proportionally more.
pub fn factor_votes(distances: &[usize], limit: usize) -> FactorVotes {
    let mut votes = FactorVotes::new();
    for &d in distances {
        votes.add_distance(d, limit);
    }
    votes
}

/// Sums factor votes over every repeat group.
pub fn kasiski_votes(repeats: &[NGramOccurrence], mode: DistanceMode, limit: usize) -> FactorVotes {
    let mut votes = FactorVotes::new();
    for occurrence in repeats {
        for d in occurrence.distances(mode) {
            votes.add_distance(d, limit);
        }
    }
    debug!(candidates = votes.len(), %mode, limit, "accumulated factor votes");
    votes
}
