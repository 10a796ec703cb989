//! Working key length resolution.
//!
//! When the analyst has not pinned a key length, one is derived from the
//! evidence: the Kasiski leader first, then the IoC sweep maximum, then 1.
//! Ties always go to the smaller key length.

use serde::{Deserialize, Serialize};

use super::ioc::IocSample;
use super::kasiski::FactorVotes;
use crate::MIN_KEY_LENGTH;

/// Where a working key length came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLengthSource {
    /// Set explicitly by the analyst.
    Pinned,
    /// Most-voted Kasiski factor.
    Kasiski,
    /// Highest mean Index of Coincidence.
    Ioc,
    /// No evidence at all.
    Default,
}

/// A working key length and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedKeyLength {
    pub key_length: usize,
    pub source: KeyLengthSource,
}

/// Picks a key length from evidence.
///
/// `votes` should already be restricted to the displayed maximum key length.
pub fn resolve_key_length(votes: &FactorVotes, sweep: &[IocSample]) -> ResolvedKeyLength {
    if let Some((key_length, _)) = votes.leader() {
        return ResolvedKeyLength {
            key_length,
            source: KeyLengthSource::Kasiski,
        };
    }

    let mut best: Option<&IocSample> = None;
    for sample in sweep {
        match best {
            Some(b) if sample.mean_ioc > b.mean_ioc => best = Some(sample),
            Some(b) if sample.mean_ioc == b.mean_ioc && sample.key_length < b.key_length => {
                best = Some(sample)
            }
            None => best = Some(sample),
            _ => {}
        }
    }

    match best {
        Some(sample) => ResolvedKeyLength {
            key_length: sample.key_length.max(MIN_KEY_LENGTH),
            source: KeyLengthSource::Ioc,
        },
        None => ResolvedKeyLength {
            key_length: MIN_KEY_LENGTH,
            source: KeyLengthSource::Default,
        },
    }
}
