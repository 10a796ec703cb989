//! Analysis session.
//!
//! One session holds everything known about one ciphertext: the raw text,
//! its canonical stream, the analysis configuration, an optional pinned key
//! length, the key state, and the analyst's current selections. Queries
//! recompute from these fields every time; there is no cached state to go
//! stale. Sessions share nothing, so any number can coexist.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::chi::{chi_profile, ChiProfile};
use crate::analysis::ioc::{index_of_coincidence, ioc_sweep, IocSample};
use crate::analysis::kasiski::{
    find_repeats, kasiski_votes, DistanceMode, FactorVotes, NGramOccurrence, RepeatEntry,
};
use crate::analysis::resolve::{resolve_key_length, KeyLengthSource, ResolvedKeyLength};
use crate::decoder::decode_partial;
use crate::error::ConfigError;
use crate::key::{KeyState, ShiftSlot};
use crate::text::{normalize, split_columns};
use crate::{clamp_key_length, MAX_KEY_LENGTH};

/// Shortest n-gram examined by the Kasiski analyzer.
pub const MIN_NGRAM_LENGTH: usize = 3;

/// Longest n-gram examined by the Kasiski analyzer.
pub const MAX_NGRAM_LENGTH: usize = 6;

/// Smallest useful factor-vote limit (factor 1 never votes).
pub const MIN_FACTOR_LIMIT: usize = 2;

/// Default n-gram length.
pub const DEFAULT_NGRAM_LENGTH: usize = 3;

/// Default largest key length shown in sweeps and vote tables.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 20;

/// Default largest factor counted by Kasiski voting.
pub const DEFAULT_FACTOR_LIMIT: usize = 20;

/// Analysis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Length of the repeated grams searched for.
    pub ngram_length: usize,

    /// Which repeat distances vote.
    pub distance_mode: DistanceMode,

    /// Largest key length in the IoC sweep and vote table.
    pub max_key_length: usize,

    /// Largest factor counted when voting.
    pub factor_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ngram_length: DEFAULT_NGRAM_LENGTH,
            distance_mode: DistanceMode::default(),
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            factor_limit: DEFAULT_FACTOR_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Returns a copy with every field clamped into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            ngram_length: self.ngram_length.clamp(MIN_NGRAM_LENGTH, MAX_NGRAM_LENGTH),
            distance_mode: self.distance_mode,
            max_key_length: clamp_key_length(self.max_key_length),
            factor_limit: self.factor_limit.clamp(MIN_FACTOR_LIMIT, MAX_KEY_LENGTH),
        }
    }

    /// Parses a TOML configuration. Missing fields take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        Ok(config.clamped())
    }

    /// Loads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Votes for one key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub key_length: usize,
    pub votes: usize,
}

/// Evidence for one column at the working key length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub length: usize,
    pub ioc: f64,
    pub best_shift: u8,
    pub best_score: f64,
    pub slot: ShiftSlot,
}

/// Snapshot of every output of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stream_length: usize,
    pub config: SessionConfig,
    pub key_length: ResolvedKeyLength,
    pub ioc_sweep: Vec<IocSample>,
    pub repeats: Vec<RepeatEntry>,
    /// Factor votes in ascending key length, restricted to the max key length.
    pub factor_votes: Vec<VoteCount>,
    pub columns: Vec<ColumnSummary>,
    pub active_column: usize,
    pub chi_profile: ChiProfile,
    pub key: String,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_gram: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlighted_positions: Vec<usize>,
}

/// State and queries for one ciphertext under study.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    raw: String,
    stream: String,
    config: SessionConfig,
    pinned: Option<usize>,
    key: KeyState,
    active_column: usize,
    selected_gram: Option<String>,
}

impl AnalysisSession {
    /// Creates a session with the default configuration.
    pub fn new(raw: &str) -> Self {
        Self::with_config(raw, SessionConfig::default())
    }

    /// Creates a session with a custom configuration.
    pub fn with_config(raw: &str, config: SessionConfig) -> Self {
        let mut session = Self {
            raw: raw.to_string(),
            stream: normalize(raw),
            config: config.clamped(),
            pinned: None,
            key: KeyState::default(),
            active_column: 0,
            selected_gram: None,
        };
        session.sync_key_length();
        session
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The canonical letter stream.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replaces the ciphertext. Key state and pin are kept.
    pub fn set_text(&mut self, raw: &str) {
        self.raw = raw.to_string();
        self.stream = normalize(raw);
        self.sync_key_length();
    }

    /// Replaces the configuration (clamped).
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config.clamped();
        self.sync_key_length();
    }

    /// Pins the working key length, clamped into `[1, 40]`. Returns the pinned value.
    pub fn pin_key_length(&mut self, k: usize) -> usize {
        let k = clamp_key_length(k);
        self.pinned = Some(k);
        self.sync_key_length();
        k
    }

    /// Returns to evidence-derived key length.
    pub fn unpin_key_length(&mut self) {
        self.pinned = None;
        self.sync_key_length();
    }

    pub fn pinned_key_length(&self) -> Option<usize> {
        self.pinned
    }

    /// Selects the column shown by [`chi_profile`](Self::chi_profile), clamped to the last column.
    pub fn select_column(&mut self, index: usize) -> usize {
        self.active_column = index.min(self.working_key_length() - 1);
        self.active_column
    }

    pub fn active_column(&self) -> usize {
        self.active_column
    }

    /// Selects a gram to highlight. Has no effect on analysis.
    pub fn select_gram(&mut self, gram: Option<&str>) {
        self.selected_gram = gram.map(|g| g.to_ascii_uppercase());
    }

    pub fn selected_gram(&self) -> Option<&str> {
        self.selected_gram.as_deref()
    }

    // ------------------------------------------------------------------
    // Evidence
    // ------------------------------------------------------------------

    /// Mean column IoC for every key length up to the configured maximum.
    pub fn ioc_sweep(&self) -> Vec<IocSample> {
        ioc_sweep(&self.stream, self.config.max_key_length)
    }

    /// Repeated grams of the configured length, most frequent first.
    pub fn repeats(&self) -> Vec<NGramOccurrence> {
        find_repeats(&self.stream, self.config.ngram_length)
    }

    /// Repeats with their distances under the configured mode.
    pub fn repeat_table(&self) -> Vec<RepeatEntry> {
        let mode = self.config.distance_mode;
        self.repeats()
            .iter()
            .map(|occurrence| RepeatEntry::from_occurrence(occurrence, mode))
            .collect()
    }

    /// Factor votes, restricted to key lengths up to the configured maximum.
    pub fn kasiski_votes(&self) -> FactorVotes {
        kasiski_votes(&self.repeats(), self.config.distance_mode, self.config.factor_limit)
            .restricted(self.config.max_key_length)
    }

    /// Start positions of the selected gram, empty if none is selected.
    pub fn highlighted_positions(&self) -> Vec<usize> {
        let Some(gram) = self.selected_gram.as_deref() else {
            return vec![];
        };
        self.repeats()
            .into_iter()
            .find(|r| r.gram == gram)
            .map(|r| r.positions)
            .unwrap_or_default()
    }

    /// The working key length and where it came from.
    pub fn resolved_key_length(&self) -> ResolvedKeyLength {
        match self.pinned {
            Some(key_length) => ResolvedKeyLength {
                key_length,
                source: KeyLengthSource::Pinned,
            },
            None => resolve_key_length(&self.kasiski_votes(), &self.ioc_sweep()),
        }
    }

    pub fn working_key_length(&self) -> usize {
        self.resolved_key_length().key_length
    }

    /// Columns at the working key length.
    pub fn columns(&self) -> Vec<String> {
        split_columns(&self.stream, self.working_key_length())
    }

    /// Chi-square profile of the active column.
    pub fn chi_profile(&self) -> ChiProfile {
        self.column_profile(self.active_column)
    }

    /// Chi-square profile of any column (empty profile if out of range).
    pub fn column_profile(&self, index: usize) -> ChiProfile {
        let columns = self.columns();
        chi_profile(columns.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Best-fit shift of the active column.
    pub fn best_shift(&self) -> u8 {
        self.chi_profile().best_shift()
    }

    // ------------------------------------------------------------------
    // Key state
    // ------------------------------------------------------------------

    pub fn key_state(&self) -> &KeyState {
        &self.key
    }

    /// Commits the active column's best-fit shift. Returns it, or `None`
    /// when the column is empty and there is nothing to fit.
    pub fn commit_best_shift(&mut self) -> Option<u8> {
        let columns = self.columns();
        let column = columns.get(self.active_column)?;
        if column.is_empty() {
            return None;
        }
        let shift = chi_profile(column).best_shift();
        self.key.set_shift(self.active_column, shift as i64);
        debug!(column = self.active_column, shift, "committed best-fit shift");
        Some(shift)
    }

    /// Sets one column's shift (wrapped modulo 26).
    pub fn set_shift(&mut self, index: usize, value: i64) -> bool {
        self.key.set_shift(index, value)
    }

    /// Marks one column's shift undetermined.
    pub fn clear_shift(&mut self, index: usize) -> bool {
        self.key.clear_shift(index)
    }

    /// Applies a key string across all columns. Ignored without letters.
    pub fn apply_key_string(&mut self, key: &str) -> bool {
        self.key.apply_key_string(key)
    }

    pub fn reset_key(&mut self) {
        self.key.reset();
    }

    pub fn key_string(&self) -> String {
        self.key.key_string()
    }

    /// Partial plaintext at the working key length.
    pub fn decode_preview(&self) -> String {
        decode_partial(&self.raw, &self.key, self.working_key_length())
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Computes every output at once.
    pub fn report(&self) -> AnalysisReport {
        let sweep = self.ioc_sweep();
        let repeats = self.repeats();
        let mode = self.config.distance_mode;
        let votes = kasiski_votes(&repeats, mode, self.config.factor_limit)
            .restricted(self.config.max_key_length);

        let key_length = match self.pinned {
            Some(k) => ResolvedKeyLength {
                key_length: k,
                source: KeyLengthSource::Pinned,
            },
            None => resolve_key_length(&votes, &sweep),
        };

        let split = split_columns(&self.stream, key_length.key_length);
        let profiles: Vec<ChiProfile> = split.iter().map(|column| chi_profile(column)).collect();

        let columns: Vec<ColumnSummary> = split
            .iter()
            .zip(&profiles)
            .enumerate()
            .map(|(index, (column, profile))| {
                let best_shift = profile.best_shift();
                ColumnSummary {
                    index,
                    length: column.len(),
                    ioc: index_of_coincidence(column),
                    best_shift,
                    best_score: profile.score(best_shift),
                    slot: self.key.get(index),
                }
            })
            .collect();

        let highlighted_positions = self
            .selected_gram
            .as_deref()
            .and_then(|gram| repeats.iter().find(|r| r.gram == gram))
            .map(|r| r.positions.clone())
            .unwrap_or_default();

        AnalysisReport {
            stream_length: self.stream.len(),
            config: self.config,
            key_length,
            ioc_sweep: sweep,
            repeats: repeats
                .iter()
                .map(|occurrence| RepeatEntry::from_occurrence(occurrence, mode))
                .collect(),
            factor_votes: votes
                .iter()
                .map(|(key_length, votes)| VoteCount { key_length, votes })
                .collect(),
            columns,
            active_column: self.active_column,
            chi_profile: profiles
                .get(self.active_column)
                .copied()
                .unwrap_or_else(|| chi_profile("")),
            key: self.key_string(),
            preview: decode_partial(&self.raw, &self.key, key_length.key_length),
            selected_gram: self.selected_gram.clone(),
            highlighted_positions,
        }
    }

    /// Resizes the key state to the working key length and clamps the active column.
    fn sync_key_length(&mut self) {
        let resolved = self.resolved_key_length();
        self.key.resize(resolved.key_length);
        self.active_column = self.active_column.min(resolved.key_length - 1);
        debug!(
            stream_len = self.stream.len(),
            key_length = resolved.key_length,
            source = ?resolved.source,
            "working key length"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encipher;

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.ngram_length, 3);
        assert_eq!(config.distance_mode, DistanceMode::Pairwise);
        assert_eq!(config.max_key_length, 20);
        assert_eq!(config.factor_limit, 20);
    }

    #[test]
    fn test_config_clamped() {
        let config = SessionConfig {
            ngram_length: 9,
            distance_mode: DistanceMode::Successive,
            max_key_length: 0,
            factor_limit: 100,
        }
        .clamped();
        assert_eq!(config.ngram_length, 6);
        assert_eq!(config.max_key_length, 1);
        assert_eq!(config.factor_limit, 40);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let config = SessionConfig::from_toml("distance_mode = \"successive\"\nmax_key_length = 12\n").unwrap();
        assert_eq!(config.distance_mode, DistanceMode::Successive);
        assert_eq!(config.max_key_length, 12);
        assert_eq!(config.ngram_length, DEFAULT_NGRAM_LENGTH);
    }

    #[test]
    fn test_config_from_toml_invalid() {
        assert!(SessionConfig::from_toml("ngram_length = \"three\"").is_err());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = SessionConfig {
            ngram_length: 4,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(SessionConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = SessionConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_empty_session_degrades() {
        let mut session = AnalysisSession::new("");
        assert_eq!(session.working_key_length(), 1);
        assert!(session.repeats().is_empty());
        assert!(session.kasiski_votes().is_empty());
        assert_eq!(session.key_string(), "?");
        assert_eq!(session.decode_preview(), "");
        assert_eq!(session.commit_best_shift(), None);
        assert_eq!(session.key_string(), "?");
    }

    #[test]
    fn test_pin_clamps_and_resizes_key() {
        let mut session = AnalysisSession::new("some ciphertext");
        assert_eq!(session.pin_key_length(0), 1);
        assert_eq!(session.pin_key_length(64), 40);
        assert_eq!(session.key_state().len(), 40);

        session.pin_key_length(4);
        assert_eq!(session.working_key_length(), 4);
        assert_eq!(session.resolved_key_length().source, KeyLengthSource::Pinned);
        assert_eq!(session.key_string(), "????");
    }

    #[test]
    fn test_key_survives_key_length_changes() {
        let mut session = AnalysisSession::new("LXFOPVEFRNHR");
        session.pin_key_length(5);
        session.apply_key_string("LEMON");

        session.pin_key_length(3);
        assert_eq!(session.key_string(), "LEM");

        session.pin_key_length(6);
        assert_eq!(session.key_string(), "LEM???");
    }

    #[test]
    fn test_set_config_resizes_key() {
        let mut session = AnalysisSession::new("ABCXABCYABC");
        assert_eq!(session.working_key_length(), 2);
        session.set_shift(0, 5);
        session.set_shift(1, 7);
        session.select_column(1);

        session.set_config(SessionConfig {
            max_key_length: 1,
            ..Default::default()
        });
        assert_eq!(session.working_key_length(), 1);
        assert_eq!(session.key_state().len(), session.working_key_length());
        assert_eq!(session.key_string(), "F");
        assert_eq!(session.active_column(), 0);

        session.set_config(SessionConfig::default());
        assert_eq!(session.working_key_length(), 2);
        assert_eq!(session.key_state().len(), 2);
        assert_eq!(session.key_string(), "F?");
    }

    #[test]
    fn test_unpin_resizes_key() {
        let mut session = AnalysisSession::new("ABCXABCYABC");
        session.pin_key_length(7);
        session.apply_key_string("LEMONAD");
        session.select_column(6);

        session.unpin_key_length();
        assert_eq!(session.working_key_length(), 2);
        assert_eq!(session.key_state().len(), session.working_key_length());
        assert_eq!(session.key_string(), "LE");
        assert_eq!(session.active_column(), 1);
    }

    #[test]
    fn test_config_mode_accepts_parse_spellings() {
        let config = SessionConfig::from_toml("distance_mode = \"Successive\"\n").unwrap();
        assert_eq!(config.distance_mode, DistanceMode::Successive);
        let config = SessionConfig::from_toml("distance_mode = \"consecutive\"\n").unwrap();
        assert_eq!(config.distance_mode, DistanceMode::Successive);
    }

    #[test]
    fn test_active_column_clamped() {
        let mut session = AnalysisSession::new("ABCDEFGH");
        session.pin_key_length(4);
        assert_eq!(session.select_column(10), 3);

        session.pin_key_length(2);
        assert_eq!(session.active_column(), 1);
    }

    #[test]
    fn test_repeat_table_distances() {
        let config = SessionConfig {
            distance_mode: DistanceMode::Successive,
            ..Default::default()
        };
        let session = AnalysisSession::with_config("ABCXABCYYABC", config);
        let table = session.repeat_table();

        assert_eq!(table[0].gram, "ABC");
        assert_eq!(table[0].positions, vec![0, 4, 9]);
        assert_eq!(table[0].distances, vec![4, 5]);
    }

    #[test]
    fn test_kasiski_drives_working_length() {
        // ABC at 0, 4, 8: distances 4, 8, 4 give factors 2 and 4 three votes each.
        let session = AnalysisSession::new("ABCXABCYABC");
        let votes = session.kasiski_votes();
        assert_eq!(votes.get(2), 3);
        assert_eq!(votes.get(4), 3);
        assert_eq!(session.working_key_length(), 2);
        assert_eq!(session.resolved_key_length().source, KeyLengthSource::Kasiski);
    }

    #[test]
    fn test_votes_restricted_to_max_key_length() {
        let config = SessionConfig {
            max_key_length: 3,
            factor_limit: 40,
            ..Default::default()
        };
        let session = AnalysisSession::with_config("ABCXABCYABC", config);
        assert_eq!(session.kasiski_votes().get(4), 0);
        assert!(session.kasiski_votes().iter().all(|(k, _)| k <= 3));
    }

    #[test]
    fn test_highlight_is_read_only() {
        let mut session = AnalysisSession::new("ABCXABCYABC");
        let before = session.report();

        session.select_gram(Some("abc"));
        assert_eq!(session.highlighted_positions(), vec![0, 4, 8]);
        assert_eq!(session.working_key_length(), before.key_length.key_length);
        assert_eq!(session.kasiski_votes().ranked().len(), before.factor_votes.len());

        session.select_gram(Some("ZZZ"));
        assert!(session.highlighted_positions().is_empty());
    }

    #[test]
    fn test_commit_best_shift_for_active_column() {
        let plaintext = "It was the best of times it was the worst of times it was the age \
            of wisdom it was the age of foolishness it was the epoch of belief";
        let ciphertext = encipher(plaintext, "H");

        let mut session = AnalysisSession::new(&ciphertext);
        session.pin_key_length(1);
        assert_eq!(session.commit_best_shift(), Some(7));
        assert_eq!(session.key_string(), "H");
        assert_eq!(session.decode_preview(), plaintext.to_ascii_uppercase());
    }

    #[test]
    fn test_set_text_keeps_key() {
        let mut session = AnalysisSession::new("AAAA");
        session.pin_key_length(2);
        session.set_shift(0, 3);
        session.set_text("BBBB");
        assert_eq!(session.key_string(), "D?");
        assert_eq!(session.decode_preview(), "Y?Y?");
    }

    #[test]
    fn test_independent_sessions() {
        let mut a = AnalysisSession::new("HELLO");
        let b = AnalysisSession::new("HELLO");
        a.pin_key_length(1);
        a.apply_key_string("C");
        assert_eq!(a.key_string(), "C");
        assert_eq!(b.key_string(), "?");
    }

    #[test]
    fn test_report_matches_queries() {
        let mut session = AnalysisSession::new("LXFOPV EF RNHR LXFOPV EF RNHR");
        session.pin_key_length(5);
        session.apply_key_string("LEMON");
        session.select_column(2);

        let report = session.report();
        assert_eq!(report.key_length.key_length, 5);
        assert_eq!(report.columns.len(), 5);
        assert_eq!(report.active_column, 2);
        assert_eq!(report.chi_profile, session.chi_profile());
        assert_eq!(report.columns[2].best_shift, session.best_shift());
        assert_eq!(report.key, "LEMON");
        assert_eq!(report.preview, session.decode_preview());
        assert_eq!(report.ioc_sweep, session.ioc_sweep());
        assert_eq!(report.repeats, session.repeat_table());
        assert_eq!(report.columns[0].slot, ShiftSlot::Determined(11));
    }
}
