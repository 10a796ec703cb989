//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Commands only parse options, drive an `AnalysisSession` and print; all
//! analysis lives in the library.

mod analyze;
mod chi;
mod config;
mod decode;
mod encipher;
mod ioc;
mod repeats;

pub use analyze::AnalyzeCommand;
pub use chi::ChiCommand;
pub use config::ConfigCommand;
pub use decode::DecodeCommand;
pub use encipher::EncipherCommand;
pub use ioc::IocCommand;
pub use repeats::KasiskiCommand;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use kasiski::{AnalysisSession, DistanceMode, SessionConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Where the text to analyze comes from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Read text from a file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Text given directly on the command line
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,
}

impl InputArgs {
    /// Reads the text from `--text`, `--input`, or stdin (in that order).
    pub fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.input {
            return fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()));
        }

        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    }
}

/// Analysis configuration and key state options shared by most commands.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// TOML config file (flags below override its values)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Length of repeated grams to search for (3-6)
    #[arg(short = 'n', long)]
    pub ngram: Option<usize>,

    /// Distance mode for Kasiski voting: pairwise or successive
    #[arg(short, long)]
    pub mode: Option<DistanceMode>,

    /// Largest key length shown in the IoC sweep and vote table (1-40)
    #[arg(long)]
    pub max_key: Option<usize>,

    /// Largest factor counted by Kasiski voting (2-40)
    #[arg(long)]
    pub factor_limit: Option<usize>,

    /// Pin the working key length instead of deriving it from evidence
    #[arg(short = 'k', long)]
    pub key_length: Option<usize>,

    /// Apply a key string across all columns (letters cycle)
    #[arg(long)]
    pub key: Option<String>,

    /// Override one column's shift: INDEX=SHIFT, INDEX=LETTER or INDEX=?
    #[arg(long = "shift", value_parser = parse_shift_override)]
    pub shifts: Vec<ShiftOverride>,

    /// Emit JSON instead of text tables
    #[arg(long)]
    pub json: bool,
}

impl AnalysisArgs {
    /// Resolves the effective configuration (file, then flags).
    pub fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => SessionConfig::default(),
        };

        if let Some(n) = self.ngram {
            config.ngram_length = n;
        }
        if let Some(mode) = self.mode {
            config.distance_mode = mode;
        }
        if let Some(max_key) = self.max_key {
            config.max_key_length = max_key;
        }
        if let Some(limit) = self.factor_limit {
            config.factor_limit = limit;
        }

        Ok(config.clamped())
    }

    /// Builds a session with pin, key string and shift overrides applied.
    pub fn build_session(&self, text: &str) -> Result<AnalysisSession> {
        let mut session = AnalysisSession::with_config(text, self.session_config()?);

        if let Some(k) = self.key_length {
            session.pin_key_length(k);
        }

        if let Some(key) = &self.key {
            if !session.apply_key_string(key) {
                tracing::warn!(key = %key, "key string has no letters, ignored");
            }
        }

        for shift in &self.shifts {
            let applied = match shift.value {
                Some(value) => session.set_shift(shift.index, value),
                None => session.clear_shift(shift.index),
            };
            if !applied {
                tracing::warn!(
                    index = shift.index,
                    key_length = session.working_key_length(),
                    "shift override outside the key, ignored"
                );
            }
        }

        Ok(session)
    }
}

/// One `--shift` override. `value: None` marks the column undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOverride {
    pub index: usize,
    pub value: Option<i64>,
}

/// Parses `INDEX=SHIFT`, `INDEX=LETTER` or `INDEX=?`.
pub fn parse_shift_override(s: &str) -> Result<ShiftOverride> {
    let Some((index, value)) = s.split_once('=') else {
        bail!("Expected INDEX=VALUE, got '{}'", s);
    };

    let index: usize = index
        .trim()
        .parse()
        .with_context(|| format!("Invalid column index in '{}'", s))?;

    let value = value.trim();
    let value = if value == "?" {
        None
    } else if let Ok(n) = value.parse::<i64>() {
        Some(n)
    } else {
        let mut chars = value.chars();
        match (chars.next().and_then(kasiski::letter_value), chars.next()) {
            (Some(v), None) => Some(v as i64),
            _ => bail!("Invalid shift in '{}': use a number, a letter or '?'", s),
        }
    };

    Ok(ShiftOverride { index, value })
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Renders a proportional bar for text charts.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "#".repeat(filled.min(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shift_override_number() {
        let o = parse_shift_override("2=7").unwrap();
        assert_eq!(o, ShiftOverride { index: 2, value: Some(7) });
    }

    #[test]
    fn test_parse_shift_override_letter() {
        let o = parse_shift_override("0=h").unwrap();
        assert_eq!(o.value, Some(7));
    }

    #[test]
    fn test_parse_shift_override_undetermined() {
        let o = parse_shift_override("3=?").unwrap();
        assert_eq!(o, ShiftOverride { index: 3, value: None });
    }

    #[test]
    fn test_parse_shift_override_negative_wraps_later() {
        assert_eq!(parse_shift_override("1=-1").unwrap().value, Some(-1));
    }

    #[test]
    fn test_parse_shift_override_rejects_garbage() {
        assert!(parse_shift_override("7").is_err());
        assert!(parse_shift_override("x=3").is_err());
        assert!(parse_shift_override("1=AB").is_err());
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(5.0, 10.0, 10), "#####");
        assert_eq!(bar(0.0, 10.0, 10), "");
        assert_eq!(bar(1.0, 0.0, 10), "");
    }

    #[test]
    fn test_build_session_applies_overrides() {
        let args = AnalysisArgs {
            config: None,
            ngram: Some(9),
            mode: Some(DistanceMode::Successive),
            max_key: None,
            factor_limit: None,
            key_length: Some(3),
            key: Some("abc".to_string()),
            shifts: vec![ShiftOverride { index: 1, value: None }],
            json: false,
        };

        let session = args.build_session("HELLO").unwrap();
        assert_eq!(session.config().ngram_length, 6);
        assert_eq!(session.config().distance_mode, DistanceMode::Successive);
        assert_eq!(session.key_string(), "A?C");
    }
}
