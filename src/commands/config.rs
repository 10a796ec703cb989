//! Config command - print the effective analysis configuration.

use anyhow::{Context, Result};
use clap::Args;

use super::{AnalysisArgs, CommandExecutor};

/// Print the effective configuration as TOML.
///
/// Useful as a starting point for a --config file.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl CommandExecutor for ConfigCommand {
    fn execute(&self) -> Result<()> {
        let config = self.analysis.session_config()?;

        if self.analysis.json {
            return super::print_json(&config);
        }

        let toml = config.to_toml().context("Failed to render config")?;
        print!("{}", toml);
        Ok(())
    }
}
