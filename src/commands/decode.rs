//! Decode command - partial plaintext preview.

use anyhow::Result;
use clap::Args;

use super::{AnalysisArgs, CommandExecutor, InputArgs};

/// Decode with whatever part of the key is known.
///
/// Non-letters are kept as they are. Letters whose column has no shift yet
/// print as '?'. Combine --key, --shift and --key-length to fill in the key.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let text = self.input.read()?;
        let session = self.analysis.build_session(&text)?;

        if self.analysis.json {
            return super::print_json(&serde_json::json!({
                "key_length": session.working_key_length(),
                "key": session.key_string(),
                "preview": session.decode_preview(),
            }));
        }

        eprintln!("Key: {} (length {})", session.key_string(), session.working_key_length());
        println!("{}", session.decode_preview());
        Ok(())
    }
}
