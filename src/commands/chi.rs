//! Chi command - chi-square profile of one column.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use kasiski::{letter_for, ChiProfile};

use super::{print_json, AnalysisArgs, CommandExecutor, InputArgs};

/// Score all 26 shifts of one column against English letter frequencies.
///
/// Lower is better. Use --commit to write the best shift into the key and
/// print the resulting key and preview.
#[derive(Args, Debug)]
pub struct ChiCommand {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Column index at the working key length
    #[arg(short, long, default_value = "0")]
    pub column: usize,

    /// Commit the best-fit shift for this column
    #[arg(long)]
    pub commit: bool,
}

#[derive(Serialize)]
struct ChiOutput {
    key_length: usize,
    column: usize,
    letters: String,
    profile: ChiProfile,
    best_shift: u8,
    key: String,
    preview: String,
}

impl CommandExecutor for ChiCommand {
    fn execute(&self) -> Result<()> {
        let text = self.input.read()?;
        let mut session = self.analysis.build_session(&text)?;
        let column = session.select_column(self.column);

        if self.commit && session.commit_best_shift().is_none() {
            tracing::warn!(column, "column is empty, nothing committed");
        }

        let output = ChiOutput {
            key_length: session.working_key_length(),
            column,
            letters: session.columns().get(column).cloned().unwrap_or_default(),
            profile: session.chi_profile(),
            best_shift: session.best_shift(),
            key: session.key_string(),
            preview: session.decode_preview(),
        };

        if self.analysis.json {
            return print_json(&output);
        }

        println!(
            "Column {} of {} ({} letters)",
            output.column,
            output.key_length,
            output.letters.len()
        );
        println!("  shift  key  chi");
        for (shift, score) in output.profile.scores.iter().enumerate() {
            let marker = if shift as u8 == output.best_shift { " <- best" } else { "" };
            println!("  {:>5}  {}    {:<10.2}{}", shift, letter_for(shift as u8), score, marker);
        }

        if self.commit {
            println!();
            println!("Key:     {}", output.key);
            println!("Preview: {}", output.preview);
        }

        Ok(())
    }
}
