//! Kasiski command - repeated n-grams and factor votes.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use kasiski::{RepeatEntry, VoteCount};

use super::{bar, print_json, AnalysisArgs, CommandExecutor, InputArgs};

/// List repeated n-grams, their distances, and the factor votes they cast.
///
/// Votes are unweighted: every distance votes once for each of its factors
/// up to --factor-limit. In pairwise mode a gram seen m times produces
/// m(m-1)/2 distances, so frequent repeats dominate the chart.
#[derive(Args, Debug)]
pub struct KasiskiCommand {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Show the positions of one gram only
    #[arg(long)]
    pub gram: Option<String>,
}

#[derive(Serialize)]
struct KasiskiOutput {
    repeats: Vec<RepeatEntry>,
    votes: Vec<VoteCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlighted: Option<Vec<usize>>,
}

impl CommandExecutor for KasiskiCommand {
    fn execute(&self) -> Result<()> {
        let text = self.input.read()?;
        let mut session = self.analysis.build_session(&text)?;
        session.select_gram(self.gram.as_deref());

        let output = KasiskiOutput {
            repeats: session.repeat_table(),
            votes: session
                .kasiski_votes()
                .ranked()
                .into_iter()
                .map(|(key_length, votes)| VoteCount { key_length, votes })
                .collect(),
            highlighted: self.gram.as_ref().map(|_| session.highlighted_positions()),
        };

        if self.analysis.json {
            return print_json(&output);
        }

        if output.repeats.is_empty() {
            println!("No repeated {}-grams.", session.config().ngram_length);
            return Ok(());
        }

        println!("Repeats ({} distances)", session.config().distance_mode);
        for entry in &output.repeats {
            println!(
                "  {:<6} x{:<3} at {:?}  distances {:?}",
                entry.gram,
                entry.positions.len(),
                entry.positions,
                entry.distances
            );
        }

        if let (Some(gram), Some(positions)) = (session.selected_gram(), &output.highlighted) {
            println!();
            println!("Highlight {}: {:?}", gram, positions);
        }

        println!();
        println!("Factor votes (by votes)");
        let max = output.votes.first().map(|v| v.votes).unwrap_or(0);
        for vote in &output.votes {
            println!(
                "  k={:<3} {:>5}  {}",
                vote.key_length,
                vote.votes,
                bar(vote.votes as f64, max as f64, 40)
            );
        }

        Ok(())
    }
}
