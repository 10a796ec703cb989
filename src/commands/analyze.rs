//! Analyze command - full evidence report for a ciphertext.

use anyhow::Result;
use clap::Args;

use kasiski::{AnalysisReport, ShiftSlot};

use super::{bar, print_json, AnalysisArgs, CommandExecutor, InputArgs};

/// Show every piece of evidence at once.
///
/// Prints the IoC sweep, the top repeats and factor votes, a per-column
/// chi-square summary at the working key length, the current key and the
/// partial decode. Nothing is solved automatically: the best shifts shown
/// per column are suggestions until committed with --key or --shift.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Highlight the positions of one repeated gram
    #[arg(long)]
    pub gram: Option<String>,

    /// Column whose chi-square profile is reported
    #[arg(short, long, default_value = "0")]
    pub column: usize,

    /// Number of repeats to list
    #[arg(long, default_value = "10")]
    pub top: usize,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self) -> Result<()> {
        let text = self.input.read()?;
        let mut session = self.analysis.build_session(&text)?;
        session.select_gram(self.gram.as_deref());
        session.select_column(self.column);

        let report = session.report();

        if self.analysis.json {
            return print_json(&report);
        }

        self.print_report(&report);
        Ok(())
    }
}

impl AnalyzeCommand {
    fn print_report(&self, report: &AnalysisReport) {
        println!("Letters: {}", report.stream_length);
        println!(
            "Config:  n-gram {}, {} distances, max key {}, factor limit {}",
            report.config.ngram_length,
            report.config.distance_mode,
            report.config.max_key_length,
            report.config.factor_limit
        );
        println!();

        println!("Index of Coincidence");
        let max_ioc = report.ioc_sweep.iter().map(|s| s.mean_ioc).fold(0.0, f64::max);
        for sample in &report.ioc_sweep {
            println!(
                "  k={:<3} {:.5}  {}",
                sample.key_length,
                sample.mean_ioc,
                bar(sample.mean_ioc, max_ioc, 30)
            );
        }
        println!();

        println!("Repeats (top {} of {})", self.top.min(report.repeats.len()), report.repeats.len());
        for entry in report.repeats.iter().take(self.top) {
            println!(
                "  {:<6} x{:<3} at {:?}  distances {:?}",
                entry.gram,
                entry.positions.len(),
                entry.positions,
                entry.distances
            );
        }
        if let Some(gram) = &report.selected_gram {
            println!("  highlight {}: {:?}", gram, report.highlighted_positions);
        }
        println!();

        println!("Factor votes");
        let max_votes = report.factor_votes.iter().map(|v| v.votes).max().unwrap_or(0);
        for vote in &report.factor_votes {
            println!(
                "  k={:<3} {:>5}  {}",
                vote.key_length,
                vote.votes,
                bar(vote.votes as f64, max_votes as f64, 30)
            );
        }
        if report.factor_votes.is_empty() {
            println!("  (no repeats)");
        }
        println!();

        println!(
            "Working key length: {} ({:?})",
            report.key_length.key_length, report.key_length.source
        );
        println!("  col  len   IoC      best  chi       key");
        for column in &report.columns {
            let key = match column.slot {
                ShiftSlot::Determined(s) => kasiski::letter_for(s),
                ShiftSlot::Undetermined => kasiski::PLACEHOLDER,
            };
            println!(
                "  {:<4} {:<5} {:.5}  {}     {:<9.2} {}",
                column.index,
                column.length,
                column.ioc,
                kasiski::letter_for(column.best_shift),
                column.best_score,
                key
            );
        }
        println!();

        println!("Chi-square, column {}", report.active_column);
        for (shift, score) in report.chi_profile.ranked().into_iter().take(5) {
            println!("  {} (shift {:>2})  {:.2}", kasiski::letter_for(shift), shift, score);
        }
        println!();

        println!("Key:     {}", report.key);
        println!("Preview: {}", report.preview);
    }
}
