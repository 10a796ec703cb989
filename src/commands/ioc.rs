//! IoC command - Index of Coincidence sweep over candidate key lengths.

use anyhow::Result;
use clap::Args;

use super::{bar, print_json, AnalysisArgs, CommandExecutor, InputArgs};

/// Print the mean column Index of Coincidence for every key length.
///
/// English text scores about 0.066 and random letters about 0.038. Peaks
/// at a key length and its multiples point at the true key length.
#[derive(Args, Debug)]
pub struct IocCommand {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl CommandExecutor for IocCommand {
    fn execute(&self) -> Result<()> {
        let text = self.input.read()?;
        let session = self.analysis.build_session(&text)?;
        let sweep = session.ioc_sweep();

        if self.analysis.json {
            return print_json(&sweep);
        }

        let max = sweep.iter().map(|s| s.mean_ioc).fold(0.0, f64::max);
        println!("Letters: {}", session.stream().len());
        for sample in &sweep {
            println!(
                "k={:<3} {:.5}  {}",
                sample.key_length,
                sample.mean_ioc,
                bar(sample.mean_ioc, max, 40)
            );
        }

        Ok(())
    }
}
