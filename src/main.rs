//! Kasiski - evidence for breaking Vigenère-family ciphers by hand
//!
//! A CLI over the analysis engine. Each subcommand prints one view of the
//! evidence; key decisions are made by the analyst through --key-length,
//! --key and --shift.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{
    AnalyzeCommand, ChiCommand, CommandExecutor, ConfigCommand, DecodeCommand, EncipherCommand,
    IocCommand, KasiskiCommand,
};

/// Kasiski - evidence for breaking Vigenère-family ciphers by hand
///
/// Computes Index of Coincidence sweeps, Kasiski factor votes and per-column
/// chi-square scores, and previews partial decryptions. Nothing is solved
/// automatically.
#[derive(Parser)]
#[command(name = "kasiski")]
#[command(version)]
#[command(about = "Evidence engine for breaking Vigenère-family ciphers by hand")]
#[command(long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full evidence report: IoC, repeats, votes, columns, key and preview
    Analyze(AnalyzeCommand),

    /// Index of Coincidence sweep over candidate key lengths
    Ioc(IocCommand),

    /// Repeated n-grams, distances and factor votes
    Kasiski(KasiskiCommand),

    /// Chi-square profile of one column
    Chi(ChiCommand),

    /// Partial decode with the known part of the key
    Decode(DecodeCommand),

    /// Encipher plaintext with a Vigenère key
    Encipher(EncipherCommand),

    /// Print the effective configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Initialize logging based on verbosity level.
    fn init_logging(&self) {
        use tracing_subscriber::{fmt, EnvFilter};

        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    match &cli.command {
        Commands::Analyze(cmd) => cmd.execute(),
        Commands::Ioc(cmd) => cmd.execute(),
        Commands::Kasiski(cmd) => cmd.execute(),
        Commands::Chi(cmd) => cmd.execute(),
        Commands::Decode(cmd) => cmd.execute(),
        Commands::Encipher(cmd) => cmd.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}
