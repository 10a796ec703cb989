//! Encipher command - produce Vigenère ciphertext for practice and testing.

use anyhow::{bail, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use kasiski::{encipher, random_key};

use super::{CommandExecutor, InputArgs};

/// Encipher plaintext with a Vigenère key.
///
/// Give a key with --key, or let one be drawn with --random-key LEN
/// (reproducible with --seed). Punctuation and spacing are kept.
#[derive(Args, Debug)]
pub struct EncipherCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Key letters (non-letters ignored)
    #[arg(long, conflicts_with = "random_key")]
    pub key: Option<String>,

    /// Draw a random key of this length (1-40)
    #[arg(long, conflicts_with = "key", value_parser = clap::value_parser!(u8).range(1..=40))]
    pub random_key: Option<u8>,

    /// Seed for --random-key
    #[arg(long, requires = "random_key")]
    pub seed: Option<u64>,
}

impl CommandExecutor for EncipherCommand {
    fn execute(&self) -> Result<()> {
        let key = match (&self.key, self.random_key) {
            (Some(key), _) => key.clone(),
            (None, Some(len)) => {
                let mut rng = match self.seed {
                    Some(seed) => ChaCha20Rng::seed_from_u64(seed),
                    None => ChaCha20Rng::from_entropy(),
                };
                let key = random_key(len as usize, &mut rng);
                eprintln!("Key: {}", key);
                key
            }
            (None, None) => bail!("Provide --key or --random-key"),
        };

        if !key.chars().any(|c| c.is_ascii_alphabetic()) {
            bail!("Key must contain at least one letter");
        }

        let text = self.input.read()?;
        print!("{}", encipher(&text, &key));
        if !text.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
