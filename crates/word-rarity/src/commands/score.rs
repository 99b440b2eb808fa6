//! Score command: rarity of individual words.

use clap::Args;
use tracing::{debug, instrument};

use word_rarity_core::{Config, FrequencyOracle, WordScore, word_rarity};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Words to score.
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,

    /// Language code of the words (e.g. en, fr).
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Score each word independently, in the order given.
#[instrument(name = "cmd_score", skip_all, fields(count = args.words.len()))]
pub fn cmd_score<O: FrequencyOracle + ?Sized>(
    args: ScoreArgs,
    global_json: bool,
    config: &Config,
    oracle: &O,
) -> anyhow::Result<()> {
    let language = args.language.as_deref().unwrap_or_else(|| config.language());
    debug!(language, "executing score command");

    let scores = score_words(oracle, &args.words, language)?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        for entry in &scores {
            println!("Word: {} | Rarity Score: {:.2}", entry.word, entry.score);
        }
    }

    Ok(())
}

fn score_words<O: FrequencyOracle + ?Sized>(
    oracle: &O,
    words: &[String],
    language: &str,
) -> anyhow::Result<Vec<WordScore>> {
    words
        .iter()
        .map(|word| -> anyhow::Result<WordScore> {
            let score = word_rarity(oracle, word, language)?;
            Ok(WordScore {
                word: word.clone(),
                score,
            })
        })
        .collect()
}
