//! Languages command: list what the frequency data covers.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use word_rarity_core::{FrequencyOracle, LayeredOracle};

/// Arguments for the `languages` subcommand.
#[derive(Args, Debug, Default)]
pub struct LanguagesArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Source {
    /// Compiled-in wordfreq model.
    Bundled,
    /// Word list loaded from a configured file.
    List,
}

#[derive(Serialize)]
struct LanguageInfo {
    code: String,
    source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    words: Option<usize>,
}

fn collect(oracle: &LayeredOracle) -> Vec<LanguageInfo> {
    oracle
        .supported_languages()
        .into_iter()
        .map(|code| match oracle.lists().word_count(&code) {
            Some(words) => LanguageInfo {
                code,
                source: Source::List,
                words: Some(words),
            },
            None => LanguageInfo {
                code,
                source: Source::Bundled,
                words: None,
            },
        })
        .collect()
}

/// Print supported language codes and where their frequencies come from.
#[instrument(name = "cmd_languages", skip_all)]
pub fn cmd_languages(
    _args: LanguagesArgs,
    global_json: bool,
    oracle: &LayeredOracle,
) -> anyhow::Result<()> {
    let languages = collect(oracle);
    debug!(count = languages.len(), "executing languages command");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&languages)?);
    } else {
        for lang in &languages {
            let detail = match lang.words {
                Some(words) => format!("(list, {words} words)"),
                None => "(bundled)".to_string(),
            };
            println!("{}  {}", lang.code, detail.dimmed());
        }
    }
    Ok(())
}
