//! Analyze command: rank the words of a text by rarity.

use std::fmt::Write as _;

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use word_rarity_core::{Config, FrequencyOracle, RarityReport, analyze_rarity, markdown};

use super::{read_input_file, read_input_stream};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// File to analyze. Reads stdin when omitted or `-`.
    pub file: Option<Utf8PathBuf>,

    /// Language code of the text (e.g. en, fr).
    #[arg(short, long)]
    pub language: Option<String>,

    /// Maximum accepted text length in characters.
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Accept text of any length.
    #[arg(long, conflicts_with = "max_length")]
    pub no_length_limit: bool,

    /// Only list the N rarest words (the average still covers all words).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Fail when the average rarity is above this value.
    #[arg(long)]
    pub max_average: Option<f64>,

    /// Treat the input as markdown (implied for `.md` files).
    #[arg(long)]
    pub markdown: bool,
}

impl AnalyzeArgs {
    fn stdin_requested(&self) -> bool {
        self.file.as_ref().is_none_or(|f| f.as_str() == "-")
    }

    fn source_label(&self) -> String {
        match self.file {
            Some(ref f) if f.as_str() != "-" => f.to_string(),
            _ => "<stdin>".to_string(),
        }
    }
}

/// Analyze a file or stdin and print the rarity report.
#[instrument(name = "cmd_analyze", skip_all, fields(source = %args.source_label()))]
pub fn cmd_analyze<O: FrequencyOracle + ?Sized>(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    oracle: &O,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(language = ?args.language, top = ?args.top, "executing analyze command");

    let content = match args.file {
        Some(ref path) if !args.stdin_requested() => read_input_file(path, max_input_bytes)?,
        _ => read_input_stream(std::io::stdin().lock(), max_input_bytes)?,
    };

    if content.trim().is_empty() {
        bail!("Empty input");
    }

    let is_markdown =
        args.markdown || args.file.as_ref().is_some_and(|f| f.extension() == Some("md"));
    let text = if is_markdown {
        markdown::visible_text(&content)
    } else {
        content
    };

    let language = args.language.as_deref().unwrap_or_else(|| config.language());
    let max_length = if args.no_length_limit {
        usize::MAX
    } else {
        args.max_length.unwrap_or_else(|| config.max_length())
    };
    let top = args.top.or(config.top);
    let max_average = args.max_average.or(config.max_average);

    let mut report = analyze_rarity(oracle, &text, language, max_length)?;

    if global_json {
        if let Some(n) = top {
            report.words.truncate(n);
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report, top));
    }

    if let Some(max) = max_average {
        if report.average > max {
            bail!(
                "{} has average rarity {:.2} (max: {:.2}). Prefer more common words.",
                args.source_label(),
                report.average,
                max,
            );
        }
        if !global_json {
            println!(
                "\n{} {} averages {:.2} (max: {:.2})",
                "PASS:".green(),
                args.source_label(),
                report.average,
                max,
            );
        }
    }

    Ok(())
}

/// Render a report in the plain-text results layout.
pub fn format_report(report: &RarityReport, top: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rarity Analysis Results:");
    let _ = writeln!(out, "Average Rarity Score: {:.2}", report.average);
    let _ = writeln!(out);
    let _ = writeln!(out, "Individual Word Scores:");

    let shown = top.unwrap_or(report.words.len()).min(report.words.len());
    for entry in &report.words[..shown] {
        let _ = writeln!(out, "Word: {} | Rarity Score: {:.2}", entry.word, entry.score);
    }
    if shown < report.words.len() {
        let _ = writeln!(out, "... {} more", report.words.len() - shown);
    }
    out
}
