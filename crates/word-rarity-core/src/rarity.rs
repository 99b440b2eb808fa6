//! Word rarity scoring.
//!
//! Rarity is inverted Zipf popularity: `8 - popularity`, clamped to
//! `[0, 8]`. A score of 0 means the word is about as common as words get;
//! 8 means the frequency oracle has never seen it, or it could not be scored
//! (pure digits, implausibly long tokens).
//!
//! [`word_rarity`] scores one word. [`analyze_rarity`] tokenizes a whole
//! text, scores each distinct word once, and ranks them from rarest to most
//! common with an average over the text.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{RarityError, RarityResult};
use crate::frequency::FrequencyOracle;
use crate::tokenize;

/// Score for the most common words.
pub const MIN_RARITY: f64 = 0.0;

/// Score for unknown or unscoreable words.
pub const MAX_RARITY: f64 = 8.0;

/// Words longer than this many characters are scored [`MAX_RARITY`] unseen.
pub const MAX_WORD_CHARS: usize = 50;

/// Language used when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default cap on the character length of analyzed text.
pub const DEFAULT_MAX_LENGTH: usize = 100_000;

/// Unicode decimal digits only.
static DIGITS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// A scored word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordScore {
    /// The normalized, lowercased word.
    pub word: String,
    /// Rarity in `[0, 8]`; higher is rarer.
    pub score: f64,
}

/// Result of analyzing the rarity of a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RarityReport {
    /// Language the words were scored against.
    pub language: String,
    /// Distinct words, rarest first, ties in ascending word order.
    pub words: Vec<WordScore>,
    /// Mean score of all words; 0 when no words were found.
    pub average: f64,
}

impl RarityReport {
    /// Number of distinct words scored.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the text contained no scoreable words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Split into `(word, score)` pairs and the average.
    pub fn into_parts(self) -> (Vec<(String, f64)>, f64) {
        let pairs = self.words.into_iter().map(|w| (w.word, w.score)).collect();
        (pairs, self.average)
    }
}

/// Score how rare a single word is in `language`.
///
/// # Errors
///
/// Returns [`RarityError::UnsupportedLanguage`] if the oracle does not know
/// `language`. This is checked before anything else, including for the empty
/// word.
pub fn word_rarity<O>(oracle: &O, word: &str, language: &str) -> RarityResult<f64>
where
    O: FrequencyOracle + ?Sized,
{
    ensure_supported(oracle, language)?;
    Ok(score_word(oracle, word, language))
}

/// Rank the distinct words of `text` by rarity.
///
/// # Arguments
///
/// * `oracle`: Frequency source to score against.
/// * `text`: The text to analyze.
/// * `language`: Language code, fixed for the whole text.
/// * `max_length`: Maximum number of characters accepted.
///
/// # Errors
///
/// [`RarityError::UnsupportedLanguage`] for an unknown language and
/// [`RarityError::InputTooLong`] when `text` has more than `max_length`
/// characters. Both are checked before any text processing.
#[tracing::instrument(skip(oracle, text), fields(text_len = text.len()))]
pub fn analyze_rarity<O>(
    oracle: &O,
    text: &str,
    language: &str,
    max_length: usize,
) -> RarityResult<RarityReport>
where
    O: FrequencyOracle + ?Sized,
{
    ensure_supported(oracle, language)?;

    let length = text.chars().count();
    if length > max_length {
        return Err(RarityError::InputTooLong { max_length, length });
    }

    let mut words: Vec<WordScore> = tokenize::candidates(text)
        .into_iter()
        .map(|word| {
            let score = score_word(oracle, &word, language);
            WordScore { word, score }
        })
        .collect();

    words.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.word.cmp(&b.word))
    });

    let average = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.score).sum::<f64>() / words.len() as f64
    };

    tracing::debug!(words = words.len(), average, "rarity analysis complete");

    Ok(RarityReport {
        language: language.to_string(),
        words,
        average,
    })
}

fn ensure_supported<O>(oracle: &O, language: &str) -> RarityResult<()>
where
    O: FrequencyOracle + ?Sized,
{
    if oracle.is_supported(language) {
        Ok(())
    } else {
        Err(RarityError::UnsupportedLanguage {
            language: language.to_string(),
        })
    }
}

fn score_word<O>(oracle: &O, word: &str, language: &str) -> f64
where
    O: FrequencyOracle + ?Sized,
{
    let word: String = word.nfkc().collect();

    if DIGITS_PATTERN.is_match(&word) {
        return MAX_RARITY;
    }
    if word.chars().count() > MAX_WORD_CHARS {
        return MAX_RARITY;
    }

    let popularity = oracle.popularity(&word, language);
    if popularity.is_nan() {
        return MAX_RARITY;
    }
    (MAX_RARITY - popularity).clamp(MIN_RARITY, MAX_RARITY)
}
