//! Core library for word-rarity.
//!
//! Scores how uncommon the words of a text are, on a 0 (very common) to 8
//! (very rare) scale derived from Zipf word frequencies.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`frequency`] - Frequency oracle trait, loaded word lists, layering
//! - [`models`] - wordfreq models compiled in through `lang-*` features
//! - [`tokenize`] - Normalization and candidate word extraction
//! - [`rarity`] - Word scoring and text aggregation
//! - [`markdown`] - Visible-text extraction for markdown input
//!
//! # Quick Start
//!
//! [`LayeredOracle::bundled`] scores against the compiled-in models. Any
//! [`FrequencyOracle`] works, including a hand-built table:
//!
//! ```
//! use word_rarity_core::{FrequencyTable, analyze_rarity, DEFAULT_MAX_LENGTH};
//!
//! let table = FrequencyTable::new()
//!     .with_language("en", [("the", 7.73), ("fox", 4.5), ("quixotic", 2.2)])
//!     .expect("valid language code");
//! let report = analyze_rarity(&table, "The quixotic fox", "en", DEFAULT_MAX_LENGTH)
//!     .expect("english is loaded");
//!
//! assert_eq!(report.words[0].word, "quixotic");
//! println!("average rarity: {:.2}", report.average);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod frequency;
pub mod markdown;
pub mod models;
pub mod rarity;
pub mod tokenize;

pub use config::{Config, ConfigLoader, ConfigSources, FrequencyListEntry, LogLevel};
pub use error::{
    ConfigError, ConfigResult, FrequencyError, FrequencyResult, RarityError, RarityResult,
};
pub use frequency::{FrequencyFormat, FrequencyOracle, FrequencyTable, LayeredOracle};
pub use models::{BUNDLED_LANGUAGES, BundledModels};
pub use rarity::{
    DEFAULT_LANGUAGE, DEFAULT_MAX_LENGTH, MAX_RARITY, MIN_RARITY, RarityReport, WordScore,
    analyze_rarity, word_rarity,
};

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
