//! Error types for word-rarity-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while scoring words or analyzing text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RarityError {
    /// The language code is not known to the frequency oracle.
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage {
        /// The language code that was requested.
        language: String,
    },

    /// The input text has more characters than allowed.
    #[error("Input text is too long. Maximum allowed length is {max_length} characters.")]
    InputTooLong {
        /// The configured character limit.
        max_length: usize,
        /// The character count of the rejected input.
        length: usize,
    },
}

/// Result type alias using [`RarityError`].
pub type RarityResult<T> = Result<T, RarityError>;

/// Errors that can occur while loading a frequency list.
#[derive(Error, Debug)]
pub enum FrequencyError {
    /// The frequency list file could not be read.
    #[error("failed to read frequency list {path}")]
    Read {
        /// Path of the file that failed to load.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON frequency list was not an object of numbers.
    #[error("invalid JSON frequency list {path}")]
    Json {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A line in a text frequency list could not be parsed.
    #[error("{path}:{line}: {reason}")]
    Parse {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The language code used to register a list is empty or malformed.
    #[error("invalid language code: {0:?}")]
    InvalidLanguage(String),
}

/// Result type alias using [`FrequencyError`].
pub type FrequencyResult<T> = Result<T, FrequencyError>;
