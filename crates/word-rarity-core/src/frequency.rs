//! Word frequency oracles.
//!
//! The scorer never looks at frequency data directly. It asks a
//! [`FrequencyOracle`] which languages exist and how popular a word is on the
//! Zipf scale (`log10` of occurrences per billion words, larger = more
//! common). Any dataset or service can stand behind the trait.
//!
//! [`BundledModels`] answers from the wordfreq models compiled into the
//! binary. [`FrequencyTable`] holds word lists loaded from disk:
//!
//! - `.json`: an object mapping words to values, `{"the": 7.73}`
//! - anything else: one `word<TAB|,|space>value` pair per line, `#` comments
//!
//! Values are read either as Zipf values or as raw counts, see
//! [`FrequencyFormat`]. [`LayeredOracle`] puts the loaded lists in front of
//! the bundled models.

use std::collections::{BTreeMap, HashMap};

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::{FrequencyError, FrequencyResult};
use crate::models::BundledModels;
use crate::tokenize;

/// Popularity reported for words the oracle has never seen.
pub const FLOOR_POPULARITY: f64 = 0.0;

/// A source of per-language word popularity.
///
/// Implementations must be deterministic for a fixed `(word, language)` pair.
pub trait FrequencyOracle: Send + Sync {
    /// Language codes this oracle can answer for, sorted.
    fn supported_languages(&self) -> Vec<String>;

    /// Whether `language` is one of [`supported_languages`](Self::supported_languages).
    fn is_supported(&self, language: &str) -> bool {
        self.supported_languages().iter().any(|l| l == language)
    }

    /// Zipf-scale popularity of `word` in `language`.
    ///
    /// Unknown words, the empty string, and unsupported languages report
    /// [`FLOOR_POPULARITY`].
    fn popularity(&self, word: &str, language: &str) -> f64;
}

/// How values in a frequency list are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FrequencyFormat {
    /// Values are already on the Zipf scale.
    #[default]
    Zipf,
    /// Values are raw occurrence counts from a corpus.
    Counts,
}

impl FrequencyFormat {
    /// Returns the format name as used in configuration files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zipf => "zipf",
            Self::Counts => "counts",
        }
    }
}

impl std::fmt::Display for FrequencyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a raw count to the Zipf scale given the corpus total.
///
/// Rounded to two decimals and floored at [`FLOOR_POPULARITY`].
pub fn counts_to_zipf(count: f64, total: f64) -> f64 {
    if count <= 0.0 || total <= 0.0 {
        return FLOOR_POPULARITY;
    }
    let zipf = (count / total).log10() + 9.0;
    ((zipf * 100.0).round() / 100.0).max(FLOOR_POPULARITY)
}

/// In-memory frequency oracle keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    languages: BTreeMap<String, HashMap<String, f64>>,
}

impl FrequencyTable {
    /// Create an empty table that supports no languages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add Zipf-scale entries for `language`, creating it if needed.
    ///
    /// Words are normalized the same way text is tokenized. When two entries
    /// normalize to the same word the more popular value is kept.
    pub fn insert_language<I, S>(&mut self, language: &str, entries: I) -> FrequencyResult<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        validate_language(language)?;
        let words = self.languages.entry(language.to_string()).or_default();
        for (word, zipf) in entries {
            merge_entry(words, &tokenize::normalize(word.as_ref()), zipf);
        }
        Ok(())
    }

    /// Builder-style variant of [`insert_language`](Self::insert_language).
    pub fn with_language<I, S>(mut self, language: &str, entries: I) -> FrequencyResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        self.insert_language(language, entries)?;
        Ok(self)
    }

    /// Load a frequency list from `path`, replacing any existing entries for
    /// `language`. Returns the number of distinct words loaded.
    #[tracing::instrument(skip(self, path), fields(path = %path))]
    pub fn load_file(
        &mut self,
        language: &str,
        path: &Utf8Path,
        format: FrequencyFormat,
    ) -> FrequencyResult<usize> {
        validate_language(language)?;
        let content =
            std::fs::read_to_string(path.as_std_path()).map_err(|e| FrequencyError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;

        let raw = if path.extension() == Some("json") {
            parse_json(&content, path)?
        } else {
            parse_lines(&content, path)?
        };

        let values = match format {
            FrequencyFormat::Zipf => raw,
            FrequencyFormat::Counts => {
                let total: f64 = raw.iter().map(|(_, count)| count).sum();
                raw.into_iter()
                    .map(|(word, count)| (word, counts_to_zipf(count, total)))
                    .collect()
            }
        };

        self.languages.remove(language);
        self.insert_language(language, values)?;
        let loaded = self.word_count(language).unwrap_or(0);
        tracing::info!(language, words = loaded, %format, "loaded frequency list");
        Ok(loaded)
    }

    /// Number of distinct words known for `language`.
    pub fn word_count(&self, language: &str) -> Option<usize> {
        self.languages.get(language).map(HashMap::len)
    }
}

impl FrequencyOracle for FrequencyTable {
    fn supported_languages(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }

    fn is_supported(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    fn popularity(&self, word: &str, language: &str) -> f64 {
        self.languages
            .get(language)
            .and_then(|words| words.get(tokenize::normalize(word).as_str()))
            .copied()
            .unwrap_or(FLOOR_POPULARITY)
    }
}

/// Loaded word lists layered over the bundled models.
///
/// A language with a loaded list is answered from that list alone; every
/// other language falls through to its bundled model.
#[derive(Debug, Default)]
pub struct LayeredOracle {
    lists: FrequencyTable,
    models: BundledModels,
}

impl LayeredOracle {
    /// Layer `lists` over `models`.
    pub const fn new(models: BundledModels, lists: FrequencyTable) -> Self {
        Self { lists, models }
    }

    /// Only the bundled models, no loaded lists.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// The lists loaded from disk.
    pub const fn lists(&self) -> &FrequencyTable {
        &self.lists
    }

    /// The compiled-in models.
    pub const fn models(&self) -> &BundledModels {
        &self.models
    }
}

impl FrequencyOracle for LayeredOracle {
    fn supported_languages(&self) -> Vec<String> {
        let mut languages = self.lists.supported_languages();
        languages.extend(self.models.supported_languages());
        languages.sort();
        languages.dedup();
        languages
    }

    fn is_supported(&self, language: &str) -> bool {
        self.lists.is_supported(language) || self.models.is_supported(language)
    }

    fn popularity(&self, word: &str, language: &str) -> f64 {
        if self.lists.is_supported(language) {
            self.lists.popularity(word, language)
        } else {
            self.models.popularity(word, language)
        }
    }
}

fn merge_entry(words: &mut HashMap<String, f64>, word: &str, zipf: f64) {
    if word.is_empty() {
        return;
    }
    words
        .entry(word.to_string())
        .and_modify(|existing| *existing = existing.max(zipf))
        .or_insert(zipf);
}

fn validate_language(language: &str) -> FrequencyResult<()> {
    let valid = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(FrequencyError::InvalidLanguage(language.to_string()))
    }
}

fn parse_json(content: &str, path: &Utf8Path) -> FrequencyResult<Vec<(String, f64)>> {
    let map: HashMap<String, f64> =
        serde_json::from_str(content).map_err(|e| FrequencyError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    let mut entries = Vec::with_capacity(map.len());
    for (word, value) in map {
        if !value.is_finite() || value < 0.0 {
            return Err(FrequencyError::Parse {
                path: path.to_path_buf(),
                line: 1,
                reason: format!("value for {word:?} must be a non-negative number"),
            });
        }
        entries.push((word, value));
    }
    Ok(entries)
}

fn parse_lines(content: &str, path: &Utf8Path) -> FrequencyResult<Vec<(String, f64)>> {
    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_error = |reason: String| FrequencyError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        };

        let Some((word, value)) = line
            .rsplit_once(['\t', ','])
            .or_else(|| line.rsplit_once(char::is_whitespace))
        else {
            return Err(parse_error(format!("expected `word value`, got {line:?}")));
        };

        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("invalid number {:?}", value.trim())))?;
        if !value.is_finite() || value < 0.0 {
            return Err(parse_error(format!("value {value} must be non-negative")));
        }
        entries.push((word.trim().to_string(), value));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn fixture() -> FrequencyTable {
        FrequencyTable::new()
            .with_language("en", [("the", 7.73), ("fox", 4.5)])
            .unwrap()
            .with_language("fr", [("\u{e9}cole", 5.2)])
            .unwrap()
    }

    #[test]
    fn empty_table_supports_nothing() {
        let table = FrequencyTable::new();
        assert!(table.supported_languages().is_empty());
        assert!(!table.is_supported("en"));
    }

    #[test]
    fn table_lists_inserted_languages() {
        let table = fixture();
        assert_eq!(table.supported_languages(), vec!["en", "fr"]);
        assert!(table.is_supported("en"));
        assert!(!table.is_supported("not-a-real-code"));
    }

    #[test]
    fn popularity_lookup_is_case_and_form_insensitive() {
        let table = fixture();
        assert_eq!(table.popularity("the", "en"), 7.73);
        assert_eq!(table.popularity("THE", "en"), 7.73);
        assert_eq!(
            table.popularity("e\u{301}cole", "fr"),
            table.popularity("\u{e9}cole", "fr")
        );
    }

    #[test]
    fn unknown_words_report_floor() {
        let table = fixture();
        assert_eq!(table.popularity("zzyzzyx", "en"), FLOOR_POPULARITY);
        assert_eq!(table.popularity("", "en"), FLOOR_POPULARITY);
        assert_eq!(table.popularity("the", "xx"), FLOOR_POPULARITY);
    }

    #[test]
    fn insert_keeps_most_popular_duplicate() {
        let table = FrequencyTable::new()
            .with_language("en", [("Word", 3.0), ("word", 4.5), ("WORD", 1.0)])
            .unwrap();
        assert_eq!(table.word_count("en"), Some(1));
        assert_eq!(table.popularity("word", "en"), 4.5);
    }

    #[test]
    fn invalid_language_codes_rejected() {
        let mut table = FrequencyTable::new();
        assert!(table.insert_language("", [("a", 1.0)]).is_err());
        assert!(table.insert_language("en us", [("a", 1.0)]).is_err());
        assert!(table.insert_language("pt-BR", [("a", 1.0)]).is_ok());
    }

    #[test]
    fn counts_convert_to_zipf() {
        // one in a million words = 3.0 on the Zipf scale
        assert_eq!(counts_to_zipf(1.0, 1_000_000.0), 3.0);
        assert_eq!(counts_to_zipf(1.0, 1_000_000_000.0), 0.0);
        assert_eq!(counts_to_zipf(0.0, 10.0), 0.0);
        // below the noise floor clamps to zero
        assert_eq!(counts_to_zipf(1.0, 1e12), 0.0);
    }

    #[test]
    fn load_tsv_zipf_list() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "en.tsv",
            "# word\tzipf\nthe\t7.73\nQuixotic\t2.2\n\nfox\t4.5\n",
        );

        let mut table = FrequencyTable::new()
            .with_language("en", [("dog", 5.0)])
            .unwrap();
        let loaded = table.load_file("en", &path, FrequencyFormat::Zipf).unwrap();

        assert_eq!(loaded, 3);
        assert_eq!(table.popularity("quixotic", "en"), 2.2);
        // replaced, not merged with the earlier entries
        assert_eq!(table.popularity("dog", "en"), FLOOR_POPULARITY);
    }

    #[test]
    fn load_csv_and_whitespace_lists() {
        let tmp = TempDir::new().unwrap();
        let csv = write(&tmp, "it.csv", "ciao,5.1\ngatto,4.4\n");
        let spaced = write(&tmp, "pt.txt", "olá 5.2\ngato   4.3\n");

        let mut table = FrequencyTable::new();
        table.load_file("it", &csv, FrequencyFormat::Zipf).unwrap();
        table.load_file("pt", &spaced, FrequencyFormat::Zipf).unwrap();

        assert_eq!(table.supported_languages(), vec!["it", "pt"]);
        assert_eq!(table.popularity("gatto", "it"), 4.4);
        assert_eq!(table.popularity("gato", "pt"), 4.3);
    }

    #[test]
    fn load_json_counts_list() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "xx.json", r#"{"common": 999000, "rare": 1000}"#);

        let mut table = FrequencyTable::new();
        table.load_file("xx", &path, FrequencyFormat::Counts).unwrap();

        assert_eq!(table.popularity("common", "xx"), 9.0);
        assert_eq!(table.popularity("rare", "xx"), 6.0);
    }

    #[test]
    fn malformed_line_reports_location() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "bad.tsv", "good\t3.0\nbad\tlots\n");

        let err = FrequencyTable::new()
            .load_file("en", &path, FrequencyFormat::Zipf)
            .unwrap_err();

        assert!(matches!(err, FrequencyError::Parse { line: 2, .. }));
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn negative_values_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "neg.tsv", "word\t-1\n");
        assert!(
            FrequencyTable::new()
                .load_file("en", &path, FrequencyFormat::Zipf)
                .is_err()
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = FrequencyTable::new()
            .load_file(
                "en",
                Utf8Path::new("/nonexistent/list.tsv"),
                FrequencyFormat::Zipf,
            )
            .unwrap_err();
        assert!(matches!(err, FrequencyError::Read { .. }));
    }

    #[test]
    fn layered_lists_shadow_models_per_language() {
        let lists = FrequencyTable::new()
            .with_language("xx", [("blorp", 6.0)])
            .unwrap();
        let oracle = LayeredOracle::new(BundledModels::new(), lists);

        assert!(oracle.is_supported("xx"));
        assert_eq!(oracle.popularity("blorp", "xx"), 6.0);
        assert_eq!(oracle.popularity("other", "xx"), FLOOR_POPULARITY);

        let languages = oracle.supported_languages();
        assert!(languages.windows(2).all(|w| w[0] < w[1]));
        assert!(languages.iter().any(|l| l == "xx"));
    }

    #[cfg(feature = "lang-en")]
    #[test]
    fn layered_falls_back_to_bundled_model() {
        let lists = FrequencyTable::new()
            .with_language("xx", [("blorp", 6.0)])
            .unwrap();
        let oracle = LayeredOracle::new(BundledModels::new(), lists);
        assert!(oracle.popularity("the", "en") > 7.0);

        let shadowed = FrequencyTable::new()
            .with_language("en", [("blorp", 6.0)])
            .unwrap();
        let oracle = LayeredOracle::new(BundledModels::new(), shadowed);
        assert_eq!(oracle.popularity("the", "en"), FLOOR_POPULARITY);
        assert_eq!(
            oracle.supported_languages().iter().filter(|l| *l == "en").count(),
            1
        );
    }

    #[test]
    fn format_names() {
        assert_eq!(FrequencyFormat::Zipf.as_str(), "zipf");
        assert_eq!(FrequencyFormat::Counts.to_string(), "counts");
        assert_eq!(FrequencyFormat::default(), FrequencyFormat::Zipf);
    }
}
