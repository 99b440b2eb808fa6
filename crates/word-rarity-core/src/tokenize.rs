//! Text normalization and word extraction.
//!
//! Turns raw text into the distinct lowercase alphabetic words that get
//! scored. Text is NFKC-normalized and lowercased first so that visually
//! equivalent spellings (precomposed vs. combining marks, ligatures,
//! full-width forms) collapse to the same candidate.
//!
//! A candidate is a run of letters (and their combining marks) bounded by
//! word boundaries. Letters glued to any other word character, such as a
//! digit, an underscore, connector punctuation (`‿`), or a zero-width joiner,
//! have no boundary at the junction, so the whole run is dropped rather than
//! trimmed to its letters.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Letters and marks only, bounded on both sides by a word boundary.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\p{L}\p{M}]+\b").expect("valid regex"));

/// NFKC-normalize and lowercase text.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Extract the distinct word candidates of `text`.
///
/// Returns an empty set for empty, whitespace-only, numeric, or
/// punctuation-only input.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn candidates(text: &str) -> BTreeSet<String> {
    let normalized = normalize(text);
    let words: BTreeSet<String> = WORD_PATTERN
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect();
    tracing::debug!(candidates = words.len(), "extracted word candidates");
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        candidates(text).into_iter().collect()
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            words("Hello, World! This is a Test."),
            vec!["a", "hello", "is", "test", "this", "world"]
        );
    }

    #[test]
    fn deduplicates_repeated_words() {
        let set = candidates("Repeated words: the the the a a an an");
        assert_eq!(set.len(), 5);
        for w in ["repeated", "words", "the", "a", "an"] {
            assert!(set.contains(w), "missing {w}");
        }
    }

    #[test]
    fn case_variants_collapse() {
        assert_eq!(words("The THE the tHe"), vec!["the"]);
    }

    #[test]
    fn digits_and_symbols_are_dropped() {
        assert_eq!(
            words("Hello, World! 123 Test. @#$%^&*"),
            vec!["hello", "test", "world"]
        );
        assert!(candidates("123 !@# 456").is_empty());
    }

    #[test]
    fn alphanumeric_runs_are_excluded() {
        assert!(candidates("word123").is_empty());
        assert!(candidates("123abc").is_empty());
        assert!(candidates("snake_case").is_empty());
        assert_eq!(words("word123 plain"), vec!["plain"]);
    }

    #[test]
    fn connector_punctuation_and_joiners_are_not_letters() {
        // UNDERTIE and ZERO WIDTH JOINER are word characters but not letters
        let set = candidates("a\u{203F}b foo\u{200D}bar");
        assert!(!set.contains("a\u{203F}b"));
        assert!(!set.contains("foo\u{200D}bar"));
        assert!(set.is_empty());

        assert_eq!(words("zero\u{200C}width plain"), vec!["plain"]);
        for word in candidates("x\u{2040}y caf\u{e9} \u{fe4f}z") {
            assert!(word.chars().all(char::is_alphabetic), "{word:?}");
        }
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(candidates("").is_empty());
        assert!(candidates("   \n\t  ").is_empty());
    }

    #[test]
    fn combining_marks_compose() {
        // "cafe" + COMBINING ACUTE ACCENT vs. precomposed "café"
        let set = candidates("cafe\u{301} caf\u{e9}");
        assert_eq!(set.len(), 1);
        assert!(set.contains("caf\u{e9}"));
    }

    #[test]
    fn compatibility_forms_fold() {
        // LATIN SMALL LIGATURE FI and full-width letters
        assert_eq!(words("\u{fb01}ne"), vec!["fine"]);
        assert_eq!(words("\u{ff37}\u{ff4f}\u{ff52}\u{ff44}"), vec!["word"]);
    }

    #[test]
    fn non_latin_scripts_are_letters() {
        assert_eq!(words("Привет мир"), vec!["мир", "привет"]);
        assert_eq!(words("Schmetterling über Straße"), vec!["schmetterling", "straße", "über"]);
    }

    #[test]
    fn apostrophes_and_hyphens_split_words() {
        assert_eq!(words("don't multi-line"), vec!["don", "line", "multi", "t"]);
    }

    #[test]
    fn normalize_is_lowercase_nfkc() {
        assert_eq!(normalize("ÉCOLE"), "école");
        assert_eq!(normalize("\u{fb01}"), "fi");
    }
}
