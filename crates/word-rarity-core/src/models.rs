//! Frequency models bundled into the binary.
//!
//! Each `lang-*` cargo feature embeds one [wordfreq] model. Models are
//! decoded on first use and kept for the life of the process.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use wordfreq::WordFreq;
use wordfreq_model::{ModelKind, load_wordfreq};

use crate::frequency::{FLOOR_POPULARITY, FrequencyOracle};

/// Language codes with a model compiled in, sorted.
pub const BUNDLED_LANGUAGES: &[&str] = &[
    #[cfg(feature = "lang-ar")]
    "ar",
    #[cfg(feature = "lang-bg")]
    "bg",
    #[cfg(feature = "lang-bn")]
    "bn",
    #[cfg(feature = "lang-ca")]
    "ca",
    #[cfg(feature = "lang-cs")]
    "cs",
    #[cfg(feature = "lang-da")]
    "da",
    #[cfg(feature = "lang-de")]
    "de",
    #[cfg(feature = "lang-el")]
    "el",
    #[cfg(feature = "lang-en")]
    "en",
    #[cfg(feature = "lang-es")]
    "es",
    #[cfg(feature = "lang-fa")]
    "fa",
    #[cfg(feature = "lang-fi")]
    "fi",
    #[cfg(feature = "lang-fil")]
    "fil",
    #[cfg(feature = "lang-fr")]
    "fr",
    #[cfg(feature = "lang-he")]
    "he",
    #[cfg(feature = "lang-hi")]
    "hi",
    #[cfg(feature = "lang-hu")]
    "hu",
    #[cfg(feature = "lang-id")]
    "id",
    #[cfg(feature = "lang-is")]
    "is",
    #[cfg(feature = "lang-it")]
    "it",
    #[cfg(feature = "lang-ja")]
    "ja",
    #[cfg(feature = "lang-ko")]
    "ko",
    #[cfg(feature = "lang-lt")]
    "lt",
    #[cfg(feature = "lang-lv")]
    "lv",
    #[cfg(feature = "lang-mk")]
    "mk",
    #[cfg(feature = "lang-ms")]
    "ms",
    #[cfg(feature = "lang-nb")]
    "nb",
    #[cfg(feature = "lang-nl")]
    "nl",
    #[cfg(feature = "lang-pl")]
    "pl",
    #[cfg(feature = "lang-pt")]
    "pt",
    #[cfg(feature = "lang-ro")]
    "ro",
    #[cfg(feature = "lang-ru")]
    "ru",
    #[cfg(feature = "lang-sh")]
    "sh",
    #[cfg(feature = "lang-sk")]
    "sk",
    #[cfg(feature = "lang-sl")]
    "sl",
    #[cfg(feature = "lang-sv")]
    "sv",
    #[cfg(feature = "lang-ta")]
    "ta",
    #[cfg(feature = "lang-tr")]
    "tr",
    #[cfg(feature = "lang-uk")]
    "uk",
    #[cfg(feature = "lang-ur")]
    "ur",
    #[cfg(feature = "lang-vi")]
    "vi",
    #[cfg(feature = "lang-zh")]
    "zh",
];

fn model_kind(language: &str) -> Option<ModelKind> {
    match language {
        #[cfg(feature = "lang-ar")]
        "ar" => Some(ModelKind::LargeAr),
        #[cfg(feature = "lang-bg")]
        "bg" => Some(ModelKind::SmallBg),
        #[cfg(feature = "lang-bn")]
        "bn" => Some(ModelKind::LargeBn),
        #[cfg(feature = "lang-ca")]
        "ca" => Some(ModelKind::LargeCa),
        #[cfg(feature = "lang-cs")]
        "cs" => Some(ModelKind::LargeCs),
        #[cfg(feature = "lang-da")]
        "da" => Some(ModelKind::SmallDa),
        #[cfg(feature = "lang-de")]
        "de" => Some(ModelKind::LargeDe),
        #[cfg(feature = "lang-el")]
        "el" => Some(ModelKind::SmallEl),
        #[cfg(feature = "lang-en")]
        "en" => Some(ModelKind::LargeEn),
        #[cfg(feature = "lang-es")]
        "es" => Some(ModelKind::LargeEs),
        #[cfg(feature = "lang-fa")]
        "fa" => Some(ModelKind::SmallFa),
        #[cfg(feature = "lang-fi")]
        "fi" => Some(ModelKind::LargeFi),
        #[cfg(feature = "lang-fil")]
        "fil" => Some(ModelKind::SmallFil),
        #[cfg(feature = "lang-fr")]
        "fr" => Some(ModelKind::LargeFr),
        #[cfg(feature = "lang-he")]
        "he" => Some(ModelKind::LargeHe),
        #[cfg(feature = "lang-hi")]
        "hi" => Some(ModelKind::SmallHi),
        #[cfg(feature = "lang-hu")]
        "hu" => Some(ModelKind::SmallHu),
        #[cfg(feature = "lang-id")]
        "id" => Some(ModelKind::SmallId),
        #[cfg(feature = "lang-is")]
        "is" => Some(ModelKind::SmallIs),
        #[cfg(feature = "lang-it")]
        "it" => Some(ModelKind::LargeIt),
        #[cfg(feature = "lang-ja")]
        "ja" => Some(ModelKind::LargeJa),
        #[cfg(feature = "lang-ko")]
        "ko" => Some(ModelKind::SmallKo),
        #[cfg(feature = "lang-lt")]
        "lt" => Some(ModelKind::SmallLt),
        #[cfg(feature = "lang-lv")]
        "lv" => Some(ModelKind::SmallLv),
        #[cfg(feature = "lang-mk")]
        "mk" => Some(ModelKind::LargeMk),
        #[cfg(feature = "lang-ms")]
        "ms" => Some(ModelKind::SmallMs),
        #[cfg(feature = "lang-nb")]
        "nb" => Some(ModelKind::LargeNb),
        #[cfg(feature = "lang-nl")]
        "nl" => Some(ModelKind::LargeNl),
        #[cfg(feature = "lang-pl")]
        "pl" => Some(ModelKind::LargePl),
        #[cfg(feature = "lang-pt")]
        "pt" => Some(ModelKind::LargePt),
        #[cfg(feature = "lang-ro")]
        "ro" => Some(ModelKind::SmallRo),
        #[cfg(feature = "lang-ru")]
        "ru" => Some(ModelKind::LargeRu),
        #[cfg(feature = "lang-sh")]
        "sh" => Some(ModelKind::SmallSh),
        #[cfg(feature = "lang-sk")]
        "sk" => Some(ModelKind::SmallSk),
        #[cfg(feature = "lang-sl")]
        "sl" => Some(ModelKind::SmallSl),
        #[cfg(feature = "lang-sv")]
        "sv" => Some(ModelKind::LargeSv),
        #[cfg(feature = "lang-ta")]
        "ta" => Some(ModelKind::SmallTa),
        #[cfg(feature = "lang-tr")]
        "tr" => Some(ModelKind::SmallTr),
        #[cfg(feature = "lang-uk")]
        "uk" => Some(ModelKind::LargeUk),
        #[cfg(feature = "lang-ur")]
        "ur" => Some(ModelKind::SmallUr),
        #[cfg(feature = "lang-vi")]
        "vi" => Some(ModelKind::SmallVi),
        #[cfg(feature = "lang-zh")]
        "zh" => Some(ModelKind::LargeZh),
        _ => None,
    }
}

/// Oracle backed by the compiled-in wordfreq models.
pub struct BundledModels {
    loaded: BTreeMap<&'static str, OnceLock<Option<WordFreq>>>,
}

impl BundledModels {
    /// Register every bundled language without decoding anything yet.
    pub fn new() -> Self {
        let loaded = BUNDLED_LANGUAGES
            .iter()
            .map(|language| (*language, OnceLock::new()))
            .collect();
        Self { loaded }
    }

    fn model(&self, language: &str) -> Option<&WordFreq> {
        let (code, slot) = self.loaded.get_key_value(language)?;
        slot.get_or_init(|| {
            let kind = model_kind(code)?;
            let _span = tracing::debug_span!("load_model", language = *code).entered();
            match load_wordfreq(kind) {
                Ok(model) => {
                    tracing::debug!("frequency model ready");
                    Some(model)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to decode frequency model");
                    None
                }
            }
        })
        .as_ref()
    }
}

impl Default for BundledModels {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BundledModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decoded: Vec<_> = self
            .loaded
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(code, _)| *code)
            .collect();
        f.debug_struct("BundledModels")
            .field("languages", &BUNDLED_LANGUAGES)
            .field("decoded", &decoded)
            .finish()
    }
}

impl FrequencyOracle for BundledModels {
    fn supported_languages(&self) -> Vec<String> {
        self.loaded.keys().map(|code| (*code).to_string()).collect()
    }

    fn is_supported(&self, language: &str) -> bool {
        self.loaded.contains_key(language)
    }

    fn popularity(&self, word: &str, language: &str) -> f64 {
        if word.is_empty() {
            return FLOOR_POPULARITY;
        }
        self.model(language)
            .map(|model| f64::from(model.zipf_frequency(word)).max(FLOOR_POPULARITY))
            .unwrap_or(FLOOR_POPULARITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_languages_are_sorted_and_resolvable() {
        assert!(BUNDLED_LANGUAGES.windows(2).all(|w| w[0] < w[1]));
        for language in BUNDLED_LANGUAGES {
            assert!(model_kind(language).is_some(), "{language} has no model");
        }
        assert!(model_kind("xx").is_none());
    }

    #[test]
    fn unsupported_language_reports_floor() {
        let models = BundledModels::new();
        assert!(!models.is_supported("xx"));
        assert_eq!(models.popularity("the", "xx"), FLOOR_POPULARITY);
    }

    #[cfg(feature = "lang-en")]
    #[test]
    fn english_model_knows_everyday_words() {
        let models = BundledModels::new();
        assert!(models.is_supported("en"));
        assert!(models.popularity("the", "en") > 7.0);
        assert!(models.popularity("government", "en") > 4.0);
        assert_eq!(models.popularity("THE", "en"), models.popularity("the", "en"));
        assert_eq!(models.popularity("zzyzzyxqv", "en"), FLOOR_POPULARITY);
        assert_eq!(models.popularity("", "en"), FLOOR_POPULARITY);
    }

    #[cfg(feature = "lang-it")]
    #[test]
    fn italian_is_bundled_by_default() {
        let models = BundledModels::new();
        assert!(models.supported_languages().iter().any(|l| l == "it"));
        assert!(models.popularity("ciao", "it") > 3.0);
    }
}
