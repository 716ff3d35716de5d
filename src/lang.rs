//! Language tokens and the active language-set policy.
//!
//! Transcripts are wrapped in a bracketed token marking the detected
//! language (`[ZH]text[ZH]`). Only languages in the active set are
//! accepted; anything else is a policy skip, not an error.

use crate::error::{ClipscribeError, Result};
use std::fmt;
use std::str::FromStr;

/// The full token map. Closed: languages outside it are never annotated.
const LANG_TOKENS: &[(&str, &str)] = &[("zh", "[ZH]"), ("ja", "[JA]"), ("en", "[EN]")];

/// Which languages of the token map are active for a run.
///
/// Mirrors the dataset conventions: `CJE` accepts Chinese, Japanese and
/// English; `CJ` drops English; `C` accepts Chinese only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSet {
    Cje,
    Cj,
    C,
}

impl LanguageSet {
    /// Language codes active under this set.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            LanguageSet::Cje => &["zh", "ja", "en"],
            LanguageSet::Cj => &["zh", "ja"],
            LanguageSet::C => &["zh"],
        }
    }

    /// Token for a detected language code, if the language is active.
    pub fn token_for(&self, language: &str) -> Option<&'static str> {
        if !self.codes().contains(&language) {
            return None;
        }
        LANG_TOKENS
            .iter()
            .find(|(code, _)| *code == language)
            .map(|(_, token)| *token)
    }

    /// Wrap a transcript with the language token on both sides.
    ///
    /// Returns `None` when the language is not active.
    pub fn annotate(&self, language: &str, text: &str) -> Option<String> {
        self.token_for(language)
            .map(|token| format!("{token}{text}{token}"))
    }
}

impl FromStr for LanguageSet {
    type Err = ClipscribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CJE" => Ok(LanguageSet::Cje),
            "CJ" => Ok(LanguageSet::Cj),
            "C" => Ok(LanguageSet::C),
            _ => Err(ClipscribeError::InvalidLanguageSet {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LanguageSet::Cje => "CJE",
            LanguageSet::Cj => "CJ",
            LanguageSet::C => "C",
        };
        write!(f, "{s}")
    }
}
