use std::borrow::Cow;
use std::fmt;

use fxhash::FxHashSet;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::LexicalConfig;
use crate::error::LexicalError;
use crate::stopwords::StopWords;
use crate::token_set::TokenSet;

/// Turns raw text into comparable tokens.
///
/// Steps, in order: NFKC, lowercasing, punctuation deletion, whitespace
/// split, stop-word removal, stemming. Every step can be switched off through
/// [`LexicalConfig`]. Construction is the only place the stop-word list is
/// touched; afterwards the normalizer is immutable and can be shared across
/// threads.
pub struct Normalizer {
    cfg: LexicalConfig,
    stop_words: FxHashSet<String>,
    stemmer: Option<Stemmer>,
}

impl Normalizer {
    /// Build a normalizer from a config and a raw stop-word list.
    ///
    /// Stop-word entries are folded through the same casing and punctuation
    /// steps as input text, so `don't` in the list matches the token `dont`.
    pub fn new(cfg: LexicalConfig, stop_words: &StopWords) -> Result<Self, LexicalError> {
        cfg.validate()?;
        Ok(Self::build(cfg, stop_words))
    }

    /// Default config with the bundled English stop-word list.
    pub fn english() -> Self {
        Self::build(LexicalConfig::default(), &StopWords::english())
    }

    fn build(cfg: LexicalConfig, stop_words: &StopWords) -> Self {
        let stemmer = cfg.stem.then(|| Stemmer::create(Algorithm::English));
        let mut normalizer = Self {
            cfg,
            stop_words: FxHashSet::default(),
            stemmer,
        };
        if normalizer.cfg.remove_stop_words {
            normalizer.stop_words = stop_words
                .iter()
                .map(|word| normalizer.fold(word))
                .filter(|word| !word.is_empty())
                .collect();
        }
        normalizer
    }

    pub fn config(&self) -> &LexicalConfig {
        &self.cfg
    }

    /// Ordered token list after every enabled step.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let folded = self.fold(text);
        folded
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(*token))
            .map(|token| match &self.stemmer {
                Some(stemmer) => stemmer.stem(token).into_owned(),
                None => token.to_owned(),
            })
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Token set of `text`; duplicates collapse.
    pub fn normalize(&self, text: &str) -> TokenSet {
        self.tokens(text).into_iter().collect()
    }

    /// Unicode normalization, casing and punctuation deletion.
    fn fold(&self, text: &str) -> String {
        // Use Cow to avoid allocation when normalization is disabled.
        let normalized: Cow<str> = if self.cfg.normalize_unicode {
            Cow::Owned(text.nfkc().collect::<String>())
        } else {
            Cow::Borrowed(text)
        };

        let mut out = String::with_capacity(normalized.len());
        for grapheme in normalized.graphemes(true) {
            // Lowercasing can expand one character into several.
            if self.cfg.lowercase {
                for ch in grapheme.to_lowercase().chars() {
                    self.push_char(ch, &mut out);
                }
            } else {
                for ch in grapheme.chars() {
                    self.push_char(ch, &mut out);
                }
            }
        }
        out
    }

    fn push_char(&self, ch: char, out: &mut String) {
        if self.cfg.strip_punctuation && is_punctuation(ch) {
            return;
        }
        out.push(ch);
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("cfg", &self.cfg)
            .field("stop_words", &self.stop_words.len())
            .field("stem", &self.stemmer.is_some())
            .finish()
    }
}

/// ASCII punctuation (which includes symbols such as `$` and `+`) plus the
/// Unicode punctuation categories.
fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || ch.is_punctuation()
}
