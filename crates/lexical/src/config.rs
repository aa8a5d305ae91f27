//! Configuration types for the lexical normalizer.
//!
//! [`LexicalConfig`] controls which steps of the token pipeline run before a
//! text is reduced to a [`TokenSet`](crate::TokenSet). The defaults match the
//! relevance scorer's expectations: every step enabled.
//!
//! ```rust
//! use lexical::LexicalConfig;
//!
//! let config = LexicalConfig::default();
//! assert!(config.lowercase);
//! assert!(config.strip_punctuation);
//! assert!(config.remove_stop_words);
//! assert!(config.stem);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LexicalError;

/// Knobs for the normalization pipeline.
///
/// Cheap to clone and serde-friendly so it can be embedded in the umbrella
/// YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LexicalConfig {
    /// Apply Unicode NFKC normalization before anything else.
    pub normalize_unicode: bool,
    /// Apply locale-free Unicode lowercasing.
    pub lowercase: bool,
    /// Delete punctuation characters. Deleted characters do not split tokens,
    /// so `it's` becomes `its`.
    pub strip_punctuation: bool,
    /// Drop tokens present in the configured stop-word list.
    pub remove_stop_words: bool,
    /// Reduce tokens to their Snowball stem.
    pub stem: bool,
    /// Stemming language. Only `"english"` is recognised today.
    pub language: String,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
            remove_stop_words: true,
            stem: true,
            language: "english".into(),
        }
    }
}

impl LexicalConfig {
    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), LexicalError> {
        if self.stem && !self.language.eq_ignore_ascii_case("english") {
            return Err(LexicalError::InvalidConfig(format!(
                "unsupported stemming language '{}'",
                self.language
            )));
        }
        Ok(())
    }
}
