//! Stop-word lists.
//!
//! A list is a flat, newline-delimited word file. Blank lines and lines
//! starting with `#` are ignored; surrounding whitespace is trimmed. The list
//! is loaded once and handed to [`Normalizer::new`](crate::Normalizer::new),
//! which folds each entry through the same casing/punctuation steps it applies
//! to input text.

use std::fs;
use std::path::Path;

use fxhash::FxHashSet;
use tracing::debug;

use crate::error::LexicalError;

const ENGLISH_STOP_WORDS: &str = include_str!("../data/stopwords.txt");

/// An immutable set of raw stop words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: FxHashSet<String>,
}

impl StopWords {
    /// Parse a newline-delimited list.
    pub fn parse(list: &str) -> Self {
        let words = list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect();
        Self { words }
    }

    /// Read a newline-delimited list from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LexicalError> {
        let path = path.as_ref();
        let list = fs::read_to_string(path).map_err(|source| LexicalError::StopWordsRead {
            path: path.display().to_string(),
            source,
        })?;
        let words = Self::parse(&list);
        debug!(path = %path.display(), count = words.len(), "stop_words_loaded");
        Ok(words)
    }

    /// The bundled English list.
    pub fn english() -> Self {
        Self::parse(ENGLISH_STOP_WORDS)
    }

    /// An empty list; nothing is filtered.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
