use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Unordered set of normalized tokens derived from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    tokens: FxHashSet<String>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of tokens shared with `other`.
    pub fn intersection_len(&self, other: &TokenSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.tokens.iter().filter(|t| large.tokens.contains(*t)).count()
    }

    /// Directional overlap `|self ∩ other| / |self|`.
    ///
    /// Measures how much of `self` reappears in `other`. An empty `self`
    /// yields `0.0`.
    pub fn overlap_ratio(&self, other: &TokenSet) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.intersection_len(other) as f32 / self.len() as f32
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}
