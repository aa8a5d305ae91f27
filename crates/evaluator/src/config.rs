use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Scoring knobs for one [`Evaluator`](crate::Evaluator).
///
/// The defaults are the calibrated constants; changing them is meant for
/// experiments. Note bands are fixed and do not move with these values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvalConfig {
    /// A sentence is hallucinated when its best chunk similarity is strictly below this.
    pub support_threshold: f32,
    /// A chunk is covered when its similarity to the answer is at least this.
    pub coverage_threshold: f32,
    /// Weight of the question/answer cosine in the relevance blend.
    pub semantic_weight: f32,
    /// Weight of the question-token overlap in the relevance blend.
    pub lexical_weight: f32,
    /// Attach a qualitative note to the relevance result.
    pub include_relevance_note: bool,
    /// Attach per-sentence and per-chunk detail to the record.
    pub explain: bool,
    /// Share one embedding cache across the three scorers of a single call.
    pub cache_embeddings: bool,
    /// Capacity of that request-scoped cache.
    pub cache_capacity: usize,
    /// Run the three scorers concurrently.
    pub parallel: bool,
}

impl EvalConfig {
    pub(crate) fn default_support_threshold() -> f32 {
        0.6
    }

    pub(crate) fn default_coverage_threshold() -> f32 {
        0.5
    }

    pub(crate) fn default_semantic_weight() -> f32 {
        0.7
    }

    pub(crate) fn default_lexical_weight() -> f32 {
        0.3
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        for (name, value) in [
            ("support_threshold", self.support_threshold),
            ("coverage_threshold", self.coverage_threshold),
            ("semantic_weight", self.semantic_weight),
            ("lexical_weight", self.lexical_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvalError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        let weight_sum = self.semantic_weight + self.lexical_weight;
        if (weight_sum - 1.0).abs() > 1e-4 {
            return Err(EvalError::InvalidConfig(format!(
                "semantic_weight + lexical_weight must equal 1.0, got {weight_sum}"
            )));
        }

        if self.cache_embeddings && self.cache_capacity == 0 {
            return Err(EvalError::InvalidConfig(
                "cache_capacity must be greater than zero when caching is enabled".into(),
            ));
        }

        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            support_threshold: Self::default_support_threshold(),
            coverage_threshold: Self::default_coverage_threshold(),
            semantic_weight: Self::default_semantic_weight(),
            lexical_weight: Self::default_lexical_weight(),
            include_relevance_note: true,
            explain: false,
            cache_embeddings: true,
            cache_capacity: 256,
            parallel: true,
        }
    }
}
