use semantic::SemanticError;
use thiserror::Error;

/// Errors produced by the evaluation layer.
///
/// Empty answers, empty context and empty questions are not errors; they
/// produce defined scores. Only embedding failures and bad configuration
/// abort an evaluation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    /// The embedding provider failed; surfaced unchanged.
    #[error("embedding failed: {0}")]
    Embedding(#[from] SemanticError),
    /// Invalid evaluation configuration.
    #[error("invalid evaluation config: {0}")]
    InvalidConfig(String),
    /// No async runtime could be built for a blocking call.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl EvalError {
    /// True when the embedding backend could not produce a vector at all.
    pub fn is_embedding_unavailable(&self) -> bool {
        matches!(self, EvalError::Embedding(SemanticError::Unavailable(_)))
    }
}
