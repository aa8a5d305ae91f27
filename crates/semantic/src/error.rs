use thiserror::Error;

/// Errors surfaced by embedding providers.
///
/// Every variant is fatal to an evaluation: there is no fallback model and no
/// partial scoring.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SemanticError {
    /// The provider could not produce a vector (model unreachable, retries
    /// exhausted, backend refused the request).
    #[error("embedding unavailable: {0}")]
    Unavailable(String),
    /// Configuration is inconsistent (e.g., api mode without an api_url).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Transport or HTTP status failure. `status` is `None` for network-level
    /// errors.
    #[error("http request failed (status {status:?}): {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },
    /// The backend answered with something that is not a list of vectors.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    /// Two vectors that should share a dimension do not.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl SemanticError {
    /// Network failures, 429 and 5xx are worth another attempt; everything
    /// else fails fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            SemanticError::Http { status: None, .. } => true,
            SemanticError::Http {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message() {
        let err = SemanticError::Unavailable("model offline".into());
        assert!(err.to_string().contains("embedding unavailable"));
        assert!(err.to_string().contains("model offline"));
    }

    #[test]
    fn dimension_mismatch_message() {
        let err = SemanticError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: expected 384, got 768"
        );
    }

    #[test]
    fn retryable_classification() {
        let network = SemanticError::Http {
            status: None,
            message: "connection reset".into(),
        };
        let throttled = SemanticError::Http {
            status: Some(429),
            message: "slow down".into(),
        };
        let gateway = SemanticError::Http {
            status: Some(503),
            message: "unavailable".into(),
        };
        let bad_request = SemanticError::Http {
            status: Some(400),
            message: "bad".into(),
        };
        assert!(network.is_retryable());
        assert!(throttled.is_retryable());
        assert!(gateway.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!SemanticError::InvalidResponse("x".into()).is_retryable());
        assert!(!SemanticError::Unavailable("x".into()).is_retryable());
    }

    #[test]
    fn errors_clone_equal() {
        let err = SemanticError::InvalidConfig("missing api_url".into());
        assert_eq!(err.clone(), err);
    }
}
