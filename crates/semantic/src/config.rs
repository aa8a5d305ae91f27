use serde::{Deserialize, Serialize};

use crate::error::SemanticError;
use crate::retry::RetryConfig;

/// Runtime configuration selecting the embedding backend and how vectors are
/// post-processed.
///
/// # Example
/// ```
/// use semantic::{build_provider, SemanticConfig};
///
/// let cfg = SemanticConfig {
///     mode: "fast".into(),
///     tier: "fast".into(),
///     ..Default::default()
/// };
/// cfg.validate().unwrap();
/// let provider = build_provider(&cfg).unwrap();
/// assert_eq!(provider.model_name(), "bge-small-en-v1.5");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Backend selector: `"fast"` (deterministic hashed stub) or `"api"` (remote HTTP).
    pub mode: String,
    /// Vector size class for the stub: `"fast"` (384), `"balanced"` (768) or `"accurate"` (1024).
    pub tier: String,
    /// Friendly label surfaced on every `EmbeddingVector`; also sent as `model`
    /// to OpenAI-style APIs.
    pub model_name: String,
    /// Normalize the resulting vector to unit length.
    pub normalize: bool,
    /// Embedding endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Largest number of texts sent in one API request; larger batches are split.
    pub max_batch_size: usize,
    /// Retry policy for API calls. `None` uses [`RetryConfig::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "fast".into(),
            tier: "balanced".into(),
            model_name: "bge-small-en-v1.5".into(),
            normalize: true,
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            max_batch_size: 32,
            retry_config: None,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "fast" => {}
            "api" => {
                let url = self.api_url.as_deref().map(str::trim).unwrap_or_default();
                if url.is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
            }
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown mode '{other}', expected 'fast' or 'api'"
                )))
            }
        }

        if !matches!(self.tier.as_str(), "fast" | "balanced" | "accurate") {
            return Err(SemanticError::InvalidConfig(format!(
                "unknown tier '{}', expected 'fast', 'balanced' or 'accurate'",
                self.tier
            )));
        }

        if self.model_name.trim().is_empty() {
            return Err(SemanticError::InvalidConfig(
                "model_name must not be empty".into(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "max_batch_size must be greater than zero".into(),
            ));
        }

        if self.api_timeout_secs == Some(0) {
            return Err(SemanticError::InvalidConfig(
                "api_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Stub vector dimension for the configured tier.
    pub fn stub_dimension(&self) -> usize {
        match self.tier.as_str() {
            "fast" => 384,
            "accurate" => 1024,
            _ => 768,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.mode, "fast");
        assert_eq!(cfg.tier, "balanced");
        assert_eq!(cfg.model_name, "bge-small-en-v1.5");
        assert!(cfg.normalize);
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.api_timeout_secs, Some(30));
        assert_eq!(cfg.max_batch_size, 32);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn api_mode_requires_url() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SemanticError::InvalidConfig(msg)) if msg.contains("api_url")
        ));

        let blank = SemanticConfig {
            mode: "api".into(),
            api_url: Some("   ".into()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let ok = SemanticConfig {
            mode: "api".into(),
            api_url: Some("http://localhost:8080/embed".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn unknown_mode_and_tier_rejected() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SemanticConfig {
            tier: "huge".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_batch_and_timeout_rejected() {
        let cfg = SemanticConfig {
            max_batch_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SemanticConfig {
            api_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn stub_dimension_by_tier() {
        for (tier, dim) in [("fast", 384), ("balanced", 768), ("accurate", 1024)] {
            let cfg = SemanticConfig {
                tier: tier.into(),
                ..Default::default()
            };
            assert_eq!(cfg.stub_dimension(), dim);
        }
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            tier: "accurate".into(),
            model_name: "text-embedding-3-small".into(),
            api_url: Some("https://api.example.com/embed".into()),
            api_auth_header: Some("Bearer token123".into()),
            api_provider: Some("openai".into()),
            api_timeout_secs: Some(60),
            normalize: false,
            max_batch_size: 8,
            retry_config: Some(RetryConfig::default().with_max_retries(1)),
        };

        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: SemanticConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: SemanticConfig = serde_json::from_str(r#"{"tier": "fast"}"#).unwrap();
        assert_eq!(cfg.tier, "fast");
        assert_eq!(cfg.mode, "fast");
        assert_eq!(cfg.max_batch_size, 32);
    }
}
