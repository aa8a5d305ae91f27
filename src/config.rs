//! YAML configuration for ragscore.
//!
//! A single file configures every layer: lexical normalization, the embedding
//! backend, the scoring thresholds, generation pricing and logging. Each
//! section converts into the crate-level config it feeds.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "local evaluation"
//!
//! lexical:
//!   normalize_unicode: true
//!   lowercase: true
//!   strip_punctuation: true
//!   remove_stop_words: true
//!   stem: true
//!   # stop_words_path: "data/stopwords.txt"
//!
//! semantic:
//!   mode: "fast"
//!   tier: "balanced"
//!   model_name: "bge-small-en-v1.5"
//!   normalize: true
//!
//! evaluation:
//!   support_threshold: 0.6
//!   coverage_threshold: 0.5
//!   semantic_weight: 0.7
//!   lexical_weight: 0.3
//!   explain: false
//!
//! pricing:
//!   input_cost_per_token: 0.00000175
//!   output_cost_per_token: 0.000014
//!
//! logging:
//!   level: "info"
//!   json: false
//!
//! samples_dir: "data/samples"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use evaluator::EvalConfig;
use lexical::{LexicalConfig, Normalizer, StopWords};
use semantic::retry::RetryConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::Pricing;

pub const ENV_EMBED_API_URL: &str = "RAGSCORE_EMBED_API_URL";
pub const ENV_EMBED_API_TOKEN: &str = "RAGSCORE_EMBED_API_TOKEN";
pub const ENV_LOG_LEVEL: &str = "RAGSCORE_LOG_LEVEL";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RagScoreConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub lexical: LexicalYamlConfig,

    #[serde(default)]
    pub semantic: SemanticYamlConfig,

    #[serde(default)]
    pub evaluation: EvaluationYamlConfig,

    #[serde(default)]
    pub pricing: PricingYamlConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directory holding `sample-chat*.json` / `sample_context*.json` pairs.
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,
}

impl RagScoreConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: RagScoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RAGSCORE_*` environment overrides, then re-validate.
    ///
    /// Setting only the API URL does not switch the mode; the file still has
    /// to ask for `mode: "api"`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigLoadError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_EMBED_API_URL).filter(|v| !v.trim().is_empty()) {
            self.semantic.api_url = Some(url);
        }
        if let Some(token) = lookup(ENV_EMBED_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.semantic.api_auth_header = Some(format!("Bearer {}", token.trim()));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.lexical.validate()?;
        self.semantic.validate()?;
        self.evaluation.validate()?;
        self.pricing.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Build the normalizer, reading the stop-word file when one is configured.
    pub fn normalizer(&self) -> Result<Normalizer, ConfigLoadError> {
        let stop_words = match &self.lexical.stop_words_path {
            Some(path) => StopWords::from_path(path)
                .map_err(|err| ConfigLoadError::Validation(format!("lexical: {err}")))?,
            None => StopWords::english(),
        };
        Normalizer::new(self.lexical.to_lexical_config(), &stop_words)
            .map_err(|err| ConfigLoadError::Validation(format!("lexical: {err}")))
    }
}

impl Default for RagScoreConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            lexical: LexicalYamlConfig::default(),
            semantic: SemanticYamlConfig::default(),
            evaluation: EvaluationYamlConfig::default(),
            pricing: PricingYamlConfig::default(),
            logging: LoggingConfig::default(),
            samples_dir: default_samples_dir(),
        }
    }
}

/// Lexical normalizer YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalYamlConfig {
    #[serde(default = "true_value")]
    pub normalize_unicode: bool,

    #[serde(default = "true_value")]
    pub lowercase: bool,

    #[serde(default = "true_value")]
    pub strip_punctuation: bool,

    #[serde(default = "true_value")]
    pub remove_stop_words: bool,

    #[serde(default = "true_value")]
    pub stem: bool,

    #[serde(default = "default_language")]
    pub language: String,

    /// Newline-delimited stop-word list. The bundled English list is used when unset.
    #[serde(default)]
    pub stop_words_path: Option<PathBuf>,
}

impl LexicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_lexical_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("lexical: {err}")))
    }

    pub fn to_lexical_config(&self) -> LexicalConfig {
        LexicalConfig {
            normalize_unicode: self.normalize_unicode,
            lowercase: self.lowercase,
            strip_punctuation: self.strip_punctuation,
            remove_stop_words: self.remove_stop_words,
            stem: self.stem,
            language: self.language.clone(),
        }
    }
}

impl Default for LexicalYamlConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
            remove_stop_words: true,
            stem: true,
            language: default_language(),
            stop_words_path: None,
        }
    }
}

/// Embedding backend YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticYamlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_tier")]
    pub tier: String,

    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default = "true_value")]
    pub normalize: bool,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_auth_header: Option<String>,

    #[serde(default)]
    pub api_provider: Option<String>,

    #[serde(default = "default_timeout")]
    pub api_timeout_secs: Option<u64>,

    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl SemanticYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_semantic_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("semantic: {err}")))
    }

    pub fn to_semantic_config(&self) -> SemanticConfig {
        SemanticConfig {
            mode: self.mode.clone(),
            tier: self.tier.clone(),
            model_name: self.model_name.clone(),
            normalize: self.normalize,
            api_url: self.api_url.clone(),
            api_auth_header: self.api_auth_header.clone(),
            api_provider: self.api_provider.clone(),
            api_timeout_secs: self.api_timeout_secs,
            max_batch_size: self.max_batch_size,
            retry_config: self.retry.clone(),
        }
    }
}

impl Default for SemanticYamlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            tier: default_tier(),
            model_name: default_model_name(),
            normalize: true,
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: default_timeout(),
            max_batch_size: default_max_batch_size(),
            retry: None,
        }
    }
}

/// Scoring YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationYamlConfig {
    #[serde(default = "default_support_threshold")]
    pub support_threshold: f32,

    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: f32,

    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f32,

    #[serde(default = "default_lexical_weight")]
    pub lexical_weight: f32,

    #[serde(default = "true_value")]
    pub include_relevance_note: bool,

    #[serde(default)]
    pub explain: bool,

    #[serde(default = "true_value")]
    pub cache_embeddings: bool,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "true_value")]
    pub parallel: bool,
}

impl EvaluationYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_eval_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("evaluation: {err}")))
    }

    pub fn to_eval_config(&self) -> EvalConfig {
        EvalConfig {
            support_threshold: self.support_threshold,
            coverage_threshold: self.coverage_threshold,
            semantic_weight: self.semantic_weight,
            lexical_weight: self.lexical_weight,
            include_relevance_note: self.include_relevance_note,
            explain: self.explain,
            cache_embeddings: self.cache_embeddings,
            cache_capacity: self.cache_capacity,
            parallel: self.parallel,
        }
    }
}

impl Default for EvaluationYamlConfig {
    fn default() -> Self {
        Self {
            support_threshold: default_support_threshold(),
            coverage_threshold: default_coverage_threshold(),
            semantic_weight: default_semantic_weight(),
            lexical_weight: default_lexical_weight(),
            include_relevance_note: true,
            explain: false,
            cache_embeddings: true,
            cache_capacity: default_cache_capacity(),
            parallel: true,
        }
    }
}

/// Per-token generation pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingYamlConfig {
    #[serde(default = "default_input_cost")]
    pub input_cost_per_token: f64,

    #[serde(default = "default_output_cost")]
    pub output_cost_per_token: f64,
}

impl PricingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (name, value) in [
            ("input_cost_per_token", self.input_cost_per_token),
            ("output_cost_per_token", self.output_cost_per_token),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigLoadError::Validation(format!(
                    "pricing.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_pricing(&self) -> Pricing {
        Pricing {
            input_cost_per_token: self.input_cost_per_token,
            output_cost_per_token: self.output_cost_per_token,
        }
    }
}

impl Default for PricingYamlConfig {
    fn default() -> Self {
        Self {
            input_cost_per_token: default_input_cost(),
            output_cost_per_token: default_output_cost(),
        }
    }
}

/// Tracing subscriber configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"ragscore=debug,semantic=warn"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn true_value() -> bool {
    true
}
fn default_language() -> String {
    "english".to_string()
}
fn default_mode() -> String {
    "fast".to_string()
}
fn default_tier() -> String {
    "balanced".to_string()
}
fn default_model_name() -> String {
    "bge-small-en-v1.5".to_string()
}
fn default_timeout() -> Option<u64> {
    Some(30)
}
fn default_max_batch_size() -> usize {
    32
}
fn default_support_threshold() -> f32 {
    0.6
}
fn default_coverage_threshold() -> f32 {
    0.5
}
fn default_semantic_weight() -> f32 {
    0.7
}
fn default_lexical_weight() -> f32 {
    0.3
}
fn default_cache_capacity() -> usize {
    256
}
fn default_input_cost() -> f64 {
    Pricing::default().input_cost_per_token
}
fn default_output_cost() -> f64 {
    Pricing::default().output_cost_per_token
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_samples_dir() -> PathBuf {
    PathBuf::from("data/samples")
}
