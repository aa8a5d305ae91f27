//! Workspace umbrella crate for ragscore, a RAG response quality evaluator.
//!
//! This crate stitches the lexical, semantic and evaluator layers together
//! behind one YAML configuration, and adds the sample-driven pipeline that
//! generates an answer and scores it.
//!
//! ```
//! use ragscore::{build_evaluator, RagScoreConfig};
//!
//! let evaluator = build_evaluator(&RagScoreConfig::default()).unwrap();
//! let record = evaluator
//!     .evaluate_blocking(
//!         "What is the capital of France?",
//!         "Paris is the capital of France.",
//!         &["Paris is the capital and largest city of France."],
//!     )
//!     .unwrap();
//! assert!(record.relevance.score > 0.0);
//! ```

pub mod config;
pub mod generation;
pub mod pipeline;
pub mod samples;
pub mod telemetry;

pub use evaluator::{
    ChunkCoverage, CompletenessBand, EvalConfig, EvalError, EvalMetrics, EvalOutcome,
    EvaluationInput, EvaluationRecord, Evaluator, Explanation, HallucinationBand, RelevanceBand,
    RelevanceBreakdown, RelevanceWeights, ScoreResult, SentenceSupport,
};
pub use lexical::{LexicalConfig, LexicalError, Normalizer, StopWords, TokenSet};
pub use semantic::{
    build_provider, cosine_similarity, EmbeddingProvider, EmbeddingVector, SemanticConfig,
    SemanticError,
};

pub use crate::config::{ConfigLoadError, LoggingConfig, RagScoreConfig};
pub use crate::generation::{
    build_prompt, AnswerGenerator, GenerationError, GenerationReport, GenerationResult,
    OllamaGenerator, Pricing, TokenCounts,
};
pub use crate::pipeline::{run_evaluation_pipeline, PipelineInput, PipelineReport};
pub use crate::samples::{Sample, SampleError, SampleSet};
pub use crate::telemetry::{init_tracing, TelemetryError};

use std::error::Error;
use std::fmt;

use tracing::debug;

/// Errors that can occur while building or running the evaluation pipeline.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigLoadError),
    Embedding(SemanticError),
    Samples(SampleError),
    Generation(GenerationError),
    Evaluation(EvalError),
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(err) => write!(f, "configuration failure: {err}"),
            PipelineError::Embedding(err) => write!(f, "embedding provider failure: {err}"),
            PipelineError::Samples(err) => write!(f, "sample loading failure: {err}"),
            PipelineError::Generation(err) => write!(f, "answer generation failure: {err}"),
            PipelineError::Evaluation(err) => write!(f, "evaluation failure: {err}"),
            PipelineError::Io(err) => write!(f, "report write failure: {err}"),
            PipelineError::Serialize(err) => write!(f, "report serialization failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Config(err) => Some(err),
            PipelineError::Embedding(err) => Some(err),
            PipelineError::Samples(err) => Some(err),
            PipelineError::Generation(err) => Some(err),
            PipelineError::Evaluation(err) => Some(err),
            PipelineError::Io(err) => Some(err),
            PipelineError::Serialize(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value)
    }
}

impl From<SemanticError> for PipelineError {
    fn from(value: SemanticError) -> Self {
        PipelineError::Embedding(value)
    }
}

impl From<SampleError> for PipelineError {
    fn from(value: SampleError) -> Self {
        PipelineError::Samples(value)
    }
}

impl From<GenerationError> for PipelineError {
    fn from(value: GenerationError) -> Self {
        PipelineError::Generation(value)
    }
}

impl From<EvalError> for PipelineError {
    fn from(value: EvalError) -> Self {
        PipelineError::Evaluation(value)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Io(value)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Serialize(value)
    }
}

/// Wire an [`Evaluator`] from a loaded configuration: normalizer, embedding
/// provider and scoring thresholds.
pub fn build_evaluator(cfg: &RagScoreConfig) -> Result<Evaluator, PipelineError> {
    let normalizer = cfg.normalizer()?;
    let semantic_cfg = cfg.semantic.to_semantic_config();
    let provider = build_provider(&semantic_cfg)?;
    let evaluator = Evaluator::new(provider, normalizer, cfg.evaluation.to_eval_config())?;
    debug!(
        mode = %semantic_cfg.mode,
        model = %evaluator.model_name(),
        "evaluator_built"
    );
    Ok(evaluator)
}
