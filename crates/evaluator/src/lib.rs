//! # ragscore evaluator (`evaluator`)
//!
//! ## Purpose
//!
//! `evaluator` scores one answer produced by a retrieval-augmented generation
//! pipeline against the question that prompted it and the context chunks that
//! were retrieved for it. Three independent metrics come out, each a score in
//! `[0, 1]` with a qualitative note:
//!
//! - **hallucination**: fraction of answer sentences whose best-matching
//!   chunk has cosine similarity below `0.6`.
//! - **relevance**: `0.7 * cosine(question, answer) + 0.3 * token overlap`,
//!   where overlap is the share of normalized question tokens found in the
//!   answer.
//! - **completeness**: fraction of chunks whose cosine against the whole
//!   answer is at least `0.5`.
//!
//! ## Core Types
//!
//! - [`Evaluator`]: owns the embedding provider, normalizer and segmenter and
//!   runs the three scorers concurrently.
//! - [`EvalConfig`]: thresholds, weights, caching and explain switches.
//! - [`EvaluationRecord`]: `{relevance, completeness, hallucination}`, each a
//!   [`ScoreResult`].
//!
//! ## Degenerate inputs
//!
//! | input                 | result                                             |
//! |-----------------------|----------------------------------------------------|
//! | answer with no text   | hallucination `0.0`, "No content generated ..."    |
//! | no context chunks     | completeness `1.0`, hallucination `1.0`            |
//! | empty question        | lexical overlap `0.0`                              |
//! | zero-magnitude vector | cosine `0.0`                                       |
//!
//! Embedding failures are the only runtime errors and abort the evaluation.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use evaluator::{EvalConfig, Evaluator};
//! use lexical::Normalizer;
//! use semantic::{build_provider, SemanticConfig};
//!
//! let provider = build_provider(&SemanticConfig::default()).unwrap();
//! let evaluator = Evaluator::new(provider, Normalizer::english(), EvalConfig::default()).unwrap();
//!
//! let record = evaluator
//!     .evaluate_blocking(
//!         "What is the capital of France?",
//!         "Paris is the capital of France.",
//!         &["Paris is the capital and largest city of France."],
//!     )
//!     .unwrap();
//! assert_eq!(record.hallucination.score, 0.0);
//! ```
//!
//! ## Observability
//!
//! Every evaluation runs in an `evaluator.evaluate` tracing span and ends with
//! an `evaluation_success` or `evaluation_failure` event. Pass an
//! [`EvalMetrics`] implementation to [`Evaluator::with_metrics`] to record
//! latency and outcome.

pub mod completeness;
pub mod config;
pub mod engine;
pub mod error;
pub mod hallucination;
pub mod metrics;
pub mod relevance;
pub mod types;

#[doc(hidden)]
pub mod testing;

pub use crate::config::EvalConfig;
pub use crate::engine::Evaluator;
pub use crate::error::EvalError;
pub use crate::metrics::{EvalMetrics, EvalOutcome};
pub use crate::relevance::RelevanceWeights;
pub use crate::types::{
    ChunkCoverage, CompletenessBand, EvaluationInput, EvaluationRecord, Explanation,
    HallucinationBand, RelevanceBand, RelevanceBreakdown, ScoreResult, SentenceSupport,
};
