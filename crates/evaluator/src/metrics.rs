// Metrics hooks for the evaluator.
//
// An `EvalMetrics` implementation is handed to `Evaluator::with_metrics`; the
// evaluator then reports latency and outcome for every call to
// `Evaluator::evaluate`. There is no process-wide recorder.
use std::time::Duration;

use crate::error::EvalError;
use crate::types::EvaluationRecord;

/// How an evaluation ended.
#[derive(Debug, Clone, Copy)]
pub enum EvalOutcome<'a> {
    Success(&'a EvaluationRecord),
    Failure(&'a EvalError),
}

/// Metrics observer for evaluations.
pub trait EvalMetrics: Send + Sync {
    /// `latency` is wall-clock time from entry to the finished record or error.
    fn record_evaluation(&self, latency: Duration, outcome: EvalOutcome<'_>);
}
