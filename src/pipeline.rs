//! Sample → generation → evaluation, as one report.

use std::fs;
use std::path::Path;
use std::time::Instant;

use evaluator::{EvaluationRecord, Evaluator};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};

use crate::generation::{AnswerGenerator, GenerationReport, Pricing};
use crate::samples::SampleSet;
use crate::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInput {
    pub conversation_id: usize,
    pub user_query: String,
    /// The requested `k`; a sample may hold fewer context texts.
    pub number_retrieved_docs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub input: PipelineInput,
    pub generation: GenerationReport,
    pub evaluation: EvaluationRecord,
}

impl PipelineReport {
    /// Persist the report as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }
}

/// Load conversation `conversation_id`, answer its last user message from the
/// first `k` context chunks and score the answer.
pub async fn run_evaluation_pipeline(
    samples: &SampleSet,
    conversation_id: usize,
    k: usize,
    generator: &dyn AnswerGenerator,
    evaluator: &Evaluator,
    pricing: &Pricing,
) -> Result<PipelineReport, PipelineError> {
    let span = info_span!("pipeline.run", conversation_id, k);
    async move {
        let sample = samples.load(conversation_id)?;
        let user_query = sample.last_user_message()?.to_owned();
        let chunks = sample.context_texts(k);
        info!(chunks = chunks.len(), "sample_loaded");

        let start = Instant::now();
        let result = generator.generate(&user_query, &chunks).await?;
        let mut generation = GenerationReport::new(result, start.elapsed(), pricing);
        generation.latency_ms = round_to_hundredths(generation.latency_ms);
        info!(
            latency_ms = generation.latency_ms,
            total_tokens = generation.tokens.total,
            estimated_cost = generation.estimated_cost,
            "answer_generated"
        );

        let evaluation = evaluator
            .evaluate(&user_query, &generation.answer, &chunks)
            .await?;

        Ok(PipelineReport {
            input: PipelineInput {
                conversation_id,
                user_query,
                number_retrieved_docs: k,
            },
            generation,
            evaluation,
        })
    }
    .instrument(span)
    .await
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
