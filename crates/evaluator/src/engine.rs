use std::sync::Arc;
use std::time::Instant;

use lexical::{Normalizer, SentenceSegmenter, UnicodeSentenceSegmenter};
use semantic::{CachedEmbedder, EmbeddingProvider};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn, Instrument, Level};

use crate::completeness::{score_completeness, CompletenessOutcome};
use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::hallucination::{score_hallucination, HallucinationOutcome};
use crate::metrics::{EvalMetrics, EvalOutcome};
use crate::relevance::{score_relevance, RelevanceOutcome, RelevanceWeights};
use crate::types::{EvaluationInput, EvaluationRecord, Explanation, ScoreResult};


/// Scores RAG answers against their question and retrieved context.
///
/// Owns every dependency explicitly: the embedding provider, the text
/// normalizer (with its stop-word list) and the sentence segmenter are all
/// handed in at construction. Cloning is cheap; clones share dependencies.
#[derive(Clone)]
pub struct Evaluator {
    provider: Arc<dyn EmbeddingProvider>,
    normalizer: Arc<Normalizer>,
    segmenter: Arc<dyn SentenceSegmenter>,
    cfg: EvalConfig,
    metrics: Option<Arc<dyn EvalMetrics>>,
}

impl Evaluator {
    /// Validates `cfg` and wires the default UAX #29 sentence segmenter.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        normalizer: Normalizer,
        cfg: EvalConfig,
    ) -> Result<Self, EvalError> {
        cfg.validate()?;
        Ok(Self {
            provider,
            normalizer: Arc::new(normalizer),
            segmenter: Arc::new(UnicodeSentenceSegmenter),
            cfg,
            metrics: None,
        })
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn EvalMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.cfg
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    fn weights(&self) -> RelevanceWeights {
        RelevanceWeights {
            semantic: self.cfg.semantic_weight,
            lexical: self.cfg.lexical_weight,
        }
    }

    /// Provider used for one call: the shared provider behind a fresh cache
    /// when caching is on.
    ///
    /// The cache is filled with every text the scorers will ask for in a
    /// single batch before they start, so concurrent scorers only ever hit.
    async fn request_provider(
        &self,
        question: &str,
        answer: &str,
        chunks: &[&str],
    ) -> Result<Arc<dyn EmbeddingProvider>, EvalError> {
        if !self.cfg.cache_embeddings {
            return Ok(self.provider.clone());
        }

        let cache = CachedEmbedder::new(self.provider.clone(), self.cfg.cache_capacity);
        let sentences = self.segmenter.segment(answer);
        let mut texts: Vec<&str> = Vec::with_capacity(2 + sentences.len() + chunks.len());
        texts.push(question);
        texts.push(answer);
        texts.extend(sentences.iter().map(String::as_str));
        texts.extend_from_slice(chunks);
        cache.embed_batch(&texts).await?;
        Ok(Arc::new(cache))
    }

    pub async fn score_hallucination(
        &self,
        answer: &str,
        context_chunks: &[&str],
    ) -> Result<ScoreResult, EvalError> {
        Ok(score_hallucination(
            self.provider.as_ref(),
            self.segmenter.as_ref(),
            answer,
            context_chunks,
            self.cfg.support_threshold,
        )
        .await?
        .result)
    }

    pub async fn score_relevance(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<ScoreResult, EvalError> {
        Ok(score_relevance(
            self.provider.as_ref(),
            &self.normalizer,
            question,
            answer,
            self.weights(),
            self.cfg.include_relevance_note,
        )
        .await?
        .result)
    }

    pub async fn score_completeness(
        &self,
        answer: &str,
        context_chunks: &[&str],
    ) -> Result<ScoreResult, EvalError> {
        Ok(score_completeness(
            self.provider.as_ref(),
            answer,
            context_chunks,
            self.cfg.coverage_threshold,
        )
        .await?
        .result)
    }

    /// Runs the three scorers over one triple and assembles the record.
    ///
    /// Any scorer failure aborts the whole evaluation; no partial record is
    /// returned.
    pub async fn evaluate<S: AsRef<str>>(
        &self,
        question: &str,
        answer: &str,
        context_chunks: &[S],
    ) -> Result<EvaluationRecord, EvalError> {
        let start = Instant::now();
        let chunks: Vec<&str> = context_chunks.iter().map(AsRef::as_ref).collect();

        let span = tracing::span!(
            Level::INFO,
            "evaluator.evaluate",
            model = %self.provider.model_name(),
            context_chunks = chunks.len(),
            answer_len = answer.len()
        );

        let result = self
            .evaluate_inner(question, answer, &chunks)
            .instrument(span.clone())
            .await;
        let latency = start.elapsed();
        let elapsed_micros = latency.as_micros();

        let _guard = span.enter();
        match &result {
            Ok(record) => {
                info!(
                    relevance = record.relevance.score,
                    completeness = record.completeness.score,
                    hallucination = record.hallucination.score,
                    elapsed_micros,
                    "evaluation_success"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_evaluation(latency, EvalOutcome::Success(record));
                }
            }
            Err(err) => {
                warn!(error = %err, elapsed_micros, "evaluation_failure");
                if let Some(metrics) = &self.metrics {
                    metrics.record_evaluation(latency, EvalOutcome::Failure(err));
                }
            }
        }

        result
    }

    async fn evaluate_inner(
        &self,
        question: &str,
        answer: &str,
        chunks: &[&str],
    ) -> Result<EvaluationRecord, EvalError> {
        let provider = self.request_provider(question, answer, chunks).await?;
        let provider = provider.as_ref();

        let hallucination = score_hallucination(
            provider,
            self.segmenter.as_ref(),
            answer,
            chunks,
            self.cfg.support_threshold,
        );
        let relevance = score_relevance(
            provider,
            &self.normalizer,
            question,
            answer,
            self.weights(),
            self.cfg.include_relevance_note,
        );
        let completeness =
            score_completeness(provider, answer, chunks, self.cfg.coverage_threshold);

        let (hallucination, relevance, completeness) = if self.cfg.parallel {
            tokio::try_join!(hallucination, relevance, completeness)?
        } else {
            (hallucination.await?, relevance.await?, completeness.await?)
        };

        Ok(self.assemble(hallucination, relevance, completeness))
    }

    fn assemble(
        &self,
        hallucination: HallucinationOutcome,
        relevance: RelevanceOutcome,
        completeness: CompletenessOutcome,
    ) -> EvaluationRecord {
        let explanation = self.cfg.explain.then(|| Explanation {
            sentences: hallucination.sentences,
            chunks: completeness.chunks,
            relevance: relevance.breakdown,
        });

        EvaluationRecord {
            relevance: relevance.result,
            completeness: completeness.result,
            hallucination: hallucination.result,
            explanation,
        }
    }

    pub async fn evaluate_input(
        &self,
        input: &EvaluationInput,
    ) -> Result<EvaluationRecord, EvalError> {
        self.evaluate(&input.question, &input.answer, &input.context_chunks)
            .await
    }

    /// Synchronous wrapper around [`evaluate`](Self::evaluate).
    ///
    /// Inside a multi-threaded tokio runtime the current worker is parked with
    /// `block_in_place`; outside any runtime a temporary one is built. A
    /// current-thread runtime cannot be blocked and yields
    /// [`EvalError::Runtime`].
    pub fn evaluate_blocking<S: AsRef<str>>(
        &self,
        question: &str,
        answer: &str,
        context_chunks: &[S],
    ) -> Result<EvaluationRecord, EvalError> {
        if let Ok(handle) = Handle::try_current() {
            if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
                return Err(EvalError::Runtime(
                    "evaluate_blocking called from a current-thread runtime; use evaluate().await"
                        .into(),
                ));
            }
            tokio::task::block_in_place(|| {
                handle.block_on(self.evaluate(question, answer, context_chunks))
            })
        } else {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| EvalError::Runtime(e.to_string()))?
                .block_on(self.evaluate(question, answer, context_chunks))
        }
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("model_name", &self.provider.model_name())
            .field("cfg", &self.cfg)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
