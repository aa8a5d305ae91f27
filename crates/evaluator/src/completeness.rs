//! Fraction of retrieved chunks the answer touches.

use semantic::{EmbeddingProvider, SemanticError};

use crate::types::{ChunkCoverage, CompletenessBand, ScoreResult, EMPTY_CONTEXT_NOTE};

/// Completeness result plus per-chunk similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessOutcome {
    pub result: ScoreResult,
    pub chunks: Vec<ChunkCoverage>,
}

/// `covered / total` where a chunk is covered when its cosine against the
/// whole-answer embedding is at least `coverage_threshold`.
///
/// Zero chunks yields `{1.0, "No retrieved context to cover."}` without any
/// embedding call.
pub async fn score_completeness(
    provider: &dyn EmbeddingProvider,
    answer: &str,
    context_chunks: &[&str],
    coverage_threshold: f32,
) -> Result<CompletenessOutcome, SemanticError> {
    if context_chunks.is_empty() {
        return Ok(CompletenessOutcome {
            result: ScoreResult::new(1.0, EMPTY_CONTEXT_NOTE),
            chunks: Vec::new(),
        });
    }

    let answer_vec = provider.embed(answer).await?;
    let chunk_vectors = provider.embed_batch(context_chunks).await?;

    let mut chunks = Vec::with_capacity(chunk_vectors.len());
    for (index, chunk_vec) in chunk_vectors.iter().enumerate() {
        let similarity = answer_vec.similarity(chunk_vec)?;
        chunks.push(ChunkCoverage {
            index,
            similarity,
            covered: similarity >= coverage_threshold,
        });
    }

    let covered = chunks.iter().filter(|c| c.covered).count();
    let score = covered as f32 / chunks.len().max(1) as f32;

    Ok(CompletenessOutcome {
        result: ScoreResult::new(score, CompletenessBand::classify(score).note()),
        chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, FixedEmbedder};

    fn five_chunk_provider() -> FixedEmbedder {
        FixedEmbedder::new()
            .with("answer", vec![1.0, 0.0])
            .with("c1", vec![1.0, 0.0])
            .with("c2", vec![0.9, 0.1])
            .with("c3", vec![1.0, 1.0])
            .with("c4", vec![0.6, 0.8])
            .with("c5", vec![0.0, 1.0])
    }

    #[tokio::test]
    async fn four_of_five_covered_is_point_eight() {
        let outcome = score_completeness(
            &five_chunk_provider(),
            "answer",
            &["c1", "c2", "c3", "c4", "c5"],
            0.5,
        )
        .await
        .unwrap();
        assert_eq!(outcome.result.score, 0.8);
        assert_eq!(
            outcome.result.note.as_deref(),
            Some("Answer covers most of the information present in the retrieved context.")
        );
        let covered: Vec<bool> = outcome.chunks.iter().map(|c| c.covered).collect();
        assert_eq!(covered, vec![true, true, true, true, false]);
    }

    #[tokio::test]
    async fn partial_and_low_bands() {
        let provider = five_chunk_provider();
        let partial = score_completeness(&provider, "answer", &["c1", "c5"], 0.5)
            .await
            .unwrap();
        assert_eq!(partial.result.score, 0.5);
        assert_eq!(
            partial.result.note.as_deref(),
            Some(CompletenessBand::CoversSome.note())
        );

        let low = score_completeness(&provider, "answer", &["c5", "c5", "c1"], 0.5)
            .await
            .unwrap();
        assert!((low.result.score - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(
            low.result.note.as_deref(),
            Some(CompletenessBand::CoversLittle.note())
        );
    }

    #[tokio::test]
    async fn empty_context_is_a_sentinel() {
        let outcome = score_completeness(&FailingEmbedder::default(), "answer", &[], 0.5)
            .await
            .unwrap();
        assert_eq!(
            outcome.result,
            ScoreResult::new(1.0, "No retrieved context to cover.")
        );
        assert!(outcome.chunks.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let err = score_completeness(&FailingEmbedder::default(), "answer", &["c"], 0.5)
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticError::Unavailable(_)));
    }
}
