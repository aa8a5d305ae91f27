//! Sentence-level grounding of an answer in its retrieved context.

use lexical::SentenceSegmenter;
use semantic::{EmbeddingProvider, EmbeddingVector, SemanticError};

use crate::types::{HallucinationBand, ScoreResult, SentenceSupport, EMPTY_ANSWER_NOTE};

/// Hallucination result plus the per-sentence support behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct HallucinationOutcome {
    pub result: ScoreResult,
    pub sentences: Vec<SentenceSupport>,
}

/// Fraction of answer sentences whose best-matching chunk falls below
/// `support_threshold`.
///
/// An answer with no sentences short-circuits before any embedding call. With
/// no chunks every sentence has support `0.0` and counts as hallucinated.
pub async fn score_hallucination(
    provider: &dyn EmbeddingProvider,
    segmenter: &dyn SentenceSegmenter,
    answer: &str,
    context_chunks: &[&str],
    support_threshold: f32,
) -> Result<HallucinationOutcome, SemanticError> {
    let sentences = segmenter.segment(answer);
    if sentences.is_empty() {
        return Ok(HallucinationOutcome {
            result: ScoreResult::new(0.0, EMPTY_ANSWER_NOTE),
            sentences: Vec::new(),
        });
    }

    let chunk_vectors = provider.embed_batch(context_chunks).await?;
    let sentence_refs: Vec<&str> = sentences.iter().map(String::as_str).collect();
    let sentence_vectors = provider.embed_batch(&sentence_refs).await?;

    let mut supports = Vec::with_capacity(sentences.len());
    for (sentence, vector) in sentences.into_iter().zip(&sentence_vectors) {
        let support = best_support(vector, &chunk_vectors)?;
        supports.push(SentenceSupport {
            sentence,
            support,
            supported: !is_hallucinated(support, support_threshold),
        });
    }

    let hallucinated = supports.iter().filter(|s| !s.supported).count();
    let score = hallucinated as f32 / supports.len() as f32;

    Ok(HallucinationOutcome {
        result: ScoreResult::new(score, HallucinationBand::classify(score).note()),
        sentences: supports,
    })
}

/// Maximum similarity of `sentence` against any chunk; `0.0` when there are none.
fn best_support(
    sentence: &EmbeddingVector,
    chunks: &[EmbeddingVector],
) -> Result<f32, SemanticError> {
    let mut best: Option<f32> = None;
    for chunk in chunks {
        let sim = sentence.similarity(chunk)?;
        best = Some(best.map_or(sim, |b| b.max(sim)));
    }
    Ok(best.unwrap_or(0.0))
}

pub(crate) fn is_hallucinated(support: f32, threshold: f32) -> bool {
    support < threshold
}
