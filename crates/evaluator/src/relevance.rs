//! Question/answer relevance: a fixed linear blend of embedding cosine and
//! directional token overlap.

use lexical::Normalizer;
use semantic::{EmbeddingProvider, SemanticError};

use crate::types::{RelevanceBand, RelevanceBreakdown, ScoreResult};

/// Relevance result plus its two components.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceOutcome {
    pub result: ScoreResult,
    pub breakdown: RelevanceBreakdown,
}

/// Blend weights; expected to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceWeights {
    pub semantic: f32,
    pub lexical: f32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            semantic: 0.7,
            lexical: 0.3,
        }
    }
}

pub async fn score_relevance(
    provider: &dyn EmbeddingProvider,
    normalizer: &Normalizer,
    question: &str,
    answer: &str,
    weights: RelevanceWeights,
    with_note: bool,
) -> Result<RelevanceOutcome, SemanticError> {
    let vectors = provider.embed_batch(&[question, answer]).await?;
    let (question_vec, answer_vec) = match vectors.as_slice() {
        [q, a] => (q, a),
        _ => {
            return Err(SemanticError::InvalidResponse(format!(
                "expected 2 embeddings, got {}",
                vectors.len()
            )))
        }
    };

    // Negative cosine carries no more information than "unrelated" here and
    // would push the blend below zero.
    let semantic = question_vec.similarity(answer_vec)?.max(0.0);
    let lexical = normalizer
        .normalize(question)
        .overlap_ratio(&normalizer.normalize(answer));

    let breakdown = RelevanceBreakdown { semantic, lexical };
    let score = blend(breakdown, weights);
    let result = if with_note {
        ScoreResult::new(score, RelevanceBand::classify(score).note())
    } else {
        ScoreResult::without_note(score)
    };

    Ok(RelevanceOutcome { result, breakdown })
}

/// `semantic * w_s + lexical * w_l`, clamped to `[0, 1]`.
pub fn blend(components: RelevanceBreakdown, weights: RelevanceWeights) -> f32 {
    (weights.semantic * components.semantic + weights.lexical * components.lexical).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, FixedEmbedder, KeywordEmbedder};

    fn parts(semantic: f32, lexical: f32) -> RelevanceBreakdown {
        RelevanceBreakdown { semantic, lexical }
    }

    #[test]
    fn blend_uses_fixed_weights() {
        let w = RelevanceWeights::default();
        assert!((blend(parts(1.0, 1.0), w) - 1.0).abs() < 1e-6);
        assert!((blend(parts(1.0, 0.0), w) - 0.7).abs() < 1e-6);
        assert!((blend(parts(0.0, 1.0), w) - 0.3).abs() < 1e-6);
        assert_eq!(blend(parts(0.0, 0.0), w), 0.0);
    }

    #[test]
    fn blend_is_monotone_in_each_component() {
        let w = RelevanceWeights::default();
        let steps: Vec<f32> = (0..=10).map(|i| i as f32 / 10.0).collect();
        for &fixed in &steps {
            let mut prev_sem = f32::MIN;
            let mut prev_lex = f32::MIN;
            for &x in &steps {
                let by_sem = blend(parts(x, fixed), w);
                let by_lex = blend(parts(fixed, x), w);
                assert!(by_sem >= prev_sem);
                assert!(by_lex >= prev_lex);
                prev_sem = by_sem;
                prev_lex = by_lex;
            }
        }
    }

    #[tokio::test]
    async fn paraphrase_scores_strong() {
        let provider = KeywordEmbedder::new();
        let normalizer = Normalizer::english();
        let outcome = score_relevance(
            &provider,
            &normalizer,
            "What is the capital of France?",
            "Paris is the capital of France.",
            RelevanceWeights::default(),
            true,
        )
        .await
        .unwrap();
        assert!(outcome.result.score > 0.7);
        assert_eq!(outcome.breakdown.lexical, 1.0);
        assert_eq!(outcome.result.note.as_deref(), Some(RelevanceBand::Strong.note()));
    }

    #[tokio::test]
    async fn empty_question_has_zero_lexical_overlap() {
        let provider = FixedEmbedder::new()
            .with("", vec![0.0, 0.0])
            .with("Some answer.", vec![1.0, 0.0]);
        let outcome = score_relevance(
            &provider,
            &Normalizer::english(),
            "",
            "Some answer.",
            RelevanceWeights::default(),
            true,
        )
        .await
        .unwrap();
        assert_eq!(outcome.breakdown, parts(0.0, 0.0));
        assert_eq!(outcome.result.score, 0.0);
        assert_eq!(outcome.result.note.as_deref(), Some(RelevanceBand::Low.note()));
    }

    #[tokio::test]
    async fn negative_cosine_is_floored() {
        let provider = FixedEmbedder::new()
            .with("up", vec![1.0, 0.0])
            .with("down", vec![-1.0, 0.0]);
        let outcome = score_relevance(
            &provider,
            &Normalizer::english(),
            "up",
            "down",
            RelevanceWeights::default(),
            false,
        )
        .await
        .unwrap();
        assert_eq!(outcome.breakdown.semantic, 0.0);
        assert!(outcome.result.score >= 0.0);
        assert!(outcome.result.note.is_none());
    }

    #[tokio::test]
    async fn note_can_be_omitted_without_changing_score() {
        let provider = KeywordEmbedder::new();
        let normalizer = Normalizer::english();
        let q = "How tall is the Eiffel Tower?";
        let a = "The Eiffel Tower is 330 metres tall.";
        let with = score_relevance(&provider, &normalizer, q, a, RelevanceWeights::default(), true)
            .await
            .unwrap();
        let without =
            score_relevance(&provider, &normalizer, q, a, RelevanceWeights::default(), false)
                .await
                .unwrap();
        assert_eq!(with.result.score, without.result.score);
        assert!(with.result.note.is_some());
        assert!(without.result.note.is_none());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let err = score_relevance(
            &FailingEmbedder::default(),
            &Normalizer::english(),
            "q",
            "a",
            RelevanceWeights::default(),
            true,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SemanticError::Unavailable(_)));
    }
}
