use serde::{Deserialize, Serialize};

/// Score plus its qualitative classification.
///
/// `note` is derived from `score` by a fixed band table and never carries
/// anything else. It is `None` only for relevance when notes are disabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScoreResult {
    pub fn new(score: f32, note: impl Into<String>) -> Self {
        Self {
            score,
            note: Some(note.into()),
        }
    }

    pub fn without_note(score: f32) -> Self {
        Self { score, note: None }
    }
}

/// Qualitative bands for the hallucination score (fraction of unsupported sentences).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HallucinationBand {
    /// `score == 0`
    AllSupported,
    /// `0 < score <= 0.4`
    SomeUnsupported,
    /// `score > 0.4`
    MostUnsupported,
}

impl HallucinationBand {
    pub fn classify(score: f32) -> Self {
        if score > 0.4 {
            HallucinationBand::MostUnsupported
        } else if score > 0.0 {
            HallucinationBand::SomeUnsupported
        } else {
            HallucinationBand::AllSupported
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            HallucinationBand::MostUnsupported => {
                "Most statements in response lack support from retrieved context"
            }
            HallucinationBand::SomeUnsupported => {
                "Some statements in the answer not supported clearly by retrieved context"
            }
            HallucinationBand::AllSupported => {
                "All statements in answer supported by retrieved context"
            }
        }
    }
}

/// Qualitative bands for the relevance score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBand {
    /// `score >= 0.7`
    Strong,
    /// `0.4 <= score < 0.7`
    Partial,
    /// `score < 0.4`
    Low,
}

impl RelevanceBand {
    pub fn classify(score: f32) -> Self {
        if score >= 0.7 {
            RelevanceBand::Strong
        } else if score >= 0.4 {
            RelevanceBand::Partial
        } else {
            RelevanceBand::Low
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            RelevanceBand::Strong => "Answer shows strong relevance to the question.",
            RelevanceBand::Partial => "Answer shows partial relevance to the question.",
            RelevanceBand::Low => "Answer shows low relevance to the question.",
        }
    }
}

/// Qualitative bands for the completeness score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessBand {
    /// `score >= 0.8`
    CoversMost,
    /// `0.4 <= score < 0.8`
    CoversSome,
    /// `score < 0.4`
    CoversLittle,
}

impl CompletenessBand {
    pub fn classify(score: f32) -> Self {
        if score >= 0.8 {
            CompletenessBand::CoversMost
        } else if score >= 0.4 {
            CompletenessBand::CoversSome
        } else {
            CompletenessBand::CoversLittle
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            CompletenessBand::CoversMost => {
                "Answer covers most of the information present in the retrieved context."
            }
            CompletenessBand::CoversSome => {
                "Answer reflects some of the retrieved context but omits other aspects."
            }
            CompletenessBand::CoversLittle => {
                "Answer does not cover most of the information present in the retrieved context."
            }
        }
    }
}

/// Note for an answer that segments into zero sentences.
pub const EMPTY_ANSWER_NOTE: &str = "No content generated to assess hallucination.";

/// Note for completeness when no context chunks were retrieved.
pub const EMPTY_CONTEXT_NOTE: &str = "No retrieved context to cover.";

/// One (question, answer, context) triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EvaluationInput {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub context_chunks: Vec<String>,
}

/// Support found for one answer sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceSupport {
    pub sentence: String,
    /// Best cosine similarity against any chunk; `0.0` with no chunks.
    pub support: f32,
    pub supported: bool,
}

/// Similarity between the answer and one context chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkCoverage {
    pub index: usize,
    pub similarity: f32,
    pub covered: bool,
}

/// The two blended relevance signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RelevanceBreakdown {
    /// Question/answer cosine, floored at zero.
    pub semantic: f32,
    /// Fraction of question tokens that reappear in the answer.
    pub lexical: f32,
}

/// Per-component detail attached when `EvalConfig::explain` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub sentences: Vec<SentenceSupport>,
    pub chunks: Vec<ChunkCoverage>,
    pub relevance: RelevanceBreakdown,
}

/// Result of evaluating one triple. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub relevance: ScoreResult,
    pub completeness: ScoreResult,
    pub hallucination: ScoreResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hallucination_bands_are_a_strict_order() {
        assert_eq!(
            HallucinationBand::classify(0.0),
            HallucinationBand::AllSupported
        );
        assert_eq!(
            HallucinationBand::classify(0.01),
            HallucinationBand::SomeUnsupported
        );
        assert_eq!(
            HallucinationBand::classify(0.4),
            HallucinationBand::SomeUnsupported
        );
        assert_eq!(
            HallucinationBand::classify(0.41),
            HallucinationBand::MostUnsupported
        );
        assert_eq!(
            HallucinationBand::classify(1.0),
            HallucinationBand::MostUnsupported
        );
    }

    #[test]
    fn relevance_boundaries_are_inclusive_below() {
        assert_eq!(RelevanceBand::classify(0.7), RelevanceBand::Strong);
        assert_eq!(RelevanceBand::classify(0.69), RelevanceBand::Partial);
        assert_eq!(RelevanceBand::classify(0.4), RelevanceBand::Partial);
        assert_eq!(RelevanceBand::classify(0.39), RelevanceBand::Low);
        assert_eq!(RelevanceBand::classify(0.0), RelevanceBand::Low);
    }

    #[test]
    fn completeness_boundaries_are_inclusive_below() {
        assert_eq!(CompletenessBand::classify(0.8), CompletenessBand::CoversMost);
        assert_eq!(CompletenessBand::classify(0.79), CompletenessBand::CoversSome);
        assert_eq!(CompletenessBand::classify(0.4), CompletenessBand::CoversSome);
        assert_eq!(
            CompletenessBand::classify(0.39),
            CompletenessBand::CoversLittle
        );
    }

    #[test]
    fn notes_match_published_wording() {
        assert_eq!(
            HallucinationBand::AllSupported.note(),
            "All statements in answer supported by retrieved context"
        );
        assert_eq!(
            CompletenessBand::CoversMost.note(),
            "Answer covers most of the information present in the retrieved context."
        );
        assert!(RelevanceBand::Strong.note().contains("strong"));
        assert!(RelevanceBand::Partial.note().contains("partial"));
        assert!(RelevanceBand::Low.note().contains("low relevance"));
    }

    #[test]
    fn record_serializes_in_published_shape() {
        let record = EvaluationRecord {
            relevance: ScoreResult::without_note(0.9),
            completeness: ScoreResult::new(1.0, CompletenessBand::CoversMost.note()),
            hallucination: ScoreResult::new(0.0, HallucinationBand::AllSupported.note()),
            explanation: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj["relevance"].get("note").is_none());
        assert_eq!(obj["completeness"]["score"], 1.0);
        assert_eq!(
            obj["hallucination"]["note"],
            "All statements in answer supported by retrieved context"
        );
    }
}
