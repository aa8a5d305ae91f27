use serde::{Deserialize, Serialize};

use crate::error::SemanticError;
use crate::similarity::{cosine_similarity, l2_norm};

/// Embedding output.
///
/// Owned by whoever produced it and never mutated afterwards; the fields are
/// only reachable through accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingVector {
    /// Final embedding values.
    vector: Vec<f32>,
    /// Name of the model used to produce the vector.
    model_name: String,
    /// Whether `vector` was L2-normalized.
    normalized: bool,
}

impl EmbeddingVector {
    pub fn new(vector: Vec<f32>, model_name: impl Into<String>, normalized: bool) -> Self {
        Self {
            vector,
            model_name: model_name.into(),
            normalized,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.vector
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn embedding_dim(&self) -> usize {
        self.vector.len()
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// True when the vector has zero magnitude; cosine against it is `0.0`.
    pub fn is_degenerate(&self) -> bool {
        l2_norm(&self.vector) == 0.0
    }

    /// Cosine similarity against another vector from the same provider.
    ///
    /// Vectors of different dimension were not produced by the same model and
    /// cannot be compared.
    pub fn similarity(&self, other: &EmbeddingVector) -> Result<f32, SemanticError> {
        if self.embedding_dim() != other.embedding_dim() {
            return Err(SemanticError::DimensionMismatch {
                expected: self.embedding_dim(),
                actual: other.embedding_dim(),
            });
        }
        Ok(cosine_similarity(&self.vector, &other.vector))
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_report_construction_values() {
        let v = EmbeddingVector::new(vec![0.1, 0.2, 0.3], "test-model", false);
        assert_eq!(v.as_slice(), &[0.1, 0.2, 0.3]);
        assert_eq!(v.model_name(), "test-model");
        assert_eq!(v.embedding_dim(), 3);
        assert!(!v.is_normalized());
        assert!(!v.is_degenerate());
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let v = EmbeddingVector::new(vec![0.0; 4], "m", true);
        assert!(v.is_degenerate());
        let other = EmbeddingVector::new(vec![1.0, 0.0, 0.0, 0.0], "m", true);
        assert_eq!(v.similarity(&other).unwrap(), 0.0);
    }

    #[test]
    fn similarity_rejects_dimension_mismatch() {
        let a = EmbeddingVector::new(vec![1.0, 0.0], "m", true);
        let b = EmbeddingVector::new(vec![1.0, 0.0, 0.0], "m", true);
        assert_eq!(
            a.similarity(&b),
            Err(SemanticError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn serde_roundtrip() {
        let v = EmbeddingVector::new(vec![0.5, -0.5], "bge-small", true);
        let json = serde_json::to_string(&v).unwrap();
        let back: EmbeddingVector = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
