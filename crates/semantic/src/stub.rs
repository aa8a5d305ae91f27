use async_trait::async_trait;
use fxhash::hash64;

use crate::provider::EmbeddingProvider;
use crate::similarity::l2_normalize_in_place;
use crate::{EmbeddingVector, SemanticConfig, SemanticError};

/// Deterministic offline embedder used when `mode` is `"fast"`.
///
/// Each lowercase alphanumeric word is hashed into one of `dimension` buckets
/// with a hash-derived sign, so texts sharing vocabulary land close together.
/// Text without any word characters maps to the zero vector.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Self {
        Self {
            model_name: cfg.model_name.clone(),
            dimension: cfg.stub_dimension(),
            normalize: cfg.normalize,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn vectorize(&self, text: &str) -> EmbeddingVector {
        let mut v = vec![0f32; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let h = hash64(word.to_lowercase().as_bytes());
            let idx = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        EmbeddingVector::new(v, self.model_name.clone(), self.normalize)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}
