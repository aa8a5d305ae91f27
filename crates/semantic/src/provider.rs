use async_trait::async_trait;

use crate::error::SemanticError;
use crate::types::EmbeddingVector;

/// The one seam between scoring and whatever computes embeddings.
///
/// Implementations must be pure functions of the input text for a given
/// model: embedding the same string twice yields the same vector. Retries,
/// batching and caching wrap this trait; scorers never see them.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Label surfaced on every produced vector.
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError>;

    /// Embed several texts, preserving order.
    ///
    /// The default issues one [`embed`](Self::embed) per text; backends with a
    /// native batch endpoint override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
