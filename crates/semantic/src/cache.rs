use async_trait::async_trait;
use lexical::collapse_whitespace;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::trace;

use crate::provider::EmbeddingProvider;
use crate::{EmbeddingVector, SemanticError};

const DEFAULT_CAPACITY: usize = 1024;

/// LRU memo in front of any provider.
///
/// Keys are the input text with whitespace runs collapsed, so `"a  b"` and
/// `"a b"` share an entry. Batch calls forward only the misses, in their
/// original relative order. Errors are never cached.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Mutex<LruCache<String, EmbeddingVector>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Option<EmbeddingVector> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: String, vector: EmbeddingVector) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, vector);
        }
    }
}

impl std::fmt::Debug for CachedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("model_name", &self.inner.model_name())
            .field("len", &self.len())
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        let key = collapse_whitespace(text);
        if let Some(hit) = self.lookup(&key) {
            trace!("embedding_cache_hit");
            return Ok(hit);
        }
        let vector = self.inner.embed(text).await?;
        self.store(key, vector.clone());
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        let keys: Vec<String> = texts.iter().map(|t| collapse_whitespace(t)).collect();
        let mut slots: Vec<Option<EmbeddingVector>> = keys.iter().map(|k| self.lookup(k)).collect();

        // Deduplicate misses so repeated texts within one batch are embedded once.
        let mut miss_keys: Vec<&str> = Vec::new();
        let mut miss_texts: Vec<&str> = Vec::new();
        for (idx, slot) in slots.iter().enumerate() {
            if slot.is_none() && !miss_keys.contains(&keys[idx].as_str()) {
                miss_keys.push(keys[idx].as_str());
                miss_texts.push(texts[idx]);
            }
        }

        trace!(
            total = texts.len(),
            misses = miss_texts.len(),
            "embedding_cache_batch"
        );

        if !miss_texts.is_empty() {
            let fresh = self.inner.embed_batch(&miss_texts).await?;
            if fresh.len() != miss_texts.len() {
                return Err(SemanticError::InvalidResponse(format!(
                    "provider returned {} embeddings for {} inputs",
                    fresh.len(),
                    miss_texts.len()
                )));
            }
            for (key, vector) in miss_keys.iter().zip(fresh) {
                for (idx, slot) in slots.iter_mut().enumerate() {
                    if slot.is_none() && keys[idx] == *key {
                        *slot = Some(vector.clone());
                    }
                }
                self.store((*key).to_string(), vector);
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| {
                    SemanticError::InvalidResponse("missing cached embedding".into())
                })
            })
            .collect()
    }
}
