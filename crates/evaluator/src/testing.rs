//! Deterministic embedding providers for tests and benchmarks.

use async_trait::async_trait;
use semantic::{EmbeddingProvider, EmbeddingVector, SemanticError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const KEYWORD_DIM: usize = 256;

/// Exact bag-of-words embedder.
///
/// Each distinct lowercase alphanumeric word gets its own axis the first
/// time it is seen, so cosine equals the normalized word-count overlap of two
/// texts (exact while fewer than 256 distinct words have been seen).
#[derive(Debug, Default)]
pub struct KeywordEmbedder {
    vocabulary: Mutex<HashMap<String, usize>>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    fn axis(&self, word: &str) -> usize {
        let mut vocab = self
            .vocabulary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = vocab.len();
        *vocab.entry(word.to_string()).or_insert(next) % KEYWORD_DIM
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword-test"
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        let mut v = vec![0f32; KEYWORD_DIM];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            v[self.axis(&word.to_lowercase())] += 1.0;
        }
        Ok(EmbeddingVector::new(v, "keyword-test", false))
    }
}

/// Returns preset vectors for exact texts; anything else is `Unavailable`.
#[derive(Debug, Default, Clone)]
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn model_name(&self) -> &str {
        "fixed-test"
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        self.vectors
            .get(text)
            .map(|v| EmbeddingVector::new(v.clone(), "fixed-test", false))
            .ok_or_else(|| SemanticError::Unavailable(format!("no fixture for {text:?}")))
    }
}

/// Always fails with `Unavailable`.
#[derive(Debug, Default, Clone)]
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn model_name(&self) -> &str {
        "failing-test"
    }

    async fn embed(&self, _text: &str) -> Result<EmbeddingVector, SemanticError> {
        Err(SemanticError::Unavailable("model offline".into()))
    }
}

/// Wraps another provider and counts how many texts reach it.
pub struct CountingEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            texts: AtomicUsize::new(0),
        }
    }

    /// Texts forwarded so far, counting each batch entry.
    pub fn embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        self.texts.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }
}
