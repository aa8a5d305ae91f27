//! ragscore semantic layer.
//!
//! Turns text into dense vectors and compares them. Scorers only ever talk to
//! the [`EmbeddingProvider`] trait; which backend sits behind it is decided
//! once, from [`SemanticConfig`], by [`build_provider`].
//!
//! Backends:
//!
//! - **fast** - [`StubEmbedder`], a deterministic feature-hashed bag of words.
//!   No network, no model files. Good enough for tests and smoke runs.
//! - **api** - [`ApiEmbedder`], an HTTP JSON endpoint (Hugging Face, OpenAI
//!   or a custom `{"texts": [...]}` service) with retry and backoff.
//!
//! A failed embedding is always an error. There is no silent fallback to the
//! stub when the API is down; a score computed from fake vectors would be
//! worse than no score.
//!
//! ```
//! use semantic::{build_provider, cosine_similarity, SemanticConfig};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let provider = build_provider(&SemanticConfig::default()).unwrap();
//! let a = provider.embed("Paris is the capital of France").await.unwrap();
//! let b = provider.embed("the capital of France is Paris").await.unwrap();
//! assert!(cosine_similarity(a.as_slice(), b.as_slice()) > 0.99);
//! # });
//! ```
//!
//! ## Env vars to know
//!
//! The root crate maps `RAGSCORE_EMBED_API_URL` and `RAGSCORE_EMBED_API_TOKEN`
//! onto [`SemanticConfig::api_url`] and [`SemanticConfig::api_auth_header`].

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

mod api;
mod cache;
mod provider;
mod serde_millis;
mod similarity;
mod stub;

use std::sync::Arc;

pub use crate::api::ApiEmbedder;
pub use crate::cache::CachedEmbedder;
pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::provider::EmbeddingProvider;
pub use crate::similarity::{cosine_similarity, l2_norm};
pub use crate::stub::StubEmbedder;
pub use crate::types::EmbeddingVector;

/// Validates `cfg` and constructs the backend it selects.
pub fn build_provider(cfg: &SemanticConfig) -> Result<Arc<dyn EmbeddingProvider>, SemanticError> {
    cfg.validate()?;
    let provider: Arc<dyn EmbeddingProvider> = match cfg.mode.as_str() {
        "api" => Arc::new(ApiEmbedder::new(cfg)?),
        _ => Arc::new(StubEmbedder::new(cfg)),
    };
    tracing::debug!(
        mode = %cfg.mode,
        model = %cfg.model_name,
        "embedding_provider_built"
    );
    Ok(provider)
}
