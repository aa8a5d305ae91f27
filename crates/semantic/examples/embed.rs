use std::{env, error::Error};

use semantic::{build_provider, cosine_similarity, SemanticConfig};

/// Embeds two texts and prints their cosine similarity.
///
/// Uses the API backend when `RAGSCORE_EMBED_API_URL` is set, the hashed stub otherwise.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let left = args
        .next()
        .unwrap_or_else(|| "Paris is the capital of France.".into());
    let right = args
        .next()
        .unwrap_or_else(|| "The capital of France is Paris.".into());

    let mut cfg = SemanticConfig::default();
    if let Ok(url) = env::var("RAGSCORE_EMBED_API_URL") {
        cfg.mode = "api".into();
        cfg.api_url = Some(url);
        cfg.api_auth_header = env::var("RAGSCORE_EMBED_API_TOKEN")
            .ok()
            .map(|token| format!("Bearer {token}"));
    }

    let provider = build_provider(&cfg)?;
    let vectors = provider.embed_batch(&[&left, &right]).await?;
    println!("mode: {}", cfg.mode);
    println!("model: {}", provider.model_name());
    println!("dim: {}", vectors[0].embedding_dim());
    println!(
        "cosine: {:.4}",
        cosine_similarity(vectors[0].as_slice(), vectors[1].as_slice())
    );

    Ok(())
}
