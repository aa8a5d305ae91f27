use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

use crate::provider::EmbeddingProvider;
use crate::retry::{execute_with_retry_async, RetryConfig};
use crate::similarity::l2_normalize_in_place;
use crate::{EmbeddingVector, SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    fn from_hint(hint: Option<&str>) -> Self {
        match hint.unwrap_or("custom").to_ascii_lowercase().as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// Embeds text through a remote HTTP JSON endpoint.
///
/// Requests are split into chunks of `max_batch_size`, each sent with the
/// configured retry policy. Every vector returned during the embedder's
/// lifetime must share the dimension of the first one.
#[derive(Debug)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    provider: ApiProviderKind,
    model_name: String,
    normalize: bool,
    max_batch_size: usize,
    retry: RetryConfig,
    dimension: OnceLock<usize>,
}

impl ApiEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SemanticError::InvalidConfig("api_url is required for api mode".into())
            })?;

        let timeout = Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| {
                SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            auth_header: cfg.api_auth_header.clone(),
            provider: ApiProviderKind::from_hint(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
            max_batch_size: cfg.max_batch_size.max(1),
            retry: cfg.retry_config.unwrap_or_default(),
            dimension: OnceLock::new(),
        })
    }

    async fn embed_chunk(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        let payload = build_api_payload(self.provider, texts, &self.model_name);

        let outcome = execute_with_retry_async(
            &self.retry,
            |_attempt| self.send_api_request(payload.clone()),
            SemanticError::is_retryable,
        )
        .await;
        let attempts = outcome.attempts;
        if !outcome.succeeded() {
            warn!(
                url = %self.url,
                attempts,
                total_duration_ms = outcome.total_duration.as_millis() as u64,
                "embedding_request_failed"
            );
        }
        let response = outcome.into_result().map_err(|err| match err {
            SemanticError::Http { .. } => SemanticError::Unavailable(format!(
                "embedding request to {} failed after {attempts} attempt(s): {err}",
                self.url
            )),
            other => other,
        })?;

        let vectors = parse_embeddings_from_value(response)?;
        if vectors.len() != texts.len() {
            return Err(SemanticError::InvalidResponse(format!(
                "API returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        vectors
            .into_iter()
            .map(|mut vector| {
                self.check_dimension(vector.len())?;
                if self.normalize {
                    l2_normalize_in_place(&mut vector);
                }
                Ok(EmbeddingVector::new(
                    vector,
                    self.model_name.clone(),
                    self.normalize,
                ))
            })
            .collect()
    }

    fn check_dimension(&self, actual: usize) -> Result<(), SemanticError> {
        if actual == 0 {
            return Err(SemanticError::InvalidResponse(
                "API returned an empty embedding".into(),
            ));
        }
        let expected = *self.dimension.get_or_init(|| actual);
        if expected != actual {
            return Err(SemanticError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }

    async fn send_api_request(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| SemanticError::Http {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Http {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        self.embed_chunk(&[text])
            .await?
            .pop()
            .ok_or_else(|| SemanticError::InvalidResponse("API returned no embeddings".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, SemanticError> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.max_batch_size) {
            debug!(batch_size = chunk.len(), url = %self.url, "embedding_batch_request");
            out.extend(self.embed_chunk(chunk).await?);
        }
        Ok(out)
    }
}

/// Single inputs are sent in the scalar form each provider expects.
fn build_api_payload(provider: ApiProviderKind, texts: &[&str], model_name: &str) -> Value {
    let single = texts.len() == 1;
    match (provider, single) {
        (ApiProviderKind::HuggingFace, true) => json!({ "inputs": texts[0] }),
        (ApiProviderKind::HuggingFace, false) => json!({ "inputs": texts }),
        (ApiProviderKind::OpenAI, true) => json!({ "input": texts[0], "model": model_name }),
        (ApiProviderKind::OpenAI, false) => json!({ "input": texts, "model": model_name }),
        (ApiProviderKind::Custom, true) => json!({ "text": texts[0] }),
        (ApiProviderKind::Custom, false) => json!({ "texts": texts }),
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }
            if let Some(embedding) = map.remove("embedding") {
                return parse_embedding_vector(embedding).map(|v| vec![v]);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                SemanticError::InvalidResponse(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(SemanticError::InvalidResponse(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }

            Err(SemanticError::InvalidResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::InvalidResponse("non-finite embedding value".into())
                }),
                other => Err(SemanticError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::InvalidResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/embed")
    }

    fn api_config(url: String, provider: &str) -> SemanticConfig {
        SemanticConfig {
            mode: "api".into(),
            api_url: Some(url),
            api_provider: Some(provider.into()),
            normalize: false,
            retry_config: Some(
                RetryConfig::default()
                    .with_max_retries(2)
                    .with_base_delay(Duration::from_millis(1))
                    .with_jitter(false),
            ),
            ..SemanticConfig::default()
        }
    }

    /// Echo server for the custom payload shape: embeds each text as
    /// `[len, 1.0]`.
    fn custom_router() -> Router {
        Router::new().route(
            "/embed",
            post(|Json(body): Json<Value>| async move {
                let texts: Vec<String> = match (body.get("texts"), body.get("text")) {
                    (Some(Value::Array(items)), _) => items
                        .iter()
                        .map(|v| v.as_str().unwrap_or_default().to_string())
                        .collect(),
                    (_, Some(Value::String(text))) => vec![text.clone()],
                    _ => Vec::new(),
                };
                let vectors: Vec<Vec<f32>> =
                    texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect();
                Json(json!({ "embeddings": vectors }))
            }),
        )
    }

    #[test]
    fn provider_hint_parsing() {
        assert_eq!(
            ApiProviderKind::from_hint(Some("HF")),
            ApiProviderKind::HuggingFace
        );
        assert_eq!(
            ApiProviderKind::from_hint(Some("openai")),
            ApiProviderKind::OpenAI
        );
        assert_eq!(ApiProviderKind::from_hint(None), ApiProviderKind::Custom);
    }

    #[test]
    fn payload_shapes() {
        assert_eq!(
            build_api_payload(ApiProviderKind::HuggingFace, &["a"], "m"),
            json!({ "inputs": "a" })
        );
        assert_eq!(
            build_api_payload(ApiProviderKind::OpenAI, &["a", "b"], "m"),
            json!({ "input": ["a", "b"], "model": "m" })
        );
        assert_eq!(
            build_api_payload(ApiProviderKind::Custom, &["a", "b"], "m"),
            json!({ "texts": ["a", "b"] })
        );
    }

    #[test]
    fn parse_embedding_collection_various_formats() {
        let nested = parse_embedding_collection(json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0], vec![1.0, 2.0, 3.0]);

        let single = parse_embedding_collection(json!([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(single, vec![vec![1.0, 2.0, 3.0]]);

        assert!(parse_embedding_collection(json!([])).unwrap().is_empty());
    }

    #[test]
    fn parse_openai_data_shape() {
        let value = json!({ "data": [{ "embedding": [0.1, 0.2] }, { "embedding": [0.3, 0.4] }] });
        let vectors = parse_embeddings_from_value(value).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![0.3, 0.4]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_embeddings_from_value(json!({ "result": 1 })),
            Err(SemanticError::InvalidResponse(_))
        ));
        assert!(parse_embeddings_from_value(json!([["x"]])).is_err());
        assert!(parse_embeddings_from_value(json!({ "data": [{ "vector": [1.0] }] })).is_err());
    }

    #[test]
    fn new_requires_url() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            ..SemanticConfig::default()
        };
        assert!(matches!(
            ApiEmbedder::new(&cfg),
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn embeds_single_and_batch_against_local_server() {
        let url = spawn(custom_router()).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();

        let one = embedder.embed("abc").await.unwrap();
        assert_eq!(one.as_slice(), &[3.0, 1.0]);

        let many = embedder.embed_batch(&["a", "abcd"]).await.unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].as_slice(), &[4.0, 1.0]);
    }

    #[tokio::test]
    async fn splits_large_batches() {
        let requests = Arc::new(AtomicU32::new(0));
        let counter = requests.clone();
        let router = Router::new().route(
            "/embed",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let n = body["texts"].as_array().map(Vec::len).unwrap_or(1);
                    Json(json!(vec![vec![1.0f32, 0.0]; n]))
                }
            }),
        );
        let url = spawn(router).await;
        let cfg = SemanticConfig {
            max_batch_size: 2,
            ..api_config(url, "custom")
        };
        let embedder = ApiEmbedder::new(&cfg).unwrap();
        let out = embedder.embed_batch(&["a", "b", "c", "d", "e"]).await.unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err((StatusCode::SERVICE_UNAVAILABLE, "warming up"))
                    } else {
                        Ok(Json(json!({ "embeddings": [[0.5, 0.5]] })))
                    }
                }
            }),
        );
        let url = spawn(router).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();
        let v = embedder.embed("hello").await.unwrap();
        assert_eq!(v.as_slice(), &[0.5, 0.5]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_are_unavailable() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::BAD_GATEWAY, "down")
                }
            }),
        );
        let url = spawn(router).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, SemanticError::Unavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::UNAUTHORIZED, "bad token")
                }
            }),
        );
        let url = spawn(router).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();
        assert!(matches!(
            embedder.embed("hello").await,
            Err(SemanticError::Unavailable(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inconsistent_dimensions_are_rejected() {
        let router = Router::new().route(
            "/embed",
            post(|| async { Json(json!({ "embeddings": [[1.0, 0.0], [1.0, 0.0, 0.0]] })) }),
        );
        let url = spawn(router).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();
        assert_eq!(
            embedder.embed_batch(&["a", "b"]).await.unwrap_err(),
            SemanticError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[tokio::test]
    async fn count_mismatch_is_invalid_response() {
        let router = Router::new().route(
            "/embed",
            post(|| async { Json(json!({ "embeddings": [[1.0, 0.0]] })) }),
        );
        let url = spawn(router).await;
        let embedder = ApiEmbedder::new(&api_config(url, "custom")).unwrap();
        assert!(matches!(
            embedder.embed_batch(&["a", "b"]).await,
            Err(SemanticError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn sends_authorization_header() {
        let router = Router::new().route(
            "/embed",
            post(|headers: axum::http::HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer secret") => Ok(Json(json!([[1.0, 2.0]]))),
                    _ => Err(StatusCode::UNAUTHORIZED),
                }
            }),
        );
        let url = spawn(router).await;
        let cfg = SemanticConfig {
            api_auth_header: Some("Bearer secret".into()),
            ..api_config(url, "hf")
        };
        let embedder = ApiEmbedder::new(&cfg).unwrap();
        assert_eq!(embedder.embed("x").await.unwrap().as_slice(), &[1.0, 2.0]);
    }
}
