//! Answer generation and its accounting.
//!
//! Scoring never depends on how an answer was produced. This module only
//! exists so the pipeline can report latency, token counts and an estimated
//! cost next to the scores.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

/// Errors raised while producing or accounting for an answer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    /// The backend response lacks a field or carries the wrong type.
    #[error("generation response is missing field '{0}'")]
    MissingField(String),

    /// Transport or HTTP status failure.
    #[error("generation request failed (status {status:?}): {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}

/// Raw output of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub answer_text: String,
    pub input_token_count: u64,
    pub output_token_count: u64,
    /// Backend-reported duration in nanoseconds.
    pub total_duration: u64,
}

impl GenerationResult {
    /// Validate an Ollama `/api/generate` response body.
    ///
    /// Reads `response`, `prompt_eval_count`, `eval_count` and
    /// `total_duration`; anything absent or mistyped is rejected.
    pub fn from_ollama_json(body: &Value) -> Result<Self, GenerationError> {
        let answer_text = body
            .get("response")
            .and_then(Value::as_str)
            .ok_or_else(|| GenerationError::MissingField("response".into()))?
            .to_owned();

        Ok(Self {
            answer_text,
            input_token_count: required_u64(body, "prompt_eval_count")?,
            output_token_count: required_u64(body, "eval_count")?,
            total_duration: required_u64(body, "total_duration")?,
        })
    }
}

fn required_u64(body: &Value, field: &str) -> Result<u64, GenerationError> {
    body.get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| GenerationError::MissingField(field.to_owned()))
}

/// Per-token prices used to estimate the cost of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_cost_per_token: f64,
    pub output_cost_per_token: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_cost_per_token: 1.750 / 1_000_000.0,
            output_cost_per_token: 14.000 / 1_000_000.0,
        }
    }
}

impl Pricing {
    pub fn estimate(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 * self.input_cost_per_token
            + output_tokens as f64 * self.output_cost_per_token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

/// What the pipeline reports about a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub answer: String,
    /// Wall-clock latency of the call as seen by the caller.
    pub latency_ms: f64,
    pub tokens: TokenCounts,
    pub estimated_cost: f64,
}

impl GenerationReport {
    pub fn new(result: GenerationResult, elapsed: Duration, pricing: &Pricing) -> Self {
        let input = result.input_token_count;
        let output = result.output_token_count;
        Self {
            answer: result.answer_text,
            latency_ms: elapsed.as_nanos() as f64 / 1_000_000.0,
            tokens: TokenCounts {
                input,
                output,
                total: input + output,
            },
            estimated_cost: pricing.estimate(input, output),
        }
    }
}

/// Grounded-answer prompt: the model may only use the supplied context.
pub fn build_prompt<S: AsRef<str>>(context_texts: &[S], question: &str) -> String {
    let context = context_texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a helpful AI assistant.\n\n\
         Answer the user's question using only the information provided in the context below.\n\
         Do not use any outside knowledge.\n\
         If the answer is not clearly supported by the context, say that you do not know.\n\n\
         Context:\n{context}\n\n\
         User question:\n{question}\n"
    )
}

/// Anything that can answer a question from retrieved chunks.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        chunks: &[String],
    ) -> Result<GenerationResult, GenerationError>;
}

/// Calls a local Ollama server's `/api/generate` endpoint without streaming.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &'static str = "mistral";

    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GenerationError::InvalidConfig(
                "ollama base url must not be empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{base_url}/api/generate"),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(
        &self,
        question: &str,
        chunks: &[String],
    ) -> Result<GenerationResult, GenerationError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(chunks, question),
            "stream": false,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Http {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Http {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: Value = response.json().await.map_err(|e| GenerationError::Http {
            status: Some(status.as_u16()),
            message: format!("response body is not JSON: {e}"),
        })?;
        let result = GenerationResult::from_ollama_json(&body)?;
        debug!(
            model = %self.model,
            input_tokens = result.input_token_count,
            output_tokens = result.output_token_count,
            "answer_generated"
        );
        Ok(result)
    }
}
