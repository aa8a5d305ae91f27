#![allow(dead_code)]

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use ragscore::{AnswerGenerator, GenerationError, GenerationResult};
use serde_json::json;
use tempfile::TempDir;

pub const QUESTION: &str = "What is the capital of France?";
pub const ANSWER: &str = "Paris is the capital of France.";
pub const CHUNK: &str = "Paris is the capital and largest city of France.";

/// Writes one `sample-chat` / `sample_context` pair per conversation.
pub fn write_samples(dir: &Path, conversations: &[(&str, &[&str])]) {
    for (i, (question, chunks)) in conversations.iter().enumerate() {
        let n = i + 1;
        let chat = json!({
            "conversation_turns": [
                {"role": "User", "message": "Hello there."},
                {"role": "assistant", "message": "Hi! How can I help?"},
                {"role": "user", "message": question},
            ]
        });
        let vectors: Vec<_> = chunks
            .iter()
            .enumerate()
            .map(|(j, text)| json!({"id": format!("doc-{n}-{j}"), "text": text}))
            .collect();
        let context = json!({ "data": { "vector_data": vectors } });

        fs::write(dir.join(format!("sample-chat-{n}.json")), chat.to_string()).unwrap();
        fs::write(
            dir.join(format!("sample_context_{n}.json")),
            context.to_string(),
        )
        .unwrap();
    }
}

pub fn paris_samples() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_samples(
        dir.path(),
        &[(QUESTION, &[CHUNK, "The Seine flows through Paris."])],
    );
    dir
}

/// Returns a canned answer and token counts.
pub struct CannedGenerator {
    pub answer: String,
}

impl CannedGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_owned(),
        }
    }
}

#[async_trait]
impl AnswerGenerator for CannedGenerator {
    async fn generate(
        &self,
        _question: &str,
        chunks: &[String],
    ) -> Result<GenerationResult, GenerationError> {
        Ok(GenerationResult {
            answer_text: self.answer.clone(),
            input_token_count: 40 + chunks.len() as u64 * 10,
            output_token_count: 8,
            total_duration: 2_000_000,
        })
    }
}

pub struct BrokenGenerator;

#[async_trait]
impl AnswerGenerator for BrokenGenerator {
    async fn generate(
        &self,
        _question: &str,
        _chunks: &[String],
    ) -> Result<GenerationResult, GenerationError> {
        Err(GenerationError::MissingField("response".into()))
    }
}
