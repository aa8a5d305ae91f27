//! Sample conversation and retrieval-context loading.
//!
//! A samples directory holds pairs of files matched by sorted position:
//! `sample-chat*.json` with `{"conversation_turns": [{"role", "message"}]}`
//! and `sample_context*.json` with `{"data": {"vector_data": [{"text", ..}]}}`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const CHAT_PREFIX: &str = "sample-chat";
const CONTEXT_PREFIX: &str = "sample_context";

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "missing sample conversation or context data: \
         {chats} chat file(s), {contexts} context file(s)"
    )]
    UnpairedFiles { chats: usize, contexts: usize },

    #[error("conversation {requested} out of range; {available} sample conversation(s) available")]
    OutOfRange { requested: usize, available: usize },

    #[error("no user message found in conversation")]
    NoUserMessage,
}

/// Paired sample files discovered in one directory.
#[derive(Debug, Clone)]
pub struct SampleSet {
    chats: Vec<PathBuf>,
    contexts: Vec<PathBuf>,
}

impl SampleSet {
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, SampleError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| SampleError::Read {
            path: dir.display().to_string(),
            source,
        })?;

        let mut chats = Vec::new();
        let mut contexts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SampleError::Read {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".json") {
                continue;
            }
            if name.starts_with(CHAT_PREFIX) {
                chats.push(path);
            } else if name.starts_with(CONTEXT_PREFIX) {
                contexts.push(path);
            }
        }

        if chats.len() != contexts.len() {
            return Err(SampleError::UnpairedFiles {
                chats: chats.len(),
                contexts: contexts.len(),
            });
        }
        chats.sort();
        contexts.sort();
        debug!(dir = %dir.display(), pairs = chats.len(), "samples_discovered");
        Ok(Self { chats, contexts })
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Load conversation `n`, counting from 1.
    pub fn load(&self, n: usize) -> Result<Sample, SampleError> {
        if n == 0 || n > self.len() {
            return Err(SampleError::OutOfRange {
                requested: n,
                available: self.len(),
            });
        }
        let chat: ChatFile = read_json(&self.chats[n - 1])?;
        let context: ContextFile = read_json(&self.contexts[n - 1])?;
        Ok(Sample {
            turns: chat.conversation_turns,
            vector_data: context.data.vector_data,
        })
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SampleError> {
    let raw = fs::read_to_string(path).map_err(|source| SampleError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SampleError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorRecord {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct ChatFile {
    conversation_turns: Vec<ConversationTurn>,
}

#[derive(Deserialize)]
struct ContextFile {
    data: ContextData,
}

#[derive(Deserialize)]
struct ContextData {
    vector_data: Vec<VectorRecord>,
}

/// One conversation with its retrieved context.
#[derive(Debug, Clone)]
pub struct Sample {
    pub turns: Vec<ConversationTurn>,
    pub vector_data: Vec<VectorRecord>,
}

impl Sample {
    /// The most recent turn whose role is `user`, ignoring case.
    pub fn last_user_message(&self) -> Result<&str, SampleError> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role.eq_ignore_ascii_case("user"))
            .map(|turn| turn.message.as_str())
            .ok_or(SampleError::NoUserMessage)
    }

    /// First `k` context texts in order; records without text are skipped.
    pub fn context_texts(&self, k: usize) -> Vec<String> {
        self.vector_data
            .iter()
            .filter_map(|record| record.text.clone())
            .take(k)
            .collect()
    }
}
