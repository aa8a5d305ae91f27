use std::io;
use thiserror::Error;

/// Errors that can occur while building or running the normalizer.
#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read stop-word list {path}: {source}")]
    StopWordsRead {
        path: String,
        #[source]
        source: io::Error,
    },
}
