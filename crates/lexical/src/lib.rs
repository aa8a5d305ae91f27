//! ragscore lexical layer.
//!
//! Reduces utterances to comparable token sets and splits answers into
//! sentences. Everything here is a pure function of the input text and the
//! configuration handed to [`Normalizer::new`]; no I/O happens after
//! construction.
//!
//! ## What we do
//!
//! - Unicode NFKC normalization
//! - Lowercasing and punctuation deletion
//! - Stop-word filtering against a newline-delimited word list
//! - Snowball (Porter2) English stemming
//! - UAX #29 sentence segmentation
//!
//! ```rust
//! use lexical::Normalizer;
//!
//! let normalizer = Normalizer::english();
//! let question = normalizer.normalize("What is the capital of France?");
//! let answer = normalizer.normalize("Paris is the capital of France.");
//! assert_eq!(question.overlap_ratio(&answer), 1.0);
//! ```

mod config;
mod error;
mod pipeline;
mod sentence;
mod stopwords;
mod token_set;
mod whitespace;

pub use crate::config::LexicalConfig;
pub use crate::error::LexicalError;
pub use crate::pipeline::Normalizer;
pub use crate::sentence::{segment_sentences, SentenceSegmenter, UnicodeSentenceSegmenter};
pub use crate::stopwords::StopWords;
pub use crate::token_set::TokenSet;
pub use crate::whitespace::collapse_whitespace;
