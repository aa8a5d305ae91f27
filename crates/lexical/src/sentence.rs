use unicode_segmentation::UnicodeSegmentation;

/// Splits text into an ordered sequence of sentences.
///
/// Implementations must return an empty vector for empty or whitespace-only
/// input and must never fail.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// UAX #29 sentence boundaries. Each sentence is trimmed; empty pieces are
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        segment_sentences(text)
    }
}

/// Free-function form of [`UnicodeSentenceSegmenter`].
pub fn segment_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_owned)
        .collect()
}
