//! Whitespace normalization.
//!
//! Splits on any Unicode whitespace run and joins with single ASCII spaces,
//! so the result never has leading or trailing whitespace.
//!
//! ```rust
//! use lexical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  Paris \n is\tthe capital "), "Paris is the capital");
//! ```

/// Collapses repeated whitespace and trims the edges.
///
/// Returns an empty string for empty or whitespace-only input.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("a\t\tb\r\n c"), "a b c");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(collapse_whitespace(" \n\t\u{00A0} "), "");
    }

    #[test]
    fn already_collapsed_is_unchanged() {
        assert_eq!(collapse_whitespace("one two"), "one two");
    }
}
