//! Splits a candidate string into the three parts of a data URL.
//!
//! ```text
//! data:[<mediatype>][;base64],<data>
//! ```
//!
//! The media type is the shortest run of characters up to either `;base64,`
//! or the first comma, and the content is everything after that comma. The
//! whole input has to match; a missing comma is a failure, not an empty
//! payload.

use std::sync::LazyLock;

use regex::Regex;

/// The scheme matches case-insensitively and content may span newlines.
static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?i:data):(.*?)(;base64)?,(.*)\z").expect("data URL grammar is valid")
});

/// The raw textual parts of a data URL, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Components<'a> {
    /// Media type token, `None` if it was omitted or empty.
    pub media_type: Option<&'a str>,
    /// Whether the `;base64` tag sits directly before the comma.
    pub base64: bool,
    /// Everything after the separating comma, still encoded.
    pub content: &'a str,
}

/// Matches `input` against the data URL grammar.
///
/// Returns `None` when the input is not a data URL at all.
#[must_use]
pub fn decompose(input: &str) -> Option<Components<'_>> {
    let captures = DATA_URL.captures(input)?;
    let media_type = captures
        .get(1)
        .map(|m| m.as_str())
        .filter(|token| !token.is_empty());
    let base64 = captures.get(2).is_some();
    let content = captures.get(3).map_or("", |m| m.as_str());
    Some(Components {
        media_type,
        base64,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_base64() {
        let parts = decompose("data:text/plain;base64,SGVsbG8=").unwrap();
        assert_eq!(parts.media_type, Some("text/plain"));
        assert!(parts.base64);
        assert_eq!(parts.content, "SGVsbG8=");
    }

    #[test]
    fn test_decompose_plain() {
        let parts = decompose("data:text/plain,Hello%20World").unwrap();
        assert_eq!(parts.media_type, Some("text/plain"));
        assert!(!parts.base64);
        assert_eq!(parts.content, "Hello%20World");
    }

    #[test]
    fn test_decompose_no_media_type() {
        let parts = decompose("data:,Hello").unwrap();
        assert_eq!(parts.media_type, None);
        assert!(!parts.base64);
        assert_eq!(parts.content, "Hello");
    }

    #[test]
    fn test_decompose_base64_without_media_type() {
        let parts = decompose("data:;base64,AAEC").unwrap();
        assert_eq!(parts.media_type, None);
        assert!(parts.base64);
        assert_eq!(parts.content, "AAEC");
    }

    #[test]
    fn test_decompose_empty_content() {
        let parts = decompose("data:,").unwrap();
        assert_eq!(parts.media_type, None);
        assert_eq!(parts.content, "");
    }

    #[test]
    fn test_decompose_splits_at_first_comma() {
        let parts = decompose("data:text/csv,a,b;base64,c").unwrap();
        assert_eq!(parts.media_type, Some("text/csv"));
        assert!(!parts.base64);
        assert_eq!(parts.content, "a,b;base64,c");
    }

    #[test]
    fn test_decompose_keeps_parameters_in_media_token() {
        let parts = decompose("data:text/plain;charset=utf-8;base64,SGk=").unwrap();
        assert_eq!(parts.media_type, Some("text/plain;charset=utf-8"));
        assert!(parts.base64);
    }

    #[test]
    fn test_decompose_base64_tag_must_precede_comma() {
        let parts = decompose("data:text/plain;base64x,abc").unwrap();
        assert_eq!(parts.media_type, Some("text/plain;base64x"));
        assert!(!parts.base64);
    }

    #[test]
    fn test_decompose_scheme_case_insensitive() {
        let parts = decompose("DATA:image/png;base64,AA==").unwrap();
        assert_eq!(parts.media_type, Some("image/png"));
    }

    #[test]
    fn test_decompose_content_spans_newlines() {
        let parts = decompose("data:,line1\nline2").unwrap();
        assert_eq!(parts.content, "line1\nline2");
    }

    #[test]
    fn test_decompose_rejects_non_data_url() {
        assert!(decompose("not-a-data-url").is_none());
        assert!(decompose("https://example.com/,x").is_none());
        assert!(decompose(" data:,x").is_none());
    }

    #[test]
    fn test_decompose_requires_comma() {
        assert!(decompose("data:text/plain;base64SGVsbG8=").is_none());
        assert!(decompose("data:").is_none());
    }
}
