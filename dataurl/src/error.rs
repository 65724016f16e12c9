//! Error types for data URL parsing and serialization.
//!
//! The string entry points on [`DataUrl`](crate::DataUrl) report failure as
//! `None`; the `try_*` variants and the [`FromStr`](std::str::FromStr) impls
//! return a [`DataUrlError`] describing which step rejected the input.

/// Errors produced while decomposing, decoding or rendering a data URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DataUrlError {
    /// The input does not have the `data:[<mediatype>][;base64],<data>` shape.
    #[error("Input is not a data URL")]
    MalformedGrammar,
    /// The content part is not valid base64, or percent-decodes to
    /// something that is not UTF-8 text.
    #[error("Invalid content encoding: {0}")]
    InvalidContentEncoding(String),
    /// The payload is not UTF-8 and cannot be written without base64.
    #[error("Payload is not valid UTF-8 and cannot be percent-encoded")]
    UnencodableBytes,
    /// The media type token is not a `type/subtype` MIME type.
    #[error("Malformed media type {0:?}")]
    MalformedMediaType(String),
    /// The rendered string was rejected by the URL parser.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<base64::DecodeError> for DataUrlError {
    fn from(value: base64::DecodeError) -> Self {
        Self::InvalidContentEncoding(value.to_string())
    }
}

impl From<std::string::FromUtf8Error> for DataUrlError {
    fn from(value: std::string::FromUtf8Error) -> Self {
        Self::InvalidContentEncoding(value.to_string())
    }
}
