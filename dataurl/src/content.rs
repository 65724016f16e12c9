//! Content transcoding for the part of a data URL after the comma.
//!
//! Content is either base64 (RFC 4648 standard alphabet, padded) or
//! percent-encoded UTF-8 text. [`Base64Bytes`] wraps the base64 side so the
//! encoded form can be passed around without re-validating it.

use std::fmt::{self, Display, Formatter};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::DataUrlError;

/// Bytes left as-is in percent-encoded content: unreserved characters plus
/// the sub-delimiters allowed in the password part of a URL.
const CONTENT_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// A wrapper for base64-encoded byte data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Bytes(pub Vec<u8>);

impl Base64Bytes {
    /// Decodes the base64 string bytes to raw binary data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        b64.decode(&self.0)
    }

    /// Encodes raw binary data into base64 string bytes.
    pub fn encode<T: AsRef<[u8]>>(input: T) -> Self {
        Self(b64.encode(input.as_ref()).into_bytes())
    }

    /// Returns the encoded form as text.
    ///
    /// The base64 alphabet is ASCII, so this only allocates.
    #[must_use]
    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl AsRef<[u8]> for Base64Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Base64Bytes {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl Display for Base64Bytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Decodes the content part of a data URL into raw bytes.
///
/// # Errors
///
/// Returns [`DataUrlError::InvalidContentEncoding`] if `base64` is set and the
/// content is not valid padded base64, or if `base64` is unset and the content
/// has a broken `%` escape or does not decode to UTF-8.
pub fn decode(content: &str, base64: bool) -> Result<Vec<u8>, DataUrlError> {
    if base64 {
        return Ok(Base64Bytes::from(content).decode()?);
    }
    check_escapes(content)?;
    let bytes: Vec<u8> = percent_decode_str(content).collect();
    Ok(String::from_utf8(bytes)?.into_bytes())
}

/// Encodes raw bytes as the content part of a data URL.
///
/// # Errors
///
/// Returns [`DataUrlError::UnencodableBytes`] if `base64` is unset and `data`
/// is not valid UTF-8.
pub fn encode(data: &[u8], base64: bool) -> Result<String, DataUrlError> {
    if base64 {
        return Ok(Base64Bytes::encode(data).into_string());
    }
    let text = std::str::from_utf8(data).map_err(|_| DataUrlError::UnencodableBytes)?;
    Ok(utf8_percent_encode(text, CONTENT_SAFE).to_string())
}

/// Rejects a `%` that is not followed by two hex digits.
fn check_escapes(content: &str) -> Result<(), DataUrlError> {
    let bytes = content.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        let escape = bytes.get(at + 1..at + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(DataUrlError::InvalidContentEncoding(format!(
                "invalid percent escape at byte {at}"
            )));
        }
        i = at + 3;
    }
    Ok(())
}
