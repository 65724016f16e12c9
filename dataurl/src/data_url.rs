//! The [`DataUrl`] value and its parse/serialize entry points.
//!
//! Parsing runs the input through the grammar, resolves the media type on a
//! best-effort basis, and then decodes the content. Only the grammar and the
//! content can make parsing fail; an unreadable media type is dropped.
//!
//! Serializing is the inverse: encode the content, format the media type and
//! assemble `data:<type>[;base64],<content>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use std::str::FromStr;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::{DataUrlError, MediaType, content, grammar, media_type};

/// Scheme prefix of every data URL.
pub const SCHEME_PREFIX: &str = "data:";

/// Tag that marks base64 content, placed directly before the comma.
pub const BASE64_TAG: &str = ";base64";

/// A decoded `data:` URL.
///
/// Holds the raw payload, an optional media type and whether the textual
/// form uses base64 or percent-encoded text.
///
/// # Serialization
///
/// Serializes to/from the URL string: `"data:text/plain;base64,SGVsbG8="`
///
/// # Example
///
/// ```rust
/// use dataurl::{DataUrl, MediaType};
///
/// let url = DataUrl::parse("data:text/plain;base64,SGVsbG8=").unwrap();
/// assert_eq!(url.data(), b"Hello");
/// assert_eq!(url.media_type(), Some(&MediaType::TEXT_PLAIN));
/// assert!(url.is_base64());
///
/// let text = DataUrl::new("Hello World", Some(MediaType::TEXT_PLAIN), false);
/// assert_eq!(text.to_url_string().unwrap(), "data:text/plain,Hello%20World");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataUrl {
    data: Vec<u8>,
    media_type: Option<MediaType>,
    base64: bool,
}

impl DataUrl {
    /// Creates a data URL from a raw payload.
    ///
    /// No validation happens here. A payload that is not UTF-8 combined with
    /// `base64 == false` is accepted but cannot be rendered; see
    /// [`DataUrl::try_to_url_string`].
    pub fn new<D: Into<Vec<u8>>>(data: D, media_type: Option<MediaType>, base64: bool) -> Self {
        Self {
            data: data.into(),
            media_type,
            base64,
        }
    }

    /// Creates a base64 data URL from a raw payload.
    pub fn from_bytes<D: Into<Vec<u8>>>(data: D, media_type: Option<MediaType>) -> Self {
        Self::new(data, media_type, true)
    }

    /// Creates a data URL whose payload is the UTF-8 encoding of `text`.
    ///
    /// Every Rust string is valid UTF-8, so this always returns `Some`; the
    /// `Option` mirrors the other fallible constructors.
    #[must_use]
    #[allow(clippy::unnecessary_wraps)]
    pub fn from_text(text: &str, media_type: Option<MediaType>, base64: bool) -> Option<Self> {
        Some(Self::new(text.as_bytes(), media_type, base64))
    }

    /// Parses a data URL, returning `None` if `input` is not one or its
    /// content cannot be decoded.
    ///
    /// An unparseable media type does not fail the parse; the result simply
    /// has no media type.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::try_parse(input).ok()
    }

    /// Parses a data URL, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::MalformedGrammar`] if `input` does not have the
    /// data URL shape, or [`DataUrlError::InvalidContentEncoding`] if the
    /// content is not valid for the declared encoding.
    #[cfg_attr(feature = "telemetry", instrument(level = "trace", skip_all, err(level = "debug")))]
    pub fn try_parse(input: &str) -> Result<Self, DataUrlError> {
        let parts = grammar::decompose(input).ok_or(DataUrlError::MalformedGrammar)?;
        let media_type = media_type::resolve(parts.media_type);
        let data = content::decode(parts.content, parts.base64)?;

        #[cfg(feature = "telemetry")]
        tracing::trace!(
            media_type = parts.media_type,
            base64 = parts.base64,
            len = data.len(),
            "Parsed data URL"
        );

        Ok(Self::new(data, media_type, parts.base64))
    }

    /// Parses the full textual form of `url` as a data URL.
    #[must_use]
    pub fn parse_url(url: &Url) -> Option<Self> {
        Self::parse(url.as_str())
    }

    /// Renders the canonical URL string, or `None` if the payload cannot be
    /// written in the chosen encoding.
    #[must_use]
    pub fn to_url_string(&self) -> Option<String> {
        self.try_to_url_string().ok()
    }

    /// Renders the canonical URL string.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::UnencodableBytes`] if the payload is not UTF-8
    /// and the value is not base64.
    #[cfg_attr(feature = "telemetry", instrument(level = "trace", skip_all, err(level = "debug")))]
    pub fn try_to_url_string(&self) -> Result<String, DataUrlError> {
        let content = content::encode(&self.data, self.base64)?;
        let media_type = media_type::format(self.media_type.as_ref());
        let tag = if self.base64 { BASE64_TAG } else { "" };
        Ok(format!("{SCHEME_PREFIX}{media_type}{tag},{content}"))
    }

    /// Renders the value as a [`Url`], or `None` if rendering fails.
    #[must_use]
    pub fn url(&self) -> Option<Url> {
        self.try_url().ok()
    }

    /// Renders the value as a [`Url`].
    ///
    /// # Errors
    ///
    /// Returns the error of [`DataUrl::try_to_url_string`], or
    /// [`DataUrlError::InvalidUrl`] if the URL parser rejects the string.
    pub fn try_url(&self) -> Result<Url, DataUrlError> {
        Ok(Url::parse(&self.try_to_url_string()?)?)
    }

    /// Returns the decoded payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the value and returns the decoded payload.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the payload as text if it is valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Returns the media type, if one was given.
    #[must_use]
    pub const fn media_type(&self) -> Option<&MediaType> {
        self.media_type.as_ref()
    }

    /// Whether the textual form uses base64.
    #[must_use]
    pub const fn is_base64(&self) -> bool {
        self.base64
    }

    /// Returns a copy of this value with a different media type.
    #[must_use]
    pub fn with_media_type(self, media_type: Option<MediaType>) -> Self {
        Self { media_type, ..self }
    }

    /// Returns a copy of this value with a different content encoding.
    #[must_use]
    pub fn with_base64(self, base64: bool) -> Self {
        Self { base64, ..self }
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl TryFrom<&str> for DataUrl {
    type Error = DataUrlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl TryFrom<&Url> for DataUrl {
    type Error = DataUrlError;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        Self::try_parse(value.as_str())
    }
}

impl TryFrom<&DataUrl> for String {
    type Error = DataUrlError;

    fn try_from(value: &DataUrl) -> Result<Self, Self::Error> {
        value.try_to_url_string()
    }
}

impl Serialize for DataUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = self.try_to_url_string().map_err(<S::Error as ser::Error>::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for DataUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> DataUrl {
        DataUrl::new(text, Some(MediaType::TEXT_PLAIN), false)
    }

    #[test]
    fn test_parse_rejects_non_data_url() {
        assert_eq!(DataUrl::parse("not-a-data-url"), None);
        assert_eq!(
            DataUrl::try_parse("not-a-data-url").unwrap_err(),
            DataUrlError::MalformedGrammar
        );
    }

    #[test]
    fn test_parse_base64() {
        let url = DataUrl::parse("data:text/plain;base64,SGVsbG8=").unwrap();
        assert_eq!(url.data(), b"Hello");
        assert_eq!(url.media_type(), Some(&MediaType::TEXT_PLAIN));
        assert!(url.is_base64());
    }

    #[test]
    fn test_parse_percent_encoded() {
        let url = DataUrl::parse("data:text/plain,Hello%20World").unwrap();
        assert_eq!(url.data(), b"Hello World");
        assert_eq!(url.as_text(), Some("Hello World"));
        assert!(!url.is_base64());
    }

    #[test]
    fn test_parse_missing_media_type() {
        let url = DataUrl::parse("data:,Hello").unwrap();
        assert_eq!(url.media_type(), None);
        assert_eq!(url.data(), b"Hello");
        assert!(!url.is_base64());
    }

    #[test]
    fn test_parse_invalid_base64() {
        assert_eq!(DataUrl::parse("data:text/plain;base64,not valid!!"), None);
        assert!(matches!(
            DataUrl::try_parse("data:text/plain;base64,not valid!!"),
            Err(DataUrlError::InvalidContentEncoding(_))
        ));
    }

    #[test]
    fn test_parse_invalid_percent_content() {
        assert_eq!(DataUrl::parse("data:,%FF"), None);
        assert_eq!(DataUrl::parse("data:,50%"), None);
    }

    #[test]
    fn test_parse_empty_payload() {
        let url = DataUrl::parse("data:,").unwrap();
        assert!(url.data().is_empty());
        assert_eq!(url.media_type(), None);
        assert!(!url.is_base64());

        let url = DataUrl::parse("data:image/png;base64,").unwrap();
        assert!(url.data().is_empty());
        assert!(url.is_base64());
    }

    #[test]
    fn test_parse_missing_comma() {
        assert_eq!(DataUrl::parse("data:text/plain;base64SGVsbG8="), None);
    }

    #[test]
    fn test_parse_malformed_media_type_degrades() {
        let url = DataUrl::parse("data:not a type;base64,SGVsbG8=").unwrap();
        assert_eq!(url.media_type(), None);
        assert_eq!(url.data(), b"Hello");
    }

    #[test]
    fn test_parse_drops_media_type_parameters() {
        let url = DataUrl::parse("data:text/plain;charset=US-ASCII,hi").unwrap();
        assert_eq!(url.media_type(), Some(&MediaType::TEXT_PLAIN));
        assert_eq!(url.to_url_string().unwrap(), "data:text/plain,hi");
    }

    #[test]
    fn test_from_str_and_try_from() {
        let url: DataUrl = "data:image/gif;base64,R0lG".parse().unwrap();
        assert_eq!(url.media_type(), Some(&MediaType::IMAGE_GIF));
        assert_eq!(url.data(), b"GIF");
        assert_eq!(DataUrl::try_from("data:,x").unwrap().data(), b"x");
        assert!("data:".parse::<DataUrl>().is_err());
    }

    #[test]
    fn test_serialize_base64() {
        let url = DataUrl::from_bytes(*b"Hello", Some(MediaType::TEXT_PLAIN));
        assert_eq!(
            url.to_url_string().unwrap(),
            "data:text/plain;base64,SGVsbG8="
        );
    }

    #[test]
    fn test_serialize_without_media_type() {
        let url = DataUrl::new(Vec::new(), None, false);
        assert_eq!(url.to_url_string().unwrap(), "data:,");
        let url = DataUrl::new(vec![0u8, 1, 2], None, true);
        assert_eq!(url.to_url_string().unwrap(), "data:;base64,AAEC");
    }

    #[test]
    fn test_serialize_non_utf8_text_fails() {
        let url = DataUrl::new(vec![0xff, 0xfe], Some(MediaType::TEXT_PLAIN), false);
        assert_eq!(url.to_url_string(), None);
        assert_eq!(
            url.try_to_url_string().unwrap_err(),
            DataUrlError::UnencodableBytes
        );
        assert_eq!(url.url(), None);
        assert!(String::try_from(&url).is_err());
    }

    #[test]
    fn test_from_text() {
        let url = DataUrl::from_text("héllo", None, true).unwrap();
        assert_eq!(url.data(), "héllo".as_bytes());
        assert!(url.is_base64());
    }

    #[test]
    fn test_roundtrip_binary_base64() {
        let data: Vec<u8> = (0..=255).rev().collect();
        let original = DataUrl::from_bytes(data, Some(MediaType::APPLICATION_OCTET_STREAM));
        let reparsed = DataUrl::parse(&original.to_url_string().unwrap()).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_roundtrip_text() {
        let original = plain("a,b;base64,c 100% <tag> \"quoted\"\nnext ✓");
        let rendered = original.to_url_string().unwrap();
        assert_eq!(DataUrl::parse(&rendered).unwrap(), original);
    }

    #[test]
    fn test_roundtrip_canonicalizes_media_type() {
        let jpg: MediaType = "IMAGE/JPG".parse().unwrap();
        let original = DataUrl::from_bytes(vec![0xff, 0xd8, 0xff], Some(jpg));
        let rendered = original.to_url_string().unwrap();
        assert!(rendered.starts_with("data:image/jpeg;base64,"));
        assert_eq!(DataUrl::parse(&rendered).unwrap(), original);
    }

    #[test]
    fn test_url_wrapping() {
        let url = plain("Hello World").url().unwrap();
        assert_eq!(url.scheme(), "data");
        assert_eq!(url.as_str(), "data:text/plain,Hello%20World");
        assert_eq!(DataUrl::parse_url(&url).unwrap(), plain("Hello World"));
        assert_eq!(DataUrl::try_from(&url).unwrap(), plain("Hello World"));
    }

    #[test]
    fn test_with_builders() {
        let url = plain("hi")
            .with_base64(true)
            .with_media_type(Some(MediaType::TEXT_HTML));
        assert_eq!(url.to_url_string().unwrap(), "data:text/html;base64,aGk=");
        assert_eq!(url.into_data(), b"hi");
    }

    #[test]
    fn test_serde_roundtrip() {
        let original = DataUrl::from_bytes(*b"Hello", Some(MediaType::TEXT_PLAIN));
        let serialized = serde_json::to_string(&original).unwrap();
        assert_eq!(serialized, "\"data:text/plain;base64,SGVsbG8=\"");
        let deserialized: DataUrl = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, original);
    }

    #[test]
    fn test_serde_in_struct_field() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Asset {
            name: String,
            icon: DataUrl,
        }

        let json = r#"{"name":"dot","icon":"data:image/png;base64,iVBORw0K"}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.name, "dot");
        assert_eq!(asset.icon.media_type(), Some(&MediaType::IMAGE_PNG));
        assert_eq!(asset.icon.data(), b"\x89PNG\r\n");
        assert_eq!(serde_json::to_string(&asset).unwrap(), json);
    }

    #[test]
    fn test_serde_deserialize_invalid() {
        assert!(serde_json::from_str::<DataUrl>("\"not-a-data-url\"").is_err());
        assert!(serde_json::from_str::<DataUrl>("\"data:;base64,@@\"").is_err());
        assert!(serde_json::from_str::<DataUrl>("42").is_err());
    }

    #[test]
    fn test_value_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataUrl>();
        assert_send_sync::<DataUrlError>();
    }

    #[test]
    fn test_serde_serialize_unencodable() {
        let url = DataUrl::new(vec![0xc3], None, false);
        assert!(serde_json::to_string(&url).is_err());
    }
}
