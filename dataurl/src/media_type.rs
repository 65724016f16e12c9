//! MIME media types as they appear in data URLs.
//!
//! A [`MediaType`] is the bare `type/subtype` essence of a MIME type. Tokens
//! are parsed structurally (RFC 2045 `token "/" token *(";" parameter)`);
//! parameters are checked for shape and then dropped. Well-known aliases
//! such as `image/jpg` resolve to their preferred spelling so that a parsed
//! and re-serialized type stays stable.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::DataUrlError;

/// Legacy spellings and the preferred type they stand for.
static ALIASES: &[(&str, &str, &str)] = &[
    ("image/jpg", "image", "jpeg"),
    ("image/pjpeg", "image", "jpeg"),
    ("image/x-png", "image", "png"),
    ("image/x-ms-bmp", "image", "bmp"),
    ("application/javascript", "text", "javascript"),
    ("application/x-javascript", "text", "javascript"),
    ("text/x-javascript", "text", "javascript"),
    ("application/x-font-woff", "font", "woff"),
    ("application/font-woff", "font", "woff"),
    ("application/x-font-ttf", "font", "ttf"),
    ("application/x-font-otf", "font", "otf"),
    ("audio/mp3", "audio", "mpeg"),
    ("audio/x-wav", "audio", "wav"),
    ("audio/wave", "audio", "wav"),
];

/// File extensions and their media types. The first extension listed for a
/// type is its preferred one.
static EXTENSIONS: &[(&str, &str, &str)] = &[
    ("txt", "text", "plain"),
    ("text", "text", "plain"),
    ("html", "text", "html"),
    ("htm", "text", "html"),
    ("css", "text", "css"),
    ("csv", "text", "csv"),
    ("md", "text", "markdown"),
    ("js", "text", "javascript"),
    ("mjs", "text", "javascript"),
    ("json", "application", "json"),
    ("xml", "application", "xml"),
    ("pdf", "application", "pdf"),
    ("wasm", "application", "wasm"),
    ("zip", "application", "zip"),
    ("gz", "application", "gzip"),
    ("bin", "application", "octet-stream"),
    ("png", "image", "png"),
    ("jpeg", "image", "jpeg"),
    ("jpg", "image", "jpeg"),
    ("gif", "image", "gif"),
    ("webp", "image", "webp"),
    ("avif", "image", "avif"),
    ("bmp", "image", "bmp"),
    ("svg", "image", "svg+xml"),
    ("ico", "image", "vnd.microsoft.icon"),
    ("tiff", "image", "tiff"),
    ("tif", "image", "tiff"),
    ("woff", "font", "woff"),
    ("woff2", "font", "woff2"),
    ("ttf", "font", "ttf"),
    ("otf", "font", "otf"),
    ("mp3", "audio", "mpeg"),
    ("wav", "audio", "wav"),
    ("ogg", "audio", "ogg"),
    ("mp4", "video", "mp4"),
    ("webm", "video", "webm"),
];

/// A MIME media type reduced to its `type/subtype` essence.
///
/// Both parts are stored lowercase, so equality is case-insensitive with
/// respect to the original token.
///
/// # Serialization
///
/// Serializes to/from its canonical string: `"image/png"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: Cow<'static, str>,
    subtype: Cow<'static, str>,
}

impl MediaType {
    /// `text/plain`
    pub const TEXT_PLAIN: Self = Self::from_static("text", "plain");
    /// `text/html`
    pub const TEXT_HTML: Self = Self::from_static("text", "html");
    /// `text/css`
    pub const TEXT_CSS: Self = Self::from_static("text", "css");
    /// `text/csv`
    pub const TEXT_CSV: Self = Self::from_static("text", "csv");
    /// `text/javascript`
    pub const TEXT_JAVASCRIPT: Self = Self::from_static("text", "javascript");
    /// `image/png`
    pub const IMAGE_PNG: Self = Self::from_static("image", "png");
    /// `image/jpeg`
    pub const IMAGE_JPEG: Self = Self::from_static("image", "jpeg");
    /// `image/gif`
    pub const IMAGE_GIF: Self = Self::from_static("image", "gif");
    /// `image/webp`
    pub const IMAGE_WEBP: Self = Self::from_static("image", "webp");
    /// `image/svg+xml`
    pub const IMAGE_SVG: Self = Self::from_static("image", "svg+xml");
    /// `application/json`
    pub const APPLICATION_JSON: Self = Self::from_static("application", "json");
    /// `application/xml`
    pub const APPLICATION_XML: Self = Self::from_static("application", "xml");
    /// `application/pdf`
    pub const APPLICATION_PDF: Self = Self::from_static("application", "pdf");
    /// `application/octet-stream`
    pub const APPLICATION_OCTET_STREAM: Self = Self::from_static("application", "octet-stream");
    /// `font/woff2`
    pub const FONT_WOFF2: Self = Self::from_static("font", "woff2");

    const fn from_static(type_: &'static str, subtype: &'static str) -> Self {
        Self {
            type_: Cow::Borrowed(type_),
            subtype: Cow::Borrowed(subtype),
        }
    }

    /// Returns the top-level type, e.g. `image` for `image/png`.
    #[must_use]
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// Returns the subtype, e.g. `png` for `image/png`.
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Returns the canonical `type/subtype` string.
    #[must_use]
    pub fn essence(&self) -> String {
        self.to_string()
    }

    /// Whether payloads of this type are usually text.
    ///
    /// True for `text/*` and for JSON and XML types, including structured
    /// syntax suffixes such as `+json` and `+xml`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.type_ == "text"
            || matches!(&*self.subtype, "json" | "xml" | "javascript")
            || self.subtype.ends_with("+json")
            || self.subtype.ends_with("+xml")
    }

    /// Looks up the media type for a file extension (without the dot).
    ///
    /// The lookup ignores ASCII case. Unknown extensions return `None`.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(ext, _, _)| ext.eq_ignore_ascii_case(extension))
            .map(|&(_, type_, subtype)| Self::from_static(type_, subtype))
    }

    /// Returns the preferred file extension for this type, if known.
    #[must_use]
    pub fn preferred_extension(&self) -> Option<&'static str> {
        EXTENSIONS
            .iter()
            .find(|(_, type_, subtype)| *type_ == self.type_ && *subtype == self.subtype)
            .map(|&(ext, _, _)| ext)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

impl FromStr for MediaType {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DataUrlError::MalformedMediaType(s.to_owned());
        let token = s.trim();
        let (essence, parameters) = token.split_once(';').unwrap_or((token, ""));
        let (type_, subtype) = essence.split_once('/').ok_or_else(malformed)?;
        if !is_token(type_) || !is_token(subtype) || !are_parameters(parameters) {
            return Err(malformed());
        }

        let type_ = type_.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();
        let essence = format!("{type_}/{subtype}");
        if let Some(&(_, type_, subtype)) = ALIASES.iter().find(|(alias, _, _)| *alias == essence)
        {
            return Ok(Self::from_static(type_, subtype));
        }
        Ok(Self {
            type_: Cow::Owned(type_),
            subtype: Cow::Owned(subtype),
        })
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

/// Interprets an optional media type token, degrading to `None` when it is
/// absent or malformed.
#[must_use]
pub fn resolve(token: Option<&str>) -> Option<MediaType> {
    let token = token?;
    match token.parse() {
        Ok(media_type) => Some(media_type),
        Err(_err) => {
            #[cfg(feature = "telemetry")]
            tracing::debug!(token, error = %_err, "Ignoring malformed media type");
            None
        }
    }
}

/// Renders an optional media type, or an empty string when there is none.
#[must_use]
pub fn format(media_type: Option<&MediaType>) -> String {
    media_type.map(ToString::to_string).unwrap_or_default()
}

/// RFC 2045 `token`: one or more visible ASCII characters excluding
/// separators.
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_byte)
}

const fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

/// Checks `*(";" name "=" value)` where the leading `;` has already been
/// consumed. Empty segments are tolerated, values may be quoted strings.
fn are_parameters(input: &str) -> bool {
    let mut rest = input;
    loop {
        rest = rest.trim_start_matches([' ', '\t', ';']);
        if rest.is_empty() {
            return true;
        }
        let Some((name, after)) = rest.split_once('=') else {
            return false;
        };
        if !is_token(name.trim()) {
            return false;
        }
        let after = after.trim_start();
        let remainder = if let Some(quoted) = after.strip_prefix('"') {
            match skip_quoted(quoted) {
                Some(remainder) => remainder,
                None => return false,
            }
        } else {
            let end = after.find(';').unwrap_or(after.len());
            if !is_token(after[..end].trim_end()) {
                return false;
            }
            &after[end..]
        };
        let remainder = remainder.trim_start();
        if !remainder.is_empty() && !remainder.starts_with(';') {
            return false;
        }
        rest = remainder;
    }
}

/// Skips past the closing quote of a quoted string, honouring `\` escapes.
fn skip_quoted(input: &str) -> Option<&str> {
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '"' => return Some(&input[i + 1..]),
            _ => {}
        }
    }
    None
}
