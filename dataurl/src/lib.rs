#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Parsing and serialization of `data:` URLs (RFC 2397).
//!
//! A data URL carries its resource inline instead of pointing at it:
//!
//! ```text
//! data:[<mediatype>][;base64],<data>
//! ```
//!
//! [`DataUrl`] holds the decoded payload together with an optional
//! [`MediaType`] and a flag recording whether the textual form uses base64 or
//! percent-encoded UTF-8 text. Parsing and rendering are pure functions with
//! no shared state, so every type here is `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use dataurl::{DataUrl, MediaType};
//!
//! let url = DataUrl::parse("data:,Hello%2C%20World%21").unwrap();
//! assert_eq!(url.as_text(), Some("Hello, World!"));
//! assert_eq!(url.media_type(), None);
//!
//! let icon = DataUrl::from_bytes(vec![0x89, b'P', b'N', b'G'], Some(MediaType::IMAGE_PNG));
//! assert_eq!(icon.to_url_string().as_deref(), Some("data:image/png;base64,iVBORw=="));
//!
//! assert!(DataUrl::parse("https://example.com/").is_none());
//! ```
//!
//! # Modules
//!
//! - [`grammar`] - Splits input into media type token, base64 flag and content
//! - [`content`] - Base64 and percent-encoding of the payload
//! - [`media_type`] - The [`MediaType`] handle and its canonical form
//! - [`data_url`] - The [`DataUrl`] value, `serde` and [`url::Url`] integration
//! - [`error`] - The [`DataUrlError`] taxonomy
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` spans and events for parse and render calls

pub mod content;
pub mod data_url;
pub mod error;
pub mod grammar;
pub mod media_type;

pub use data_url::DataUrl;
pub use error::DataUrlError;
pub use media_type::MediaType;
