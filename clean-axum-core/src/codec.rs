//! Payload codec trait and built-in implementations.
//!
//! This module provides the [`PayloadCodec`] trait used by the payload
//! extractor to turn a request body into a typed payload, and
//! [`BuiltinCodec`], the closed set of codecs shipped with the crate:
//! - [`BuiltinCodec::Json`]: structured text via `serde_json`
//! - [`BuiltinCodec::Xml`]: markup via `quick-xml` (requires the `xml` feature)
//!
//! Any other wire format plugs in by implementing [`PayloadCodec`].

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Content type of JSON payloads.
pub const APPLICATION_JSON: &str = "application/json";

/// Content type of XML payloads.
pub const APPLICATION_XML: &str = "application/xml";

/// Codec trait for request payload decoding.
///
/// Decoding targets any `serde` deserializable type, so a codec only has to
/// know its wire format, never the payload it fills.
///
/// # Example
///
/// ```
/// use clean_axum_core::{DecodeError, PayloadCodec};
/// use serde::de::DeserializeOwned;
///
/// /// Accepts `key=value&...` bodies.
/// struct FormCodec;
///
/// impl PayloadCodec for FormCodec {
///     fn name(&self) -> &'static str {
///         "form"
///     }
///
///     fn decode<T: DeserializeOwned>(&self, _body: &[u8]) -> Result<T, DecodeError> {
///         Err(DecodeError::new(self.name(), "not implemented in this example"))
///     }
/// }
///
/// assert!(FormCodec.decode::<String>(b"a=b").is_err());
/// ```
pub trait PayloadCodec: Send + Sync + 'static {
    /// Short codec name used in errors and logs (e.g. "json", "xml").
    fn name(&self) -> &'static str;

    /// Decode a complete body into `T`.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError>;
}

/// The codecs provided out of the box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuiltinCodec {
    /// JSON decoding with `serde_json`.
    #[default]
    Json,
    /// XML decoding with `quick-xml`.
    #[cfg(feature = "xml")]
    Xml,
}

impl BuiltinCodec {
    /// Content type matching this codec.
    pub fn content_type(&self) -> &'static str {
        match self {
            BuiltinCodec::Json => APPLICATION_JSON,
            #[cfg(feature = "xml")]
            BuiltinCodec::Xml => APPLICATION_XML,
        }
    }
}

impl PayloadCodec for BuiltinCodec {
    fn name(&self) -> &'static str {
        match self {
            BuiltinCodec::Json => "json",
            #[cfg(feature = "xml")]
            BuiltinCodec::Xml => "xml",
        }
    }

    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        match self {
            BuiltinCodec::Json => {
                serde_json::from_slice(body).map_err(|e| DecodeError::new(self.name(), e))
            }
            #[cfg(feature = "xml")]
            BuiltinCodec::Xml => {
                let text =
                    std::str::from_utf8(body).map_err(|e| DecodeError::new(self.name(), e))?;
                quick_xml::de::from_str(text).map_err(|e| DecodeError::new(self.name(), e))
            }
        }
    }
}
