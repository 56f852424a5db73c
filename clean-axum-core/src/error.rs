//! Error types shared by the request and response halves of the pipeline.
//!
//! - [`DecodeError`]: a request body could not be turned into a payload
//! - [`ExtractError`]: decode failure (the extraction sentinel) or a
//!   validation failure returned by the payload itself
//! - [`EncodeError`]: a view model could not be turned into bytes

use std::error::Error as StdError;

/// Boxed error used as the cause of decode and encode failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Message carried by every [`ExtractError::Extraction`].
pub const EXTRACTION_FAILED: &str = "request payload extraction failed";

/// A request body could not be decoded.
///
/// Carries the name of the codec (or `"body"` when the body itself could
/// not be read) and the underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("{codec} decoding failed: {source}")]
pub struct DecodeError {
    codec: &'static str,
    #[source]
    source: BoxError,
}

impl DecodeError {
    /// Create a decode error for the given codec name.
    pub fn new<E>(codec: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            codec,
            source: source.into(),
        }
    }

    /// Name of the codec that failed.
    pub fn codec(&self) -> &'static str {
        self.codec
    }
}

/// Error returned by a payload extraction.
///
/// The two variants stay distinguishable whatever codec was used:
/// [`Extraction`](ExtractError::Extraction) is the sentinel for "the body
/// could not be decoded", [`Validation`](ExtractError::Validation) is the
/// payload's own error, unwrapped.
///
/// # Example
///
/// ```
/// use clean_axum_core::{DecodeError, ExtractError};
///
/// let err: ExtractError<&str> = ExtractError::Extraction(DecodeError::new("json", "eof"));
/// assert!(err.is_extraction());
///
/// let err: ExtractError<&str> = ExtractError::Validation("empty field value");
/// assert_eq!(err.into_validation(), Some("empty field value"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ExtractError<E> {
    /// The body could not be read or decoded.
    #[error("request payload extraction failed caused by {0}")]
    Extraction(#[source] DecodeError),
    /// The body decoded but the payload rejected itself.
    #[error(transparent)]
    Validation(E),
}

impl<E> ExtractError<E> {
    /// Returns `true` for decode failures, whatever codec produced them.
    pub fn is_extraction(&self) -> bool {
        matches!(self, ExtractError::Extraction(_))
    }

    /// Returns `true` when the payload's own validation failed.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExtractError::Validation(_))
    }

    /// The decode error, if this is an extraction failure.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            ExtractError::Extraction(err) => Some(err),
            ExtractError::Validation(_) => None,
        }
    }

    /// Borrow the validation error, if any.
    pub fn validation(&self) -> Option<&E> {
        match self {
            ExtractError::Validation(err) => Some(err),
            ExtractError::Extraction(_) => None,
        }
    }

    /// Take the validation error exactly as the payload returned it.
    pub fn into_validation(self) -> Option<E> {
        match self {
            ExtractError::Validation(err) => Some(err),
            ExtractError::Extraction(_) => None,
        }
    }
}

/// A view model failed to encode itself.
#[derive(Debug, thiserror::Error)]
#[error("view model encoding failed: {source}")]
pub struct EncodeError {
    #[source]
    source: BoxError,
}

impl EncodeError {
    /// Wrap an encoding failure.
    pub fn new<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            source: source.into(),
        }
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}
