//! Payload extractor: request body → decoded, self-validated payload.
//!
//! Extraction reports two distinct failures:
//! - the body could not be read or decoded: [`ExtractError::Extraction`],
//!   whatever codec was used;
//! - the payload decoded but its [`Validate`] rules rejected it:
//!   [`ExtractError::Validation`] with the payload's error, untouched.
//!
//! Mapping either failure to an HTTP response is up to the caller; when the
//! extractor is used as a [`RequestDecoder`] the error simply becomes the
//! use case input.

use axum::extract::Request;
use clean_axum_core::{BuiltinCodec, DecodeError, ExtractError, PayloadCodec, Validate};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;

use crate::decoder::RequestDecoder;

/// Extracts and validates a `P` from request bodies.
///
/// # Example
///
/// ```rust
/// use clean_axum::{PayloadExtractor, Validate};
/// use axum::{body::Body, extract::Request};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct SomePayload {
///     some_field: String,
/// }
///
/// impl Validate for SomePayload {
///     type Error = &'static str;
///
///     fn validate(&self) -> Result<(), Self::Error> {
///         if self.some_field.is_empty() {
///             return Err("empty field value");
///         }
///         Ok(())
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let extractor = PayloadExtractor::<SomePayload>::json();
///
/// let req = Request::new(Body::from(r#"{"some_field":"some data"}"#));
/// let payload = extractor.extract(req).await.unwrap();
/// assert_eq!(payload.some_field, "some data");
///
/// let req = Request::new(Body::from(r#"{"some_field":""}"#));
/// let err = extractor.extract(req).await.unwrap_err();
/// assert_eq!(err.into_validation(), Some("empty field value"));
///
/// let req = Request::new(Body::from(r#"{"some_field"#));
/// let err = extractor.extract(req).await.unwrap_err();
/// assert!(err.is_extraction());
/// # });
/// ```
pub struct PayloadExtractor<P, C = BuiltinCodec> {
    codec: C,
    max_body_bytes: Option<usize>,
    _payload: PhantomData<fn() -> P>,
}

impl<P> PayloadExtractor<P, BuiltinCodec> {
    /// Extractor for JSON bodies.
    pub fn json() -> Self {
        Self::new(BuiltinCodec::Json)
    }

    /// Extractor for XML bodies.
    #[cfg(feature = "xml")]
    pub fn xml() -> Self {
        Self::new(BuiltinCodec::Xml)
    }
}

impl<P, C> PayloadExtractor<P, C>
where
    C: PayloadCodec,
{
    /// Extractor using a custom codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            max_body_bytes: None,
            _payload: PhantomData,
        }
    }

    /// Reject bodies larger than `max` bytes as extraction failures.
    ///
    /// The limit is checked while the body is collected, so an oversized
    /// body is never buffered in full.
    pub fn limit(mut self, max: usize) -> Self {
        self.max_body_bytes = Some(max);
        self
    }

    /// Accept bodies of any size. This is the default.
    pub fn no_limit(mut self) -> Self {
        self.max_body_bytes = None;
        self
    }

    /// The codec used to decode bodies.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Maximum body size in bytes, or `None` when unlimited.
    pub fn max_body_bytes(&self) -> Option<usize> {
        self.max_body_bytes
    }
}

impl<P, C> PayloadExtractor<P, C>
where
    C: PayloadCodec,
    P: DeserializeOwned + Validate,
{
    /// Read the request body, decode it and validate the payload.
    ///
    /// The body stream is consumed exactly once.
    pub async fn extract(&self, req: Request) -> Result<P, ExtractError<P::Error>> {
        let body = axum::body::to_bytes(req.into_body(), self.max_body_bytes.unwrap_or(usize::MAX))
            .await
            .map_err(|e| {
                tracing::debug!(
                    target: "clean_axum",
                    error = %e,
                    "failed to read request body"
                );
                ExtractError::Extraction(DecodeError::new("body", e))
            })?;

        self.extract_bytes(&body)
    }

    /// Decode and validate an already collected body.
    pub fn extract_bytes(&self, body: &[u8]) -> Result<P, ExtractError<P::Error>> {
        let payload: P = self.codec.decode(body).map_err(|e| {
            tracing::debug!(
                target: "clean_axum",
                codec = self.codec.name(),
                error = %e,
                "request payload extraction failed"
            );
            ExtractError::Extraction(e)
        })?;

        if let Err(err) = payload.validate() {
            tracing::debug!(
                target: "clean_axum",
                payload = std::any::type_name::<P>(),
                "request payload rejected by validation"
            );
            return Err(ExtractError::Validation(err));
        }

        Ok(payload)
    }
}

impl<P, C> RequestDecoder for PayloadExtractor<P, C>
where
    C: PayloadCodec,
    P: DeserializeOwned + Validate + Send + 'static,
    P::Error: Send + 'static,
{
    type Input = Result<P, ExtractError<P::Error>>;

    fn decode(&self, req: Request) -> impl Future<Output = Self::Input> + Send {
        self.extract(req)
    }
}

impl<P, C: Clone> Clone for PayloadExtractor<P, C> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            max_body_bytes: self.max_body_bytes,
            _payload: PhantomData,
        }
    }
}

impl<P, C: std::fmt::Debug> std::fmt::Debug for PayloadExtractor<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadExtractor")
            .field("payload", &std::any::type_name::<P>())
            .field("codec", &self.codec)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, thiserror::Error)]
    enum PayloadError {
        #[error("empty field value")]
        EmptyField,
        #[error("invalid payload")]
        Invalid,
    }

    #[derive(Debug, Deserialize)]
    struct SomePayload {
        #[serde(rename = "some_field", alias = "SomeField")]
        some_field: String,
    }

    impl Validate for SomePayload {
        type Error = PayloadError;

        fn validate(&self) -> Result<(), Self::Error> {
            if self.some_field.is_empty() {
                return Err(PayloadError::EmptyField);
            }
            Ok(())
        }
    }

    #[derive(Debug, Deserialize)]
    struct AlwaysInvalid {
        #[serde(rename = "some_field", alias = "SomeField")]
        _some_field: String,
    }

    impl Validate for AlwaysInvalid {
        type Error = PayloadError;

        fn validate(&self) -> Result<(), Self::Error> {
            Err(PayloadError::Invalid)
        }
    }

    /// Codec that fails whatever the body.
    struct FailingCodec;

    impl PayloadCodec for FailingCodec {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn decode<T: DeserializeOwned>(&self, _body: &[u8]) -> Result<T, DecodeError> {
            Err(DecodeError::new(self.name(), "foo"))
        }
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_request() {
        let payload = PayloadExtractor::<SomePayload>::json()
            .extract(request(r#"{"some_field":"some data"}"#))
            .await
            .unwrap();
        assert_eq!(payload.some_field, "some data");
    }

    #[tokio::test]
    async fn test_invalid_json_request_returns_validation_error_verbatim() {
        let err = PayloadExtractor::<SomePayload>::json()
            .extract(request(r#"{"some_field":""}"#))
            .await
            .unwrap_err();
        assert!(!err.is_extraction());
        assert_eq!(err.to_string(), "empty field value");
        assert_eq!(err.into_validation(), Some(PayloadError::EmptyField));

        let err = PayloadExtractor::<AlwaysInvalid>::json()
            .extract(request(r#"{"some_field":"some_data"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.into_validation(), Some(PayloadError::Invalid));
    }

    #[tokio::test]
    async fn test_truncated_json_is_extraction_error() {
        let err = PayloadExtractor::<SomePayload>::json()
            .extract(request(r#"{"some_field"#))
            .await
            .unwrap_err();
        assert!(err.is_extraction());
        assert!(err.to_string().starts_with(clean_axum_core::EXTRACTION_FAILED));
    }

    #[tokio::test]
    async fn test_empty_body_is_extraction_error() {
        let err = PayloadExtractor::<SomePayload>::json()
            .extract(request(""))
            .await
            .unwrap_err();
        assert!(err.is_extraction());
    }

    #[tokio::test]
    async fn test_custom_codec_error_is_extraction_error() {
        let err = PayloadExtractor::<AlwaysInvalid, _>::new(FailingCodec)
            .extract(request(""))
            .await
            .unwrap_err();
        assert!(err.is_extraction());
        assert_eq!(err.decode_error().unwrap().codec(), "failing");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_extraction_error() {
        let err = PayloadExtractor::<SomePayload>::json()
            .limit(8)
            .extract(request(r#"{"some_field":"some data"}"#))
            .await
            .unwrap_err();
        assert!(err.is_extraction());
        assert_eq!(err.decode_error().unwrap().codec(), "body");
    }

    #[tokio::test]
    async fn test_body_limit_configuration() {
        let extractor = PayloadExtractor::<SomePayload>::json();
        assert_eq!(extractor.max_body_bytes(), None);

        let extractor = extractor.limit(64);
        assert_eq!(extractor.max_body_bytes(), Some(64));
        let payload = extractor
            .extract(request(r#"{"some_field":"fits"}"#))
            .await
            .unwrap();
        assert_eq!(payload.some_field, "fits");

        assert_eq!(extractor.no_limit().max_body_bytes(), None);
    }

    #[cfg(not(feature = "xml"))]
    #[test]
    fn test_json_is_the_only_builtin_codec_without_xml() {
        let extractor = PayloadExtractor::<SomePayload>::json();
        // exhaustive: only compiles when the core crate's xml codec is off too
        match extractor.codec() {
            BuiltinCodec::Json => {}
        }
    }

    #[cfg(feature = "xml")]
    #[tokio::test]
    async fn test_valid_xml_request() {
        let payload = PayloadExtractor::<SomePayload>::xml()
            .extract(request(
                "<ValidPayload><SomeField>some_data</SomeField></ValidPayload>",
            ))
            .await
            .unwrap();
        assert_eq!(payload.some_field, "some_data");
    }

    #[cfg(feature = "xml")]
    #[tokio::test]
    async fn test_invalid_xml_request() {
        let err = PayloadExtractor::<AlwaysInvalid>::xml()
            .extract(request(
                "<InvalidPayload><SomeField>some_data</SomeField></InvalidPayload>",
            ))
            .await
            .unwrap_err();
        assert_eq!(err.into_validation(), Some(PayloadError::Invalid));
    }

    #[cfg(feature = "xml")]
    #[tokio::test]
    async fn test_malformed_xml_is_extraction_error() {
        let err = PayloadExtractor::<SomePayload>::xml()
            .extract(request("<ValidPayload><SomeField>some_data"))
            .await
            .unwrap_err();
        assert!(err.is_extraction());
    }

    #[tokio::test]
    async fn test_extractor_as_request_decoder() {
        let extractor = PayloadExtractor::<SomePayload>::json();
        let input = extractor.decode(request(r#"{"some_field":"x"}"#)).await;
        assert_eq!(input.unwrap().some_field, "x");
    }
}
