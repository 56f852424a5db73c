//! Response sender: writes view models as HTTP responses.
//!
//! A [`ResponseSender`] is built once from an immutable [`ResponseConfig`]
//! and shared by every request. For each view model it:
//!
//! 1. sets `content-type` from the view,
//! 2. applies the configured common headers (they win over the view's
//!    content type on collision),
//! 3. encodes the view,
//! 4. answers with the view's status and bytes, or with `500` and the
//!    fallback body when encoding failed.
//!
//! Encoding failures are logged and never returned to the caller.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use clean_axum_core::ViewModel;
use std::sync::Arc;

use crate::context::RequestContext;

/// Body sent when a view fails to encode and no fallback was configured.
pub const DEFAULT_FALLBACK_BODY: &[u8] = b"internal error";

/// Headers and fallback body shared by all responses of a sender.
///
/// Build it with [`ResponseConfig::builder`]; it cannot be changed
/// afterwards.
///
/// # Example
///
/// ```rust
/// use clean_axum::ResponseConfig;
///
/// let config = ResponseConfig::builder()
///     .header("content-encoding", "bzip")
///     .header("x-custom-header", "custom header value")
///     .fallback(r#"{"error":"custom internal error"}"#)
///     .build();
///
/// assert_eq!(config.headers().len(), 2);
/// assert!(config.fallback().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ResponseConfig {
    headers: HeaderMap,
    fallback: Option<Bytes>,
}

impl ResponseConfig {
    /// Start building a configuration.
    pub fn builder() -> ResponseConfigBuilder {
        ResponseConfigBuilder::default()
    }

    /// Headers added to every response.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Custom body for encoding failures, if one was set.
    pub fn fallback(&self) -> Option<&Bytes> {
        self.fallback.as_ref()
    }

    /// Body actually sent on encoding failure.
    pub fn fallback_body(&self) -> Bytes {
        self.fallback
            .clone()
            .unwrap_or_else(|| Bytes::from_static(DEFAULT_FALLBACK_BODY))
    }
}

/// Builder for [`ResponseConfig`].
///
/// For a given header name the last call wins: [`header`](Self::header) and
/// [`headers`](Self::headers) replace the values configured earlier for the
/// same name, [`append_header`](Self::append_header) adds one more value.
#[derive(Clone, Debug, Default)]
pub struct ResponseConfigBuilder {
    headers: HeaderMap,
    fallback: Option<Bytes>,
}

impl ResponseConfigBuilder {
    /// Set a header, replacing any value configured before for that name.
    ///
    /// Invalid header names or values are dropped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add one more value to a header.
    ///
    /// Invalid header names or values are dropped with a warning.
    pub fn append_header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Merge a whole header map.
    ///
    /// Every name present in `headers` replaces the values configured
    /// earlier for it; all of its values are kept, in order.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        merge_headers(&mut self.headers, &headers);
        self
    }

    /// Body to send instead of `internal error` when a view fails to encode.
    pub fn fallback(mut self, body: impl Into<Bytes>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    /// Freeze the configuration.
    pub fn build(self) -> ResponseConfig {
        ResponseConfig {
            headers: self.headers,
            fallback: self.fallback,
        }
    }
}

/// Writes [`ViewModel`]s as HTTP responses.
///
/// Cheap to clone; the configuration is shared.
#[derive(Clone, Debug, Default)]
pub struct ResponseSender {
    config: Arc<ResponseConfig>,
}

impl ResponseSender {
    /// Create a sender sharing `config` between all responses.
    pub fn new(config: ResponseConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration applied to every response.
    pub fn config(&self) -> &ResponseConfig {
        &self.config
    }

    /// Build the response for `view`.
    ///
    /// Always returns exactly one response: the view's own status and bytes
    /// if it encodes, `500` with the fallback body otherwise.
    pub fn send<V>(&self, _ctx: &RequestContext, view: &V) -> Response
    where
        V: ViewModel + ?Sized,
    {
        let mut headers = HeaderMap::with_capacity(self.config.headers.len() + 1);

        let content_type = view.content_type();
        match HeaderValue::from_str(content_type) {
            Ok(value) => {
                headers.insert(header::CONTENT_TYPE, value);
            }
            Err(_) => {
                tracing::warn!(
                    target: "clean_axum",
                    content_type,
                    "view model returned an invalid content type, header skipped"
                );
            }
        }

        merge_headers(&mut headers, &self.config.headers);

        let (status, body) = match view.encode() {
            Ok(body) => (view.status_code(), body),
            Err(err) => {
                tracing::error!(
                    target: "clean_axum",
                    error = %err,
                    declared_status = view.status_code().as_u16(),
                    "view model encoding failed, sending fallback body"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, self.config.fallback_body())
            }
        };

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

/// Copy every header of `from` into `into`, replacing existing values per name.
fn merge_headers(into: &mut HeaderMap, from: &HeaderMap) {
    for name in from.keys() {
        into.remove(name);
        for value in from.get_all(name) {
            into.append(name.clone(), value.clone());
        }
    }
}

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
        tracing::warn!(target: "clean_axum", name, "invalid response header name dropped");
        return None;
    };
    let Ok(header_value) = HeaderValue::from_str(value) else {
        tracing::warn!(target: "clean_axum", name, "invalid response header value dropped");
        return None;
    };
    Some((header_name, header_value))
}
