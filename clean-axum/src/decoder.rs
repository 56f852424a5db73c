//! Request decoder contract.
//!
//! A decoder reads whatever the use case needs out of the request and
//! produces its input. Failures are part of the input (typically
//! `Result<Data, Error>`): the decoder itself never fails, so the pipeline
//! always reaches the use case.

use axum::extract::Request;
use std::future::Future;

/// First stage of an [`HttpHandler`](crate::HttpHandler).
///
/// [`PayloadExtractor`](crate::PayloadExtractor) implements this trait for
/// body-only endpoints; [`decoder_fn`] turns a closure into a decoder.
///
/// # Example
///
/// ```rust
/// use clean_axum::RequestDecoder;
/// use axum::extract::Request;
///
/// struct TodoId;
///
/// impl RequestDecoder for TodoId {
///     type Input = Result<u64, String>;
///
///     async fn decode(&self, req: Request) -> Self::Input {
///         req.uri()
///             .path()
///             .rsplit('/')
///             .next()
///             .and_then(|id| id.parse().ok())
///             .ok_or_else(|| format!("no todo id in {}", req.uri()))
///     }
/// }
/// ```
pub trait RequestDecoder: Send + Sync + 'static {
    /// Use case input, carrying either usable data or the decoding error.
    type Input: Send + 'static;

    /// Decode a request into an input.
    fn decode(&self, req: Request) -> impl Future<Output = Self::Input> + Send;
}

/// A [`RequestDecoder`] backed by a closure. See [`decoder_fn`].
#[derive(Clone, Copy)]
pub struct DecoderFn<F>(F);

/// Create a [`RequestDecoder`] from an async closure taking the request.
///
/// ```rust
/// use clean_axum::decoder_fn;
/// use axum::extract::Request;
///
/// let decoder = decoder_fn(|req: Request| async move {
///     req.headers()
///         .get("x-tenant")
///         .and_then(|v| v.to_str().ok())
///         .map(str::to_owned)
///         .ok_or("missing tenant header")
/// });
/// ```
pub fn decoder_fn<F>(f: F) -> DecoderFn<F> {
    DecoderFn(f)
}

impl<F, Fut> RequestDecoder for DecoderFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: Send + 'static,
{
    type Input = Fut::Output;

    fn decode(&self, req: Request) -> impl Future<Output = Self::Input> + Send {
        (self.0)(req)
    }
}

impl<F> std::fmt::Debug for DecoderFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}
