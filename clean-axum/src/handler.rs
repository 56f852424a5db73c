//! The request orchestrator.
//!
//! [`HttpHandler`] wires a [`RequestDecoder`], a [`UseCaseHandler`] and a
//! [`Presenter`] into a `tower::Service`, one call per inbound request:
//!
//! ```text
//! request ──▶ decoder ──Input──▶ use case ──Output──▶ presenter ──▶ response
//! ```
//!
//! No stage is retried and the orchestrator never looks at the Input or
//! Output: each stage hands a well-formed value (possibly carrying an error)
//! to the next one.

use axum::extract::Request;
use axum::response::Response;
use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tower::Service;
use tracing::Instrument;

use crate::context::RequestContext;
use crate::decoder::RequestDecoder;
use crate::presenter::Presenter;
use crate::use_case::UseCaseHandler;

/// Handles HTTP requests with a decoder, a use case and a presenter.
///
/// Cheap to clone: the stages are shared behind `Arc`s. Mount it with
/// `axum::routing::post_service` (or any other method router) or
/// `Router::route_service`.
///
/// # Example
///
/// ```rust,ignore
/// let handler = HttpHandler::new(CreateTodoDecoder, CreateTodoInteractor::new(repo), CreateTodoPresenter::new(sender))
///     .timeout(Duration::from_secs(5));
///
/// let app = Router::new().route("/todos", post_service(handler));
/// ```
pub struct HttpHandler<D, U, P> {
    decoder: Arc<D>,
    use_case: Arc<U>,
    presenter: Arc<P>,
    timeout: Option<Duration>,
}

impl<D, U, P> HttpHandler<D, U, P>
where
    D: RequestDecoder,
    U: UseCaseHandler<D::Input>,
    P: Presenter<U::Output>,
{
    /// Build a handler from its three stages.
    pub fn new(decoder: D, use_case: U, presenter: P) -> Self {
        Self {
            decoder: Arc::new(decoder),
            use_case: Arc::new(use_case),
            presenter: Arc::new(presenter),
            timeout: None,
        }
    }

    /// Give every request a deadline `timeout` after it arrives.
    ///
    /// The deadline is only recorded in the [`RequestContext`]; it is up to
    /// the use case to honor it. A timeout too large to be represented
    /// (such as `Duration::MAX`) leaves requests without a deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run the three stages for one request.
    pub async fn serve(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();
        let mut ctx = RequestContext::from_parts(&parts);
        if let Some(timeout) = self.timeout {
            ctx = ctx.with_timeout(timeout);
        }
        let span = tracing::debug_span!(
            target: "clean_axum",
            "clean_axum::request",
            method = %parts.method,
            uri = %parts.uri,
        );
        let req = Request::from_parts(parts, body);

        async move {
            let input = self.decoder.decode(req).await;
            let output = self.use_case.handle(ctx.clone(), input).await;
            let response = self.presenter.present(&ctx, output);
            tracing::debug!(
                target: "clean_axum",
                status = response.status().as_u16(),
                "request handled"
            );
            response
        }
        .instrument(span)
        .await
    }
}

impl<D, U, P> Clone for HttpHandler<D, U, P> {
    fn clone(&self) -> Self {
        Self {
            decoder: Arc::clone(&self.decoder),
            use_case: Arc::clone(&self.use_case),
            presenter: Arc::clone(&self.presenter),
            timeout: self.timeout,
        }
    }
}

impl<D, U, P> std::fmt::Debug for HttpHandler<D, U, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpHandler")
            .field("decoder", &std::any::type_name::<D>())
            .field("use_case", &std::any::type_name::<U>())
            .field("presenter", &std::any::type_name::<P>())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<D, U, P> Service<Request> for HttpHandler<D, U, P>
where
    D: RequestDecoder,
    U: UseCaseHandler<D::Input>,
    P: Presenter<U::Output>,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.serve(req).await) })
    }
}
