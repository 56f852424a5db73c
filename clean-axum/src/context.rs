//! Per-request context handed from the decoder stage to the presenter.
//!
//! [`HttpHandler`](crate::HttpHandler) builds a [`RequestContext`] from the
//! request head before the decoder consumes the request, then passes the
//! same context to the use case and to the presenter. The pipeline never
//! looks inside it; use cases read the deadline and extensions they care
//! about.

use axum::http::{Extensions, HeaderMap, Method, Uri, request::Parts};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// The request deadline passed before the wrapped future completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Request-scoped values shared by the pipeline stages.
///
/// Cloning is cheap enough to do once per request; extensions are cloned
/// from the request, so only `Clone` extensions are visible here.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Build a context from a request head.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            extensions: parts.extensions.clone(),
            deadline: None,
        }
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline to `timeout` from now.
    ///
    /// A timeout too large to be represented as an instant leaves the
    /// request without a deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI, including the query.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Extensions cloned from the request, such as values set by middleware.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the deadline, or `None` when the request is unbounded.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| deadline <= Instant::now())
    }

    /// Run `fut` until the deadline.
    ///
    /// Without a deadline the future simply runs to completion.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// async fn handle(&self, ctx: RequestContext, input: Input) -> Output {
    ///     match ctx.run_until_deadline(self.repository.save(input)).await {
    ///         Ok(saved) => Ok(saved),
    ///         Err(DeadlineExceeded) => Err(TodoError::Timeout),
    ///     }
    /// }
    /// ```
    pub async fn run_until_deadline<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts() -> Parts {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri("/todos?draft=true")
            .header("x-request-id", "req-1")
            .body(())
            .unwrap();
        req.extensions_mut().insert(7u32);
        req.into_parts().0
    }

    #[test]
    fn test_from_parts_copies_request_head() {
        let ctx = RequestContext::from_parts(&parts());
        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.uri().path(), "/todos");
        assert_eq!(ctx.headers().get("x-request-id").unwrap(), "req-1");
        assert_eq!(ctx.extensions().get::<u32>(), Some(&7));
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_expired());
    }

    #[tokio::test]
    async fn test_timeout_sets_deadline() {
        let ctx = RequestContext::default().with_timeout(Duration::from_secs(60));
        assert!(ctx.deadline().is_some());
        assert!(ctx.remaining().unwrap() > Duration::from_secs(50));
        assert!(!ctx.is_expired());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_means_no_deadline() {
        let ctx = RequestContext::default().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_expired());
        assert_eq!(ctx.run_until_deadline(async { 1 }).await, Ok(1));
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let ctx = RequestContext::default().with_deadline(Instant::now());
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_run_until_deadline_without_deadline() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.run_until_deadline(async { 5 }).await, Ok(5));
    }

    #[tokio::test]
    async fn test_run_until_deadline_elapses() {
        let ctx = RequestContext::default().with_timeout(Duration::from_millis(10));
        let result = ctx
            .run_until_deadline(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
    }
}
