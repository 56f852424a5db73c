//! Use case contract.
//!
//! An interactor receives the decoded input and the request context and
//! applies the business rules. It first checks whether the input carries a
//! decoding error, then works with its domain dependencies (repositories,
//! clients) and returns an output holding either the result or a business
//! error. It never sees the HTTP request or response.

use std::future::Future;

use crate::context::RequestContext;

/// Second stage of an [`HttpHandler`](crate::HttpHandler).
///
/// # Example
///
/// ```rust
/// use clean_axum::{RequestContext, UseCaseHandler};
///
/// struct CreateTodo;
///
/// impl UseCaseHandler<Result<String, String>> for CreateTodo {
///     type Output = Result<(u64, String), String>;
///
///     async fn handle(&self, _ctx: RequestContext, input: Result<String, String>) -> Self::Output {
///         let title = input.map_err(|e| format!("input error: {e}"))?;
///         Ok((42, title))
///     }
/// }
/// ```
pub trait UseCaseHandler<I>: Send + Sync + 'static {
    /// Result of the use case, handed to the presenter.
    type Output: Send + 'static;

    /// Run the business rules for one request.
    fn handle(&self, ctx: RequestContext, input: I) -> impl Future<Output = Self::Output> + Send;
}

/// A [`UseCaseHandler`] backed by a closure. See [`use_case_fn`].
#[derive(Clone, Copy)]
pub struct UseCaseFn<F>(F);

/// Create a [`UseCaseHandler`] from an async closure taking the context and
/// the input.
pub fn use_case_fn<F>(f: F) -> UseCaseFn<F> {
    UseCaseFn(f)
}

impl<F, Fut, I> UseCaseHandler<I> for UseCaseFn<F>
where
    F: Fn(RequestContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: Send + 'static,
{
    type Output = Fut::Output;

    fn handle(&self, ctx: RequestContext, input: I) -> impl Future<Output = Self::Output> + Send {
        (self.0)(ctx, input)
    }
}

impl<F> std::fmt::Debug for UseCaseFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UseCaseFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_use_case_fn_receives_context_and_input() {
        let use_case = use_case_fn(|ctx: RequestContext, input: Result<u32, String>| async move {
            let value = input?;
            Ok::<_, String>(format!("{} {}", ctx.method(), value * 2))
        });

        let output = use_case.handle(RequestContext::default(), Ok(21)).await;
        assert_eq!(output, Ok("GET 42".to_string()));

        let output = use_case
            .handle(RequestContext::default(), Err("bad input".into()))
            .await;
        assert_eq!(output, Err("bad input".to_string()));
    }
}
