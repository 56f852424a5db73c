//! Presenter contract and adapters.
//!
//! A presenter is the last stage of an [`HttpHandler`](crate::HttpHandler):
//! it decides the status, content and error message shape for a use case
//! output. Most presenters map the output to a [`ViewModel`] and let a
//! [`ResponseSender`] write it, which is what [`ViewPresenter`] does.

use axum::response::Response;
use clean_axum_core::ViewModel;

use crate::context::RequestContext;
use crate::response::ResponseSender;

/// Turns a use case output into the HTTP response.
pub trait Presenter<O>: Send + Sync + 'static {
    /// Build the response for `output`.
    fn present(&self, ctx: &RequestContext, output: O) -> Response;
}

/// A sender presents outputs that already are view models.
impl<V> Presenter<V> for ResponseSender
where
    V: ViewModel,
{
    fn present(&self, ctx: &RequestContext, output: V) -> Response {
        self.send(ctx, &output)
    }
}

/// Maps outputs to view models and sends them. See [`view_presenter`].
#[derive(Clone)]
pub struct ViewPresenter<F> {
    sender: ResponseSender,
    map: F,
}

/// Create a presenter from a sender and an output → view model mapping.
///
/// The sender honors whatever status and content the mapping picks, unless
/// the view fails to encode.
///
/// ```rust
/// use clean_axum::{JsonView, ResponseSender, view_presenter};
/// use axum::http::StatusCode;
///
/// let presenter = view_presenter(ResponseSender::default(), |output: Result<u64, String>| {
///     match output {
///         Ok(id) => JsonView::new(StatusCode::CREATED, serde_json::json!({ "id": id })),
///         Err(message) => JsonView::new(
///             StatusCode::UNPROCESSABLE_ENTITY,
///             serde_json::json!({ "error": { "message": message } }),
///         ),
///     }
/// });
/// ```
pub fn view_presenter<F>(sender: ResponseSender, map: F) -> ViewPresenter<F> {
    ViewPresenter { sender, map }
}

impl<F> ViewPresenter<F> {
    /// The sender writing the mapped views.
    pub fn sender(&self) -> &ResponseSender {
        &self.sender
    }
}

impl<F, O, V> Presenter<O> for ViewPresenter<F>
where
    F: Fn(O) -> V + Send + Sync + 'static,
    V: ViewModel,
{
    fn present(&self, ctx: &RequestContext, output: O) -> Response {
        let view = (self.map)(output);
        self.sender.send(ctx, &view)
    }
}

impl<F> std::fmt::Debug for ViewPresenter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewPresenter")
            .field("sender", &self.sender)
            .field("map", &std::any::type_name::<F>())
            .finish()
    }
}

/// A [`Presenter`] backed by a closure. See [`presenter_fn`].
#[derive(Clone, Copy)]
pub struct PresenterFn<F>(F);

/// Create a [`Presenter`] from a closure building the response directly.
pub fn presenter_fn<F>(f: F) -> PresenterFn<F> {
    PresenterFn(f)
}

impl<F, O> Presenter<O> for PresenterFn<F>
where
    F: Fn(&RequestContext, O) -> Response + Send + Sync + 'static,
{
    fn present(&self, ctx: &RequestContext, output: O) -> Response {
        (self.0)(ctx, output)
    }
}

impl<F> std::fmt::Debug for PresenterFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}
