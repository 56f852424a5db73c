//! # clean-axum
//!
//! A layered ("clean architecture") request pipeline for
//! [Axum](https://github.com/tokio-rs/axum) applications.
//!
//! Every endpoint is split into three stages that never reach back into
//! each other:
//!
//! 1. a [`RequestDecoder`] turns the raw request into a use case input,
//! 2. a [`UseCaseHandler`] runs the business rules and returns an output,
//! 3. a [`Presenter`] turns that output into the HTTP response.
//!
//! [`HttpHandler`] chains the three and is a plain `tower::Service`, so it
//! mounts on any axum router. Inputs and outputs are usually `Result`s: a
//! decoder that cannot read the request hands an `Err` to the use case
//! instead of failing, and the use case does the same for the presenter.
//!
//! The building blocks most endpoints need are provided:
//!
//! - [`PayloadExtractor`]: decode a body with a [`PayloadCodec`] and run the
//!   payload's own [`Validate`] rules. It is itself a [`RequestDecoder`].
//! - [`ResponseSender`]: write any [`ViewModel`] with shared headers and a
//!   fallback body when the view fails to encode.
//! - [`decoder_fn`], [`use_case_fn`], [`presenter_fn`] and
//!   [`view_presenter`]: closures as stages.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clean_axum::prelude::*;
//! use axum::{Router, http::StatusCode, routing::post_service};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Validate for Greet {
//!     type Error = &'static str;
//!
//!     fn validate(&self) -> Result<(), Self::Error> {
//!         if self.name.is_empty() { Err("empty name") } else { Ok(()) }
//!     }
//! }
//!
//! #[derive(Serialize)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! let handler = HttpHandler::new(
//!     PayloadExtractor::<Greet>::json(),
//!     use_case_fn(|_ctx: RequestContext, input: Result<Greet, ExtractError<&'static str>>| async move {
//!         input.map(|greet| format!("Hello, {}!", greet.name))
//!     }),
//!     view_presenter(ResponseSender::default(), |output: Result<String, ExtractError<&'static str>>| match output {
//!         Ok(message) => JsonView::ok(Greeting { message }),
//!         Err(_) => JsonView::new(StatusCode::BAD_REQUEST, Greeting { message: "bad request".into() }),
//!     }),
//! );
//!
//! let app: Router = Router::new().route("/greet", post_service(handler));
//! ```

pub mod context;
pub mod decoder;
pub mod extractor;
pub mod handler;
pub mod presenter;
pub mod response;
pub mod use_case;

pub use clean_axum_core;

pub use context::{DeadlineExceeded, RequestContext};
pub use decoder::{DecoderFn, RequestDecoder, decoder_fn};
pub use extractor::PayloadExtractor;
pub use handler::HttpHandler;
pub use presenter::{Presenter, PresenterFn, ViewPresenter, presenter_fn, view_presenter};
pub use response::{DEFAULT_FALLBACK_BODY, ResponseConfig, ResponseConfigBuilder, ResponseSender};
pub use use_case::{UseCaseFn, UseCaseHandler, use_case_fn};

pub use clean_axum_core::{
    BuiltinCodec, DecodeError, EXTRACTION_FAILED, EncodeError, ExtractError, JsonView,
    PayloadCodec, Validate, ViewModel,
};
#[cfg(feature = "xml")]
pub use clean_axum_core::XmlView;

pub mod prelude {
    //! A prelude for `clean-axum` providing the most common types.
    pub use crate::context::RequestContext;
    pub use crate::decoder::{RequestDecoder, decoder_fn};
    pub use crate::extractor::PayloadExtractor;
    pub use crate::handler::HttpHandler;
    pub use crate::presenter::{Presenter, presenter_fn, view_presenter};
    pub use crate::response::{ResponseConfig, ResponseSender};
    pub use crate::use_case::{UseCaseHandler, use_case_fn};
    pub use clean_axum_core::{
        BuiltinCodec, ExtractError, JsonView, PayloadCodec, Validate, ViewModel,
    };
    #[cfg(feature = "xml")]
    pub use clean_axum_core::XmlView;
}
