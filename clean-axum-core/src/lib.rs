//! Core contracts for clean-axum.
//!
//! This crate holds the transport-free half of the request pipeline and is
//! shared by the axum integration (`clean-axum`) and by applications that
//! want to keep their domain crates free of HTTP framework dependencies.
//!
//! ## Modules
//!
//! - [`codec`]: Payload codec trait and the built-in JSON/XML codecs
//! - [`validate`]: Self-validation contract for request payloads
//! - [`view`]: View model contract and serde-backed view adapters
//! - [`error`]: Decode, extraction and encoding error types

mod codec;
mod error;
mod validate;
mod view;

pub use codec::*;
pub use error::*;
pub use validate::*;
pub use view::*;
