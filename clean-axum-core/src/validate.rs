//! Self-validation contract for request payloads.

/// A payload that knows how to check its own business rules.
///
/// The extractor calls [`validate`](Validate::validate) right after a body
/// was decoded and hands the error back untouched, so `Error` can be any
/// application type worth matching on.
///
/// # Example
///
/// ```
/// use clean_axum_core::Validate;
///
/// struct Rename {
///     name: String,
/// }
///
/// impl Validate for Rename {
///     type Error = &'static str;
///
///     fn validate(&self) -> Result<(), Self::Error> {
///         if self.name.is_empty() {
///             return Err("empty name");
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Rename { name: String::new() }.validate(), Err("empty name"));
/// ```
pub trait Validate {
    /// Error returned when the payload breaks one of its rules.
    type Error;

    /// Check the decoded payload.
    fn validate(&self) -> Result<(), Self::Error>;
}
