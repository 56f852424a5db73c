//! View model contract.
//!
//! A presenter turns a use case output into a [`ViewModel`]; the response
//! sender then only needs the three operations below to write the HTTP
//! response. [`JsonView`] and [`XmlView`] cover the common case of a
//! `serde::Serialize` body with a fixed status.

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;

use crate::codec::APPLICATION_JSON;
#[cfg(feature = "xml")]
use crate::codec::APPLICATION_XML;
use crate::error::EncodeError;

/// A presentation-ready value that knows its content type, status and bytes.
///
/// All three methods must be pure functions of the view's state. When
/// [`encode`](ViewModel::encode) fails the sender ignores
/// [`status_code`](ViewModel::status_code) and answers with a 500.
pub trait ViewModel {
    /// Value of the `content-type` header.
    fn content_type(&self) -> &str;

    /// Status code of a successfully encoded response.
    fn status_code(&self) -> StatusCode;

    /// Serialize the view into the response body.
    fn encode(&self) -> Result<Bytes, EncodeError>;
}

impl<V: ViewModel + ?Sized> ViewModel for &V {
    fn content_type(&self) -> &str {
        (**self).content_type()
    }

    fn status_code(&self) -> StatusCode {
        (**self).status_code()
    }

    fn encode(&self) -> Result<Bytes, EncodeError> {
        (**self).encode()
    }
}

impl<V: ViewModel + ?Sized> ViewModel for Box<V> {
    fn content_type(&self) -> &str {
        (**self).content_type()
    }

    fn status_code(&self) -> StatusCode {
        (**self).status_code()
    }

    fn encode(&self) -> Result<Bytes, EncodeError> {
        (**self).encode()
    }
}

/// JSON view model: `application/json`, encoded with `serde_json`.
#[derive(Clone, Debug)]
pub struct JsonView<T> {
    status: StatusCode,
    body: T,
}

impl<T> JsonView<T> {
    /// Create a view with an explicit status.
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    /// `200 OK` view.
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Borrow the body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Take the body back.
    pub fn into_inner(self) -> T {
        self.body
    }
}

impl<T: Serialize> ViewModel for JsonView<T> {
    fn content_type(&self) -> &str {
        APPLICATION_JSON
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn encode(&self) -> Result<Bytes, EncodeError> {
        Ok(Bytes::from(serde_json::to_vec(&self.body)?))
    }
}

/// XML view model: `application/xml`, encoded with `quick-xml`.
///
/// The root element is named after the body type, as `quick-xml` does.
#[cfg(feature = "xml")]
#[derive(Clone, Debug)]
pub struct XmlView<T> {
    status: StatusCode,
    body: T,
}

#[cfg(feature = "xml")]
impl<T> XmlView<T> {
    /// Create a view with an explicit status.
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    /// `200 OK` view.
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Borrow the body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Take the body back.
    pub fn into_inner(self) -> T {
        self.body
    }
}

#[cfg(feature = "xml")]
impl<T: Serialize> ViewModel for XmlView<T> {
    fn content_type(&self) -> &str {
        APPLICATION_XML
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn encode(&self) -> Result<Bytes, EncodeError> {
        let text = quick_xml::se::to_string(&self.body).map_err(EncodeError::new)?;
        Ok(Bytes::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Created {
        id: u32,
        title: String,
    }

    #[test]
    fn test_json_view() {
        let view = JsonView::new(
            StatusCode::CREATED,
            Created {
                id: 42,
                title: "New todo title".into(),
            },
        );
        assert_eq!(view.content_type(), "application/json");
        assert_eq!(view.status_code(), StatusCode::CREATED);
        assert_eq!(
            view.encode().unwrap(),
            Bytes::from_static(br#"{"id":42,"title":"New todo title"}"#)
        );
    }

    #[test]
    fn test_json_view_encode_error() {
        // serde_json refuses maps with non-string keys
        let mut body = HashMap::new();
        body.insert((1, 2), "pair");
        let view = JsonView::ok(body);
        assert!(view.encode().is_err());
        assert_eq!(view.status_code(), StatusCode::OK);
    }

    #[test]
    fn test_view_through_reference_and_box() {
        let view = JsonView::ok("hello");
        let by_ref = &view;
        assert_eq!(by_ref.encode().unwrap(), Bytes::from_static(b"\"hello\""));

        let boxed: Box<dyn ViewModel> = Box::new(JsonView::ok(1));
        assert_eq!(boxed.content_type(), "application/json");
        assert_eq!(boxed.encode().unwrap(), Bytes::from_static(b"1"));
    }

    #[cfg(feature = "xml")]
    #[test]
    fn test_xml_view() {
        let view = XmlView::ok(Created {
            id: 7,
            title: "walk".into(),
        });
        assert_eq!(view.content_type(), "application/xml");
        assert_eq!(
            view.encode().unwrap(),
            Bytes::from_static(b"<Created><id>7</id><title>walk</title></Created>")
        );
    }
}
