//! Response builders for common HTTP response types.
//!
//! | Builder | Content-Type |
//! |---------|--------------|
//! | [`JsonResponse`] | `application/json` |
//! | [`HtmlResponse`] | `text/html; charset=utf-8` |
//! | [`TextResponse`] | `text/plain; charset=utf-8` |
//!
//! Handlers return anything implementing [`IntoResponse`].

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

/// The HTTP response type produced by handlers, middleware and error callbacks.
pub type Response = http::Response<Full<Bytes>>;

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response {
    let mut response = http::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Conversion into a [`Response`].
pub trait IntoResponse {
    /// Builds the HTTP response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self;
        response
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        TextResponse::new(self).into_response()
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        TextResponse::new(self).into_response()
    }
}

impl IntoResponse for serde_json::Value {
    fn into_response(self) -> Response {
        JsonResponse::new(self).into_response()
    }
}

impl<R: IntoResponse> IntoResponse for (StatusCode, R) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

/// JSON response builder.
///
/// # Example
///
/// ```rust
/// use hermes_core::{IntoResponse, JsonResponse};
/// use http::StatusCode;
///
/// let response = JsonResponse::new(serde_json::json!({"item_id": 42})).into_response();
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a JSON response with status 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    /// Serialization failures become a plain-text `500`.
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.data) {
            Ok(body) => with_body(self.status, "application/json", body),
            Err(e) => with_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain; charset=utf-8",
                format!("failed to serialize response: {e}"),
            ),
        }
    }
}

/// HTML response builder.
#[derive(Debug, Clone)]
pub struct HtmlResponse {
    body: String,
    status: StatusCode,
}

impl HtmlResponse {
    /// Creates a new HTML response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for HtmlResponse {
    fn into_response(self) -> Response {
        with_body(self.status, "text/html; charset=utf-8", self.body)
    }
}

/// Plain text response builder.
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
}

impl TextResponse {
    /// Creates a new text response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for TextResponse {
    fn into_response(self) -> Response {
        with_body(self.status, "text/plain; charset=utf-8", self.body)
    }
}
