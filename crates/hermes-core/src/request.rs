//! The per-request value handed through middleware to handlers.

use std::borrow::Cow;
use std::sync::OnceLock;

use bytes::Bytes;
use hermes_router::Params;
use http::header::CONTENT_TYPE;
use http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::raw::RawSource;
use crate::RequestId;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A fully buffered HTTP request plus its Hermes identity.
///
/// The body is collected before dispatch, so every parameter source can be
/// read any number of times. Query strings and form bodies are decoded at
/// most once per request.
///
/// # Example
///
/// ```rust
/// use hermes_core::{RawSource, Request};
/// use hermes_router::Params;
/// use http::Method;
///
/// let mut params = Params::new();
/// params.push("item_id", "42");
///
/// let request = Request::builder()
///     .method(Method::GET)
///     .uri("/items/42?q=hello")
///     .path_params(params)
///     .build();
///
/// assert_eq!(request.path_value("item_id").as_deref(), Some("42"));
/// assert_eq!(request.query_value("q").as_deref(), Some("hello"));
/// ```
#[derive(Debug)]
pub struct Request {
    id: RequestId,
    correlation_id: Option<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    extensions: Extensions,
    query: OnceLock<Vec<(String, String)>>,
    form: OnceLock<Vec<(String, String)>>,
}

impl Request {
    /// Wraps a buffered `http::Request` under the given identity.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>, id: RequestId) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            id,
            correlation_id: None,
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            path_params: Params::new(),
            extensions: parts.extensions,
            query: OnceLock::new(),
            form: OnceLock::new(),
        }
    }

    /// Returns a builder for constructing requests by hand.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Returns the request identity.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the id used to correlate this request in logs and responses.
    ///
    /// This is the trusted incoming `x-request-id` when one was accepted,
    /// otherwise the request identity.
    #[must_use]
    pub fn correlation_id(&self) -> Cow<'_, str> {
        match &self.correlation_id {
            Some(id) => Cow::Borrowed(id),
            None => Cow::Owned(self.id.to_string()),
        }
    }

    /// Records an externally supplied correlation id.
    pub fn set_correlation_id(&mut self, id: impl Into<String>) {
        self.correlation_id = Some(id.into());
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Returns the buffered body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the matched route variables.
    #[must_use]
    pub const fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Replaces the matched route variables.
    pub fn set_path_params(&mut self, params: Params) {
        self.path_params = params;
    }

    /// Returns the request extensions.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the request extensions mutably.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    fn is_form(&self) -> bool {
        self.content_type().is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        })
    }

    fn query_pairs(&self) -> &[(String, String)] {
        self.query.get_or_init(|| {
            self.uri
                .query()
                .and_then(|q| serde_urlencoded::from_str(q).ok())
                .unwrap_or_default()
        })
    }

    fn form_pairs(&self) -> &[(String, String)] {
        self.form.get_or_init(|| {
            if self.is_form() {
                serde_urlencoded::from_bytes(&self.body).unwrap_or_default()
            } else {
                Vec::new()
            }
        })
    }
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<Cow<'a, str>> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| Cow::Borrowed(v.as_str()))
}

impl RawSource for Request {
    fn request_id(&self) -> RequestId {
        self.id
    }

    fn query_value(&self, name: &str) -> Option<Cow<'_, str>> {
        first(self.query_pairs(), name)
    }

    fn path_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.path_params.get(name).map(Cow::Borrowed)
    }

    fn header_value(&self, name: &str) -> Option<Result<Cow<'_, str>, String>> {
        self.headers.get(name).map(|value| {
            std::str::from_utf8(value.as_bytes())
                .map(Cow::Borrowed)
                .map_err(|e| format!("header value is not valid UTF-8: {e}"))
        })
    }

    fn form_value(&self, name: &str) -> Option<Cow<'_, str>> {
        first(self.form_pairs(), name)
    }

    fn body_bytes(&self) -> &[u8] {
        &self.body
    }
}

/// Builder for constructing a [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
    id: Option<RequestId>,
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl RequestBuilder {
    /// Sets the request identity. A fresh one is minted otherwise.
    #[must_use]
    pub fn id(mut self, id: RequestId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Unparseable URIs are ignored.
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: TryInto<Uri>,
    {
        if let Ok(uri) = uri.try_into() {
            self.uri = Some(uri);
        }
        self
    }

    /// Adds a single header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(self, name: &str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => self.header_value(name, value),
            Err(_) => self,
        }
    }

    /// Adds a header with a raw value. An invalid name is ignored.
    #[must_use]
    pub fn header_value(mut self, name: &str, value: HeaderValue) -> Self {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            id: self.id.unwrap_or_default(),
            correlation_id: None,
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
            extensions: Extensions::new(),
            query: OnceLock::new(),
            form: OnceLock::new(),
        }
    }
}
