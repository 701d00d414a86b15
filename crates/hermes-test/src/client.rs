//! In-memory client driving an [`App`] without sockets.

use std::sync::Arc;

use bytes::Bytes;
use hermes_server::App;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::Method;
use serde::Serialize;

use crate::{TestError, TestResponse};

/// Sends requests straight to [`App::dispatch`].
///
/// ```ignore
/// let client = TestClient::new(api.build());
/// let response = client.get("/items/42?q=hello").send().await;
/// response.assert_status(StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TestClient {
    app: Arc<App>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps an application.
    pub fn new(app: App) -> Self {
        Self::from_arc(Arc::new(app))
    }

    /// Wraps a shared application.
    pub fn from_arc(app: Arc<App>) -> Self {
        Self {
            app,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The application under test.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Starts a `GET` request.
    pub fn get(&self, uri: impl Into<String>) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a `POST` request.
    pub fn post(&self, uri: impl Into<String>) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, uri: impl Into<String>) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a `PATCH` request.
    pub fn patch(&self, uri: impl Into<String>) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, uri: impl Into<String>) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl Into<String>) -> TestRequest<'_> {
        let mut request = TestRequest {
            client: self,
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Ok(Bytes::new()),
        };
        for (name, value) in &self.default_headers {
            request = request.header(name.clone(), value.clone());
        }
        request
    }
}

/// A request under construction.
#[must_use = "a request does nothing until sent"]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Result<Bytes, TestError>,
}

impl TestRequest<'_> {
    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the `content-type` header.
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Ok(body.into());
        self
    }

    /// Sets a JSON body and content type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.body = serde_json::to_vec(value).map(Bytes::from).map_err(TestError::from);
        self.content_type("application/json")
    }

    /// Sets a urlencoded form body and content type.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        self.body = serde_urlencoded::to_string(value)
            .map(Bytes::from)
            .map_err(TestError::from);
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(err) => panic!("test request failed: {err}"),
        }
    }

    /// Sends the request, returning build errors.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let client = self.client;
        let request = self.build()?;
        TestResponse::from_response(client.app.dispatch(request).await).await
    }

    fn build(self) -> Result<http::Request<Bytes>, TestError> {
        let body = self.body?;
        let mut request = http::Request::builder()
            .method(self.method)
            .uri(self.uri.as_str())
            .body(body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;

        for (name, value) in self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            request.headers_mut().append(name, value);
        }
        Ok(request)
    }
}
