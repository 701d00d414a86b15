//! Endpoints and the Use/Dispose request lifecycle.
//!
//! Serving a request runs, in order:
//!
//! 1. **Use**: every bound parameter is resolved and validated in
//!    registration order. The first failure rejects the request; later
//!    parameters are not touched.
//! 2. **Handle**: the middleware chain, then the handler.
//! 3. **Dispose**: every parameter drops its cached value for the request.
//!    This runs on every exit path, including rejection, handler panic and
//!    cancellation of the serving future.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use hermes_core::{IntoResponse, RawSource, Request, RequestId, Response};
use hermes_docs::{EndpointDoc, ParameterDoc};
use hermes_extract::{Param, ParamError, ParamInfo, ParamSpec, Parameter, RegistrationError, Source};
use hermes_telemetry::log_request_rejected;
use http::Method;
use tracing::debug;

use crate::api::Api;
use crate::middleware::{BoxFuture, Handler, Middleware, Next};
use crate::ServerResult;

/// Callback producing the response for a rejected request.
pub type ErrorHandler = Arc<dyn Fn(&Request, &ParamError) -> Response + Send + Sync>;

/// A route with its bound parameters, middleware and handler.
pub struct Endpoint {
    method: Method,
    path: String,
    name: String,
    description: String,
    params: Vec<Arc<dyn Parameter>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    on_error: Option<ErrorHandler>,
    handler: Box<Handler>,
}

impl Endpoint {
    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full route pattern, including any group prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Short name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Metadata of the bound parameters, in registration order.
    pub fn params(&self) -> impl Iterator<Item = &ParamInfo> {
        self.params.iter().map(|p| p.info())
    }

    /// Bound parameters, in registration order.
    #[must_use]
    pub fn parameters(&self) -> &[Arc<dyn Parameter>] {
        &self.params
    }

    /// Documentation entry for this endpoint.
    #[must_use]
    pub fn doc(&self) -> EndpointDoc {
        EndpointDoc {
            method: self.method.to_string(),
            path: self.path.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.params().map(ParameterDoc::from).collect(),
        }
    }

    /// Resolves and validates every parameter, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] in registration order.
    pub fn use_params(&self, request: &dyn RawSource) -> Result<(), ParamError> {
        for param in &self.params {
            param.use_value(request)?;
        }
        Ok(())
    }

    /// Drops every parameter's cached value for the request.
    pub fn dispose(&self, id: RequestId) {
        for param in &self.params {
            param.dispose(id);
        }
    }

    /// Serves one request through the full lifecycle.
    pub async fn serve(&self, request: Request) -> Response {
        let _guard = DisposeGuard {
            params: &self.params,
            id: request.id(),
        };

        if let Err(err) = self.use_params(&request) {
            log_request_rejected!(request.correlation_id(), self.path, err);
            return self.reject(&request, &err);
        }

        let mut next = Next::handler(&*self.handler);
        for middleware in self.middlewares.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next.run(request).await
    }

    fn reject(&self, request: &Request, err: &ParamError) -> Response {
        match &self.on_error {
            Some(on_error) => on_error(request, err),
            None => validation_error(err),
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("params", &self.params().collect::<Vec<_>>())
            .field(
                "middlewares",
                &self.middlewares.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// The default response for a rejected request:
/// `422 {"error": "<message>", "type": "validation_error"}`.
#[must_use]
pub fn validation_error(err: &ParamError) -> Response {
    (
        err.status_code(),
        serde_json::json!({
            "error": err.to_string(),
            "type": "validation_error",
        }),
    )
        .into_response()
}

struct DisposeGuard<'a> {
    params: &'a [Arc<dyn Parameter>],
    id: RequestId,
}

impl Drop for DisposeGuard<'_> {
    fn drop(&mut self) {
        for param in self.params {
            param.dispose(self.id);
        }
        debug!(request_id = %self.id, params = self.params.len(), "request disposed");
    }
}

/// Declares an endpoint: its parameters, metadata, middleware and handler.
///
/// Returned by [`Api::get`] and friends. The endpoint is routed once
/// [`handle`](Self::handle) is called.
///
/// ```ignore
/// let mut endpoint = api.get("/items/{item_id}");
/// let item_id = endpoint.param(ParamSpec::<i64>::path("item_id"));
/// endpoint.name("read_item").handle(move |request| {
///     let id = item_id.value(&request);
///     async move { JsonResponse::new(serde_json::json!({ "item_id": id })) }
/// });
/// ```
#[must_use = "an endpoint is routed only once `handle` is called"]
pub struct EndpointBuilder<'a> {
    api: &'a mut Api,
    method: Method,
    path: String,
    name: String,
    description: String,
    params: Vec<Arc<dyn Parameter>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    on_error: Option<ErrorHandler>,
}

impl<'a> EndpointBuilder<'a> {
    pub(crate) fn new(api: &'a mut Api, method: Method, path: String) -> Self {
        Self {
            api,
            method,
            path,
            name: String::new(),
            description: String::new(),
            params: Vec::new(),
            middlewares: Vec::new(),
            on_error: None,
        }
    }

    /// Full route pattern of the endpoint being built.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Binds a parameter and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the declaration is rejected; see [`try_param`](Self::try_param).
    pub fn param<T>(&mut self, spec: ParamSpec<T>) -> Param<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match self.try_param(spec) {
            Ok(param) => param,
            Err(err) => panic!("{} {}: {err}", self.method, self.path),
        }
    }

    /// Binds a parameter, rejecting declarations that can never resolve.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the name is empty, a path parameter
    /// does not appear in the route pattern, or the same source and name are
    /// already bound.
    pub fn try_param<T>(&mut self, spec: ParamSpec<T>) -> Result<Param<T>, RegistrationError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let source = spec.source();
        let name = spec.name();

        if name.is_empty() {
            return Err(RegistrationError::EmptyName { location: source });
        }
        if source == Source::Path && !path_variables(&self.path).any(|v| v == name) {
            return Err(RegistrationError::UnknownPathVariable {
                name: name.to_string(),
                path: self.path.clone(),
            });
        }
        if self
            .params
            .iter()
            .any(|p| p.info().source == source && p.info().name == name)
        {
            return Err(RegistrationError::Duplicate {
                location: source,
                name: name.to_string(),
            });
        }

        let param = Param::new(spec);
        self.params.push(param.as_parameter());
        Ok(param)
    }

    /// Sets the short name shown in documentation.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description shown in documentation.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a middleware. Earlier middleware wraps later middleware.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Replaces the default 422 response for rejected requests.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&Request, &ParamError) -> Response + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Attaches the handler and routes the endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the route conflicts with one already registered; see
    /// [`try_handle`](Self::try_handle).
    pub fn handle<F, Fut, R>(self, handler: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let route = format!("{} {}", self.method, self.path);
        if let Err(err) = self.try_handle(handler) {
            panic!("{route}: {err}");
        }
    }

    /// Attaches the handler and routes the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Route`](crate::ServerError::Route) if the route
    /// conflicts with one already registered or the pattern is malformed.
    pub fn try_handle<F, Fut, R>(self, handler: F) -> ServerResult<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler: Box<Handler> = Box::new(move |request| {
            let fut = handler(request);
            Box::pin(async move { fut.await.into_response() }) as BoxFuture<'static, Response>
        });

        let endpoint = Endpoint {
            method: self.method,
            path: self.path,
            name: self.name,
            description: self.description,
            params: self.params,
            middlewares: self.middlewares,
            on_error: self.on_error,
            handler,
        };
        self.api.add_endpoint(endpoint)
    }
}

fn path_variables(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter_map(|segment| {
        segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .or_else(|| segment.strip_prefix('*'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_docs::ApiInfo;
    use http::StatusCode;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_path_variables() {
        let vars: Vec<_> = path_variables("/users/{id}/files/*rest").collect();
        assert_eq!(vars, vec!["id", "rest"]);
        assert_eq!(path_variables("/health").count(), 0);
    }

    #[test]
    fn test_try_param_rejections() {
        let mut api = Api::new(ApiInfo::default());
        let mut endpoint = api.get("/items/{item_id}");

        assert!(matches!(
            endpoint.try_param(ParamSpec::<i64>::path("id")),
            Err(RegistrationError::UnknownPathVariable { .. })
        ));
        assert!(matches!(
            endpoint.try_param(ParamSpec::<String>::query("")),
            Err(RegistrationError::EmptyName { location: Source::Query })
        ));

        endpoint.param(ParamSpec::<i64>::path("item_id"));
        assert!(matches!(
            endpoint.try_param(ParamSpec::<u32>::path("item_id")),
            Err(RegistrationError::Duplicate { .. })
        ));
        // Same name, different source.
        assert!(endpoint.try_param(ParamSpec::<String>::query("item_id")).is_ok());
    }

    #[test]
    #[should_panic(expected = "does not appear in route")]
    fn test_param_panics_on_unknown_path_variable() {
        let mut api = Api::new(ApiInfo::default());
        let mut endpoint = api.get("/items");
        endpoint.param(ParamSpec::<i64>::path("item_id"));
    }

    #[tokio::test]
    async fn test_rejection_uses_default_body() {
        let mut api = Api::new(ApiInfo::default());
        let mut endpoint = api.get("/search");
        endpoint.param(ParamSpec::<i64>::query("limit"));
        endpoint.handle(|_request| async { "unreachable" });
        let endpoint = api.endpoints()[0].clone();

        let request = Request::builder().uri("/search?limit=ten").build();
        let response = endpoint.serve(request).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["type"], "validation_error");
        assert!(body["error"].as_str().unwrap().ends_with("(query:limit)"));
    }

    #[tokio::test]
    async fn test_doc_lists_params_in_order() {
        let mut api = Api::new(ApiInfo::default());
        let mut endpoint = api.post("/items/{item_id}");
        endpoint.param(ParamSpec::<u64>::path("item_id").description("Item"));
        endpoint.param(ParamSpec::<String>::header("x-token").optional());
        endpoint
            .name("update")
            .description("Update an item")
            .handle(|_request| async { StatusCode::NO_CONTENT });

        let doc = api.endpoints()[0].doc();
        assert_eq!(doc.method, "POST");
        assert_eq!(doc.name, "update");
        assert_eq!(doc.parameters.len(), 2);
        assert_eq!(doc.parameters[0].name, "item_id");
        assert_eq!(doc.parameters[1].location, "header");
        assert!(doc.parameters[1].optional);
    }
}
