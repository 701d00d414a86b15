//! The routed application: request identity, dispatch and built-in routes.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use hermes_core::{HtmlResponse, IntoResponse, JsonResponse, Request, RequestId, Response, REQUEST_ID_HEADER};
use hermes_docs::{render_html, ApiDoc};
use hermes_router::{MatchError, Router};
use hermes_telemetry::{log_request_complete, log_request_start};
use http::header::{HeaderValue, ALLOW};
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::endpoint::Endpoint;

/// Path of the JSON documentation.
pub const DOCS_JSON_PATH: &str = "/docs.json";
/// Path of the HTML documentation.
pub const DOCS_HTML_PATH: &str = "/docs.html";
/// Path of the health check.
pub const HEALTH_PATH: &str = "/health";

const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Endpoint(usize),
    DocsJson,
    DocsHtml,
    Health,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// API title.
    pub service: String,
    /// API version.
    pub version: String,
}

/// A built API, ready to dispatch requests.
///
/// `App` is immutable; share it behind an [`Arc`] across connections.
pub struct App {
    router: Router<Target>,
    endpoints: Vec<Arc<Endpoint>>,
    doc: ApiDoc,
    docs_html: String,
    health: HealthStatus,
    trust_request_id: bool,
}

impl App {
    pub(crate) fn new(
        mut router: Router<Target>,
        endpoints: Vec<Arc<Endpoint>>,
        doc: ApiDoc,
        docs_enabled: bool,
        trust_request_id: bool,
    ) -> Self {
        let mut builtins = vec![(HEALTH_PATH, Target::Health)];
        if docs_enabled {
            builtins.push((DOCS_JSON_PATH, Target::DocsJson));
            builtins.push((DOCS_HTML_PATH, Target::DocsHtml));
        }
        for (path, target) in builtins {
            if let Err(err) = router.insert(Method::GET, path, target) {
                warn!(http.route = path, error = %err, "built-in route shadowed by an endpoint");
            }
        }

        let health = HealthStatus {
            status: "healthy",
            service: if doc.title.is_empty() {
                "hermes".to_string()
            } else {
                doc.title.clone()
            },
            version: if doc.version.is_empty() {
                env!("CARGO_PKG_VERSION").to_string()
            } else {
                doc.version.clone()
            },
        };
        let docs_html = if docs_enabled {
            render_html(&doc)
        } else {
            String::new()
        };

        Self {
            router,
            endpoints,
            doc,
            docs_html,
            health,
            trust_request_id,
        }
    }

    /// Routed endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    /// The documentation served at `/docs.json`.
    #[must_use]
    pub fn doc(&self) -> &ApiDoc {
        &self.doc
    }

    /// Total number of cached parameter values across all endpoints.
    ///
    /// Zero whenever no request is in flight.
    #[must_use]
    pub fn live_entries(&self) -> usize {
        self.endpoints
            .iter()
            .flat_map(|e| e.parameters())
            .map(|p| p.live_entries())
            .sum()
    }

    /// Dispatches one buffered request.
    ///
    /// A fresh [`RequestId`] keys every parameter cache for the request. When
    /// trusted, a well-formed incoming `x-request-id` becomes the correlation
    /// id; either way the correlation id is echoed in the response.
    pub async fn dispatch(&self, request: http::Request<Bytes>) -> Response {
        let start = Instant::now();
        let incoming = if self.trust_request_id {
            incoming_request_id(request.headers())
        } else {
            None
        };

        let mut request = Request::from_http(request, RequestId::new());
        if let Some(id) = incoming {
            request.set_correlation_id(id);
        }
        let correlation_id = request.correlation_id().into_owned();
        log_request_start!(correlation_id, request.method(), request.path());

        let mut response = self.route(request, &correlation_id).await;

        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log_request_complete!(correlation_id, response.status().as_u16(), elapsed_ms);
        response
    }

    async fn route(&self, mut request: Request, correlation_id: &str) -> Response {
        let target = match self.router.at(request.method(), request.path()) {
            Ok(matched) => {
                let target = *matched.value;
                request.set_path_params(matched.params);
                target
            }
            Err(MatchError::NotFound) => return not_found(request.path()),
            Err(MatchError::MethodNotAllowed { allowed }) => return method_not_allowed(&allowed),
        };

        match target {
            Target::Endpoint(index) => match self.endpoints.get(index) {
                Some(endpoint) => serve(Arc::clone(endpoint), request, correlation_id).await,
                None => not_found(request.path()),
            },
            Target::DocsJson => JsonResponse::new(&self.doc).into_response(),
            Target::DocsHtml => HtmlResponse::new(self.docs_html.clone()).into_response(),
            Target::Health => JsonResponse::new(&self.health).into_response(),
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("endpoints", &self.endpoints.len())
            .field("trust_request_id", &self.trust_request_id)
            .finish_non_exhaustive()
    }
}

/// Runs the endpoint on its own task so a panicking handler becomes a 500.
async fn serve(endpoint: Arc<Endpoint>, request: Request, correlation_id: &str) -> Response {
    let route = endpoint.path().to_string();
    match tokio::spawn(async move { endpoint.serve(request).await }).await {
        Ok(response) => response,
        Err(err) => {
            error!(
                request_id = %correlation_id,
                http.route = %route,
                error = %err,
                "handler failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "internal server error" }),
            )
                .into_response()
        }
    }
}

fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let well_formed = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'));
    well_formed.then(|| value.to_string())
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        serde_json::json!({ "error": "not found", "path": path }),
    )
        .into_response()
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let names: Vec<&str> = allowed.iter().map(Method::as_str).collect();
    let mut response = (
        StatusCode::METHOD_NOT_ALLOWED,
        serde_json::json!({ "error": "method not allowed", "allowed": names }),
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&names.join(", ")) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
