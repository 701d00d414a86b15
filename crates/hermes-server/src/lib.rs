//! # Hermes Server
//!
//! Endpoints with typed parameters, API groups, documentation routes and an
//! HTTP/1.1 server.
//!
//! Every request to an endpoint goes through the same lifecycle: its
//! parameters are resolved and validated in declaration order, the first
//! failure rejects the request with `422`, the middleware chain and handler
//! run on success, and every cached parameter value is disposed afterwards.
//!
//! ```rust
//! use hermes_docs::ApiInfo;
//! use hermes_extract::ParamSpec;
//! use hermes_server::Api;
//!
//! let mut api = Api::new(ApiInfo::new("Items API"));
//!
//! let mut read_item = api.get("/items/{item_id}");
//! let item_id = read_item.param(ParamSpec::<i64>::path("item_id"));
//! let q = read_item.param(ParamSpec::<String>::query("q").optional());
//! read_item.name("read_item").handle(move |request| {
//!     let body = serde_json::json!({
//!         "item_id": item_id.value(&request),
//!         "q": q.value(&request),
//!     });
//!     async move { body }
//! });
//!
//! let app = api.build();
//! assert_eq!(app.endpoints().len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod app;
mod endpoint;
mod error;
mod middleware;
mod server;
mod shutdown;

pub use api::Api;
pub use app::{App, HealthStatus, DOCS_HTML_PATH, DOCS_JSON_PATH, HEALTH_PATH};
pub use endpoint::{validation_error, Endpoint, EndpointBuilder, ErrorHandler};
pub use error::{ServerError, ServerResult};
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
