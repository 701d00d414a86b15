//! # Hermes
//!
//! Declare HTTP parameters once, as typed descriptors, and get extraction,
//! coercion, validation, per-request caching and documentation from the same
//! declaration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hermes::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut api = Api::new(ApiInfo::new("Items API").version("1.0.0"));
//!
//!     let mut read_item = api.get("/items/{item_id}");
//!     let item_id = read_item.param(ParamSpec::<i64>::path("item_id"));
//!     read_item.handle(move |request| {
//!         let id = item_id.value(&request);
//!         async move { format!("item {id}") }
//!     });
//!
//!     Server::new(api.build()).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request lifecycle
//!
//! ```text
//! Request → route → use params (fail-fast) → middleware → handler
//!                          ↓ rejected                        ↓
//!                 on_error / 422 JSON            Response ← dispose cache
//! ```
//!
//! Values are cached per request id inside each descriptor and dropped when
//! the request finishes, whatever the outcome.

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use hermes_config as config;
pub use hermes_core as core;
pub use hermes_docs as docs;
pub use hermes_extract as extract;
pub use hermes_router as router;
pub use hermes_server as server;
pub use hermes_telemetry as telemetry;

pub use hermes_server::{Api, App, Server};

/// Commonly used types.
///
/// ```rust
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use hermes_core::{
        HtmlResponse, IntoResponse, JsonResponse, Request, RequestId, Response, TextResponse,
    };

    pub use hermes_extract::{Param, ParamError, ParamErrorKind, ParamSpec, Parameter, Source};

    pub use hermes_docs::{ApiDoc, ApiInfo};

    pub use hermes_server::{
        validation_error, Api, App, BoxFuture, FnMiddleware, Middleware, Next, Server,
        ShutdownSignal,
    };

    pub use hermes_config::{ConfigLoader, HermesConfig};

    pub use hermes_telemetry::{init_logging, LogConfig};

    pub use http::{Method, StatusCode};
}
