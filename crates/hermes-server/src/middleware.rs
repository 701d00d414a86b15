//! Per-endpoint middleware.
//!
//! Middleware runs after every parameter of the endpoint has been resolved
//! and validated, and wraps the handler. The first middleware attached to an
//! endpoint is the outermost one: it sees the request first and the response
//! last.
//!
//! ```ignore
//! use hermes_server::{BoxFuture, Middleware, Next};
//! use hermes_core::{Request, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(request).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "handled");
//!             response
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use hermes_core::{Request, Response};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The type-erased endpoint handler at the end of a middleware chain.
pub(crate) type Handler = dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync;

/// A request/response interceptor attached to an endpoint.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, usually by awaiting `next.run(request)`.
    ///
    /// Returning without calling `next` short-circuits the chain.
    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response>;
}

/// The remainder of a middleware chain.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(&'a Handler),
}

impl<'a> Next<'a> {
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    pub(crate) fn handler(handler: &'a Handler) -> Self {
        Self {
            inner: NextInner::Handler(handler),
        }
    }

    /// Runs the rest of the chain.
    pub async fn run(self, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(request, *next).await,
            NextInner::Handler(handler) => handler(request).await,
        }
    }
}

/// Middleware built from a closure.
///
/// ```ignore
/// let tag = FnMiddleware::new("tag", |request, next| {
///     Box::pin(async move {
///         let mut response = next.run(request).await;
///         response.headers_mut().insert("x-tag", HeaderValue::from_static("1"));
///         response
///     })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(Request, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    /// Wraps `func` under `name`.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(Request, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        (self.func)(request, next)
    }
}
