//! Radix tree router for Hermes.
//!
//! The router maps `(method, path pattern)` pairs to arbitrary values and
//! captures `{name}` path variables while matching. Hermes routes to endpoint
//! indices; the router itself knows nothing about endpoints.
//!
//! # Example
//!
//! ```rust
//! use hermes_router::{MatchError, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(Method::GET, "/users/{id}", 0_usize).unwrap();
//!
//! let matched = router.at(&Method::GET, "/users/123").unwrap();
//! assert_eq!(*matched.value, 0);
//! assert_eq!(matched.params.get("id"), Some("123"));
//!
//! assert!(matches!(
//!     router.at(&Method::POST, "/users/123"),
//!     Err(MatchError::MethodNotAllowed { .. })
//! ));
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod method_router;
mod node;
mod params;
mod router;

pub use error::{InsertError, MatchError};
pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

/// A matched route: the routed value and the captured path variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// Value registered for the route
    pub value: &'a T,
    /// Captured path variables
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}
