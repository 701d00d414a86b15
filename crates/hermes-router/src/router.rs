//! High-level router API.

use http::Method;

use crate::error::{InsertError, MatchError};
use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::RouteMatch;

/// A radix tree router mapping `(method, path)` to values of type `T`.
///
/// # Example
///
/// ```rust
/// use hermes_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert(Method::GET, "/items/{item_id}", "read_item").unwrap();
///
/// let matched = router.at(&Method::GET, "/items/42").unwrap();
/// assert_eq!(*matched.value, "read_item");
/// assert_eq!(matched.params.get("item_id"), Some("42"));
/// ```
///
/// # Route Priority
///
/// 1. **Static segments** (e.g. `/users/me`)
/// 2. **Variable segments** (e.g. `/users/{id}`)
/// 3. **Wildcard segments** (e.g. `/files/*path`)
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `value` for `method` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError`] for duplicate registrations and malformed patterns.
    pub fn insert(&mut self, method: Method, path: &str, value: T) -> Result<(), InsertError> {
        self.root.insert(path, method, value)?;
        self.route_count += 1;
        Ok(())
    }

    /// Looks up the value for `method` and `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] when no route matches the path and
    /// [`MatchError::MethodNotAllowed`] when the path matches other methods.
    pub fn at(&self, method: &Method, path: &str) -> Result<RouteMatch<'_, T>, MatchError> {
        let (methods, params) = self.root.match_path(path).ok_or(MatchError::NotFound)?;
        match methods.get(method) {
            Some(value) => Ok(RouteMatch::new(value, params)),
            None => Err(MatchError::MethodNotAllowed {
                allowed: methods.allowed(),
            }),
        }
    }

    /// Matches a path regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the number of registered `(method, path)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
