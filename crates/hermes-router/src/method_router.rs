//! Per-path method table.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to routed values for a single path.
///
/// # Example
///
/// ```rust
/// use hermes_router::MethodRouter;
/// use http::Method;
///
/// let mut methods = MethodRouter::new();
/// assert!(methods.insert(Method::GET, 0_usize).is_none());
/// assert!(methods.insert(Method::POST, 1).is_none());
///
/// assert_eq!(methods.get(&Method::GET), Some(&0));
/// assert_eq!(methods.get(&Method::DELETE), None);
/// assert_eq!(methods.allowed(), vec![Method::GET, Method::POST]);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    routes: SmallVec<[(Method, T); 2]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            routes: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for `method`.
    ///
    /// An existing registration is left untouched and the rejected value is
    /// handed back to the caller.
    pub fn insert(&mut self, method: Method, value: T) -> Option<T> {
        if self.routes.iter().any(|(m, _)| *m == method) {
            return Some(value);
        }
        self.routes.push((method, value));
        None
    }

    /// Returns the value registered for `method`.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        self.routes
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, v)| v)
    }

    /// Returns the registered methods in registration order.
    #[must_use]
    pub fn allowed(&self) -> Vec<Method> {
        self.routes.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Returns true if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
