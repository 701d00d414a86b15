//! Matched path variables.
//!
//! Path variables are kept in match order in a small vector; most routes
//! carry one or two of them, so the common case never touches the heap.

use smallvec::SmallVec;

const INLINE_PARAMS: usize = 4;

/// Path variables captured while matching a route.
///
/// # Example
///
/// ```rust
/// use hermes_router::Params;
///
/// let mut params = Params::new();
/// params.push("item_id", "42");
///
/// assert_eq!(params.get("item_id"), Some("42"));
/// assert_eq!(params.get("q"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty set of path variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a captured variable.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a variable named `name` was captured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    // Used by the matcher to undo a capture when a branch fails.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut params = Params::new();
        params.push("org", "acme");
        params.push("id", "7");

        assert_eq!(params.get("org"), Some("acme"));
        assert_eq!(params.get("id"), Some("7"));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_truncate_drops_later_captures() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");
        params.truncate(1);

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("b"), None);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let params: Params = (0..8)
            .map(|i| (format!("k{i}"), format!("v{i}")))
            .collect();

        assert_eq!(params.len(), 8);
        assert_eq!(params.get("k6"), Some("v6"));
        let names: Vec<_> = params.iter().map(|(n, _)| n).take(2).collect();
        assert_eq!(names, vec!["k0", "k1"]);
    }
}
