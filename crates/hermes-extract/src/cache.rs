//! Request-scoped value cache.

use dashmap::DashMap;
use hermes_core::RequestId;

/// Resolved values of one descriptor, keyed by request identity.
///
/// Each descriptor owns exactly one cache. Entries are sharded across locks,
/// so concurrent requests on the same endpoint do not contend on a single
/// mutex, and no lock is shared between descriptors.
///
/// # Example
///
/// ```rust
/// use hermes_core::RequestId;
/// use hermes_extract::ValueCache;
///
/// let cache = ValueCache::new();
/// let id = RequestId::new();
///
/// assert_eq!(cache.insert_if_absent(id, 1), 1);
/// assert_eq!(cache.insert_if_absent(id, 2), 1);
/// assert_eq!(cache.remove(id), Some(1));
/// assert!(cache.is_empty());
/// ```
#[derive(Debug)]
pub struct ValueCache<T> {
    entries: DashMap<RequestId, T>,
}

impl<T> Default for ValueCache<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T: Clone> ValueCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the value stored for `id`.
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<T> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Stores `value` unless an entry for `id` exists, returning the stored value.
    pub fn insert_if_absent(&self, id: RequestId, value: T) -> T {
        self.entries.entry(id).or_insert(value).value().clone()
    }

    /// Removes and returns the entry for `id`.
    pub fn remove(&self, id: RequestId) -> Option<T> {
        self.entries.remove(&id).map(|(_, value)| value)
    }

    /// Returns true if an entry for `id` exists.
    #[must_use]
    pub fn contains(&self, id: RequestId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_entries_are_isolated_by_id() {
        let cache = ValueCache::new();
        let a = RequestId::new();
        let b = RequestId::new();

        cache.insert_if_absent(a, "alpha".to_string());
        cache.insert_if_absent(b, "beta".to_string());

        assert_eq!(cache.get(a).as_deref(), Some("alpha"));
        assert_eq!(cache.get(b).as_deref(), Some("beta"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_remove_is_exactly_once() {
        let cache = ValueCache::new();
        let id = RequestId::new();
        cache.insert_if_absent(id, 5_u32);

        assert_eq!(cache.remove(id), Some(5));
        assert_eq!(cache.remove(id), None);
        assert!(!cache.contains(id));
    }

    #[test]
    fn test_concurrent_inserts_keep_first_value() {
        let cache = Arc::new(ValueCache::new());
        let id = RequestId::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.insert_if_absent(id, i))
            })
            .collect();
        let seen: Vec<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = cache.get(id).unwrap();
        assert!(seen.iter().all(|v| *v == stored));
        assert_eq!(cache.len(), 1);
    }
}
