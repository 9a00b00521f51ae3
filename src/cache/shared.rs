//! Shared Store Module
//!
//! Thread-safe wrapper serializing every store operation under one lock.

use std::borrow::Borrow;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::EvictionStore;
use crate::error::Result;

// == Concurrent Store ==
/// An [`EvictionStore`] behind a single mutex, for sharing via `Arc`.
///
/// Every call takes the lock once for its whole duration, so operations are
/// linearizable and never observe a half-finished eviction. A `Mutex` is used
/// rather than a `RwLock` because `get` reorders the recency list too.
///
/// `parking_lot` guards release on unwind and the lock never poisons, so a
/// panic inside [`get_with`](Self::get_with) leaves the cache usable.
#[derive(Debug)]
pub struct ConcurrentStore<K, V> {
    inner: Mutex<EvictionStore<K, V>>,
}

impl<K, V> ConcurrentStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty shared store.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_store(EvictionStore::new(capacity)?))
    }

    /// Wraps an existing store.
    pub fn from_store(store: EvictionStore<K, V>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    // == Get ==
    /// Returns a clone of the value and marks it as most recently used.
    ///
    /// Like [`EvictionStore::get`], expiry is not checked.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Runs `f` on the value while the lock is held, avoiding a clone.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    // == Put ==
    pub fn put(&self, key: K, value: V, expires_at: u64, priority: i32) {
        self.inner.lock().put(key, value, expires_at, priority);
    }

    // == Remove ==
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Unwraps the store once no other handles remain.
    pub fn into_inner(self) -> EvictionStore<K, V> {
        self.inner.into_inner()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NEVER_EXPIRES;
    use crate::error::CacheError;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_store_zero_capacity_rejected() {
        let result: Result<ConcurrentStore<u32, u32>> = ConcurrentStore::new(0);
        assert_eq!(result.unwrap_err(), CacheError::InvalidCapacity(0));
    }

    #[test]
    fn test_concurrent_store_same_contract() {
        let store = ConcurrentStore::new(2).unwrap();

        store.put(1, 100, NEVER_EXPIRES, 0);
        store.put(2, 200, NEVER_EXPIRES, 0);
        store.put(3, 300, NEVER_EXPIRES, 0);

        assert_eq!(store.get(&1), None);
        assert_eq!(store.get(&2), Some(200));
        assert_eq!(store.get(&3), Some(300));
        assert_eq!(store.len(), 2);
        assert_eq!(store.capacity(), 2);
    }

    #[test]
    fn test_get_with_avoids_clone() {
        let store = ConcurrentStore::new(4).unwrap();

        store.put("k".to_string(), vec![1, 2, 3], NEVER_EXPIRES, 0);

        assert_eq!(store.get_with("k", |v| v.len()), Some(3));
        assert_eq!(store.get_with("missing", |v| v.len()), None);
    }

    #[test]
    fn test_remove_and_purge() {
        let store = ConcurrentStore::new(4).unwrap();

        store.put("a", 1, 0, 0);
        store.put("b", 2, NEVER_EXPIRES, 0);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.remove("b"), Some(2));
        assert!(store.is_empty());
        assert!(!store.contains_key("b"));
    }

    #[test]
    fn test_panic_inside_critical_section_releases_lock() {
        let store = ConcurrentStore::new(4).unwrap();
        store.put("k", 1, NEVER_EXPIRES, 0);

        let result = catch_unwind(AssertUnwindSafe(|| {
            store.get_with("k", |_| -> u8 { panic!("boom") })
        }));
        assert!(result.is_err());

        store.put("j", 2, NEVER_EXPIRES, 0);
        assert_eq!(store.get("k"), Some(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_threads_respect_capacity() {
        let capacity = 16;
        let store = Arc::new(ConcurrentStore::new(capacity).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        let key = t * 1_000 + i;
                        store.put(key, i, NEVER_EXPIRES, (i % 5) as i32);
                        let _ = store.get(&key);
                        assert!(store.len() <= capacity);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let store = Arc::try_unwrap(store).unwrap().into_inner();
        assert_eq!(store.len(), capacity);
        assert_eq!(store.iter().count(), capacity);
    }

    #[test]
    fn test_readers_see_complete_values() {
        let store = Arc::new(ConcurrentStore::new(8).unwrap());
        store.put(0u8, vec![0u8; 64], NEVER_EXPIRES, 0);

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 1..=200u8 {
                    store.put(0, vec![round; 64], NEVER_EXPIRES, 0);
                }
            })
        };

        for _ in 0..200 {
            if let Some(value) = store.get(&0) {
                assert_eq!(value.len(), 64);
                assert!(value.iter().all(|b| *b == value[0]));
            }
        }

        writer.join().unwrap();
        assert_eq!(store.get(&0), Some(vec![200u8; 64]));
    }
}
