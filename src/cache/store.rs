//! Eviction Store Module
//!
//! Main cache engine combining a HashMap index with the recency list,
//! evicting by expiry, then priority, then least-recent use.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, Entry};
use crate::cache::RecencyList;
use crate::error::{CacheError, Result};

// == Eviction Store ==
/// Fixed-capacity cache for single-threaded use.
///
/// When a `put` pushes the store over capacity, eviction runs in two passes:
/// every expired entry is purged, and if that was not enough the entry with
/// the lowest priority goes, the least recently used one among equals.
///
/// Wrap it in [`ConcurrentStore`](crate::cache::ConcurrentStore) to share it
/// between threads.
#[derive(Debug)]
pub struct EvictionStore<K, V> {
    /// Key to slot index in `list`
    index: HashMap<K, usize>,
    /// Entries ordered by access time
    list: RecencyList<Entry<K, V>>,
    /// Maximum number of entries kept after a `put`
    capacity: usize,
}

impl<K, V> EvictionStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity + 1),
            list: RecencyList::with_capacity(capacity + 1),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves a value and marks its entry as most recently used.
    ///
    /// Expiry is not checked here: an entry past its `expires_at` is still
    /// returned until an eviction pass or [`purge_expired`](Self::purge_expired)
    /// removes it.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.list.touch(idx);
        self.list.get(idx).map(|entry| &entry.value)
    }

    // == Put ==
    /// Inserts or updates an entry and marks it as most recently used.
    ///
    /// An existing key has its value, expiry and priority replaced in place.
    /// Writes are never rejected; if the store ends up over capacity the
    /// eviction passes run before returning.
    ///
    /// # Arguments
    /// * `expires_at` - Absolute expiry in Unix milliseconds
    /// * `priority` - Eviction rank, lower goes first
    pub fn put(&mut self, key: K, value: V, expires_at: u64, priority: i32) {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(idx) {
                entry.value = value;
                entry.expires_at = expires_at;
                entry.priority = priority;
            }
            self.list.touch(idx);
        } else {
            let idx = self
                .list
                .push_front(Entry::new(key.clone(), value, expires_at, priority));
            self.index.insert(key, idx);
        }

        if self.len() > self.capacity {
            self.evict(current_timestamp_ms());
        }
    }

    // == Remove ==
    /// Removes an entry, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.remove(idx).map(|entry| entry.value)
    }

    /// Checks for a key without changing its recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Purge Expired ==
    /// Removes every expired entry regardless of capacity.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(current_timestamp_ms())
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates entries from most to least recently used without touching them.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.list.iter()
    }

    // == Eviction ==
    fn evict(&mut self, now: u64) {
        let expired = self.purge_expired_at(now);
        if expired > 0 {
            debug!(expired, "evicted expired entries");
        }

        if self.len() > self.capacity {
            if let Some(priority) = self.evict_lowest_priority() {
                debug!(priority, "evicted lowest-priority entry");
            }
        }
    }

    /// Walks the whole list from the back. The walk does not stop at the first
    /// live entry, because recency order says nothing about expiry order.
    fn purge_expired_at(&mut self, now: u64) -> usize {
        let mut removed = 0;
        let mut cursor = self.list.oldest();

        while let Some(idx) = cursor {
            cursor = self.list.newer(idx);
            let expired = self
                .list
                .get(idx)
                .is_some_and(|entry| entry.is_expired_at(now));
            if expired {
                self.remove_slot(idx);
                removed += 1;
            }
        }

        removed
    }

    /// Drops the lowest-priority entry and returns its priority. The walk runs
    /// back to front and only a strictly lower priority replaces the
    /// candidate, so ties go to the least recently used entry.
    fn evict_lowest_priority(&mut self) -> Option<i32> {
        let mut victim: Option<(usize, i32)> = None;
        let mut cursor = self.list.oldest();

        while let Some(idx) = cursor {
            if let Some(entry) = self.list.get(idx) {
                if victim.map_or(true, |(_, lowest)| entry.priority < lowest) {
                    victim = Some((idx, entry.priority));
                }
            }
            cursor = self.list.newer(idx);
        }

        let (idx, priority) = victim?;
        self.remove_slot(idx);
        Some(priority)
    }

    fn remove_slot(&mut self, idx: usize) {
        if let Some(entry) = self.list.remove(idx) {
            self.index.remove(&entry.key);
        }
    }
}
