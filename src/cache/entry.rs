//! Cache Entry Module
//!
//! Defines a single cached item with its absolute expiry and eviction priority.

use std::time::{SystemTime, UNIX_EPOCH};

/// Expiry value for entries that should never be purged by the expire pass.
pub const NEVER_EXPIRES: u64 = u64::MAX;

// == Cache Entry ==
/// One cached item.
///
/// The key is kept alongside the value so an entry found by walking the
/// recency list can be dropped from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// Key the entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Eviction rank, lower is evicted first
    pub priority: i32,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    pub fn new(key: K, value: V, expires_at: u64, priority: i32) -> Self {
        Self {
            key,
            value,
            expires_at,
            priority,
        }
    }

    // == Is Expired ==
    /// Checks the entry against a given clock reading.
    ///
    /// Boundary condition: an entry whose expiry equals `now` is already
    /// expired.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at <= now
    }

    /// Checks the entry against the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None for entries that never expire.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` otherwise
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        if self.expires_at == NEVER_EXPIRES {
            return None;
        }
        Some(self.expires_at.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Converts a relative TTL in seconds into an absolute expiry timestamp.
pub fn expiry_after(ttl_seconds: u64) -> u64 {
    current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("k", "v", NEVER_EXPIRES, 3);

        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, "v");
        assert_eq!(entry.priority, 3);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry::new("k", "v", 1_000, 0);

        assert!(!entry.is_expired_at(999));
        assert!(entry.is_expired_at(1_000), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(1_001));
    }

    #[test]
    fn test_entry_in_the_past_is_expired() {
        let entry = Entry::new("k", "v", current_timestamp_ms() - 1, 0);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = Entry::new("k", "v", expiry_after(10), 0);

        let remaining_ms = entry.ttl_remaining_ms().unwrap();
        assert!(remaining_ms <= 10_000);
        assert!(remaining_ms >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_never_expires() {
        let entry = Entry::new("k", "v", NEVER_EXPIRES, 0);
        assert!(entry.ttl_remaining_ms().is_none());
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = Entry::new("k", "v", 0, 0);
        assert_eq!(entry.ttl_remaining_ms(), Some(0));
    }

    #[test]
    fn test_expiry_after_saturates() {
        assert_eq!(expiry_after(u64::MAX), u64::MAX);
    }
}
