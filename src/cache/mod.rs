//! Cache Module
//!
//! Provides a fixed-capacity cache that evicts expired entries first, then the
//! lowest-priority entry, breaking ties by least-recent use.

mod entry;
mod lru;
mod shared;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, expiry_after, Entry, NEVER_EXPIRES};
pub use lru::RecencyList;
pub use shared::ConcurrentStore;
pub use store::EvictionStore;
