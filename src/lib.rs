//! Prio Cache - A fixed-capacity in-memory cache
//!
//! Evicts expired entries first, then the lowest-priority entry, breaking ties
//! by least-recent use. Usable single-threaded or behind one lock, with an
//! optional HTTP front-end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{ConcurrentStore, EvictionStore};
pub use config::Config;
pub use error::CacheError;
