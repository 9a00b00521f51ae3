//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{expiry_after, ConcurrentStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse};

/// The cache as seen by the HTTP layer.
pub type SharedCache = Arc<ConcurrentStore<String, String>>;

/// Application state shared across all handlers.
///
/// The store serializes access internally, so handlers call it directly and
/// never hold its lock across an `.await`.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: SharedCache,
    /// TTL in seconds applied when a set request has none
    pub default_ttl: u64,
    /// Priority applied when a set request has none
    pub default_priority: i32,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(
        cache: ConcurrentStore<String, String>,
        default_ttl: u64,
        default_priority: i32,
    ) -> Self {
        Self {
            cache: Arc::new(cache),
            default_ttl,
            default_priority,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` if `max_entries` is zero.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = ConcurrentStore::new(config.max_entries)?;
        Ok(Self::new(cache, config.default_ttl, config.default_priority))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with optional TTL and priority. Never fails for
/// lack of room: the store evicts instead.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let expires_at = expiry_after(req.ttl.unwrap_or(state.default_ttl));
    let priority = req.priority.unwrap_or(state.default_priority);
    state
        .cache
        .put(req.key.clone(), req.value, expires_at, priority);

    Ok(Json(SetResponse::new(req.key, expires_at, priority)))
}

/// Handler for GET /get/:key
///
/// An entry past its TTL is still served until an eviction pass purges it.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(key.as_str()) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    match state.cache.remove(key.as_str()) {
        Some(value) => Ok(Json(DeleteResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
