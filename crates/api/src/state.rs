use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the pool is an `Arc` internally, the config is
/// behind one explicitly).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: estoca_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
