use std::sync::Arc;

use edurank_db::DbPool;

use crate::config::ServerConfig;

/// State shared by every handler and state-aware middleware. Cloning only
/// bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<ServerConfig>) -> Self {
        Self { pool, config }
    }
}
