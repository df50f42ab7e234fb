//! Application state shared across handlers

use backlot_core::Config;
use backlot_db::MediaRepository;
use sqlx::PgPool;

/// Shared application state
///
/// Cloning is cheap: the pool and repository are handle types.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: MediaRepository,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            media: MediaRepository::new(pool.clone()),
            pool,
            config,
        }
    }
}
