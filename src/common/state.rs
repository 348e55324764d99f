// Application state shared across all modules

use sqlx::SqlitePool;

use crate::common::dev_mode::DevModeConfig;

/// Application state containing the database pool and request-time configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub dev_mode: DevModeConfig,
}
