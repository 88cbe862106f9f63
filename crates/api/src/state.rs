use std::sync::Arc;

use crate::auth::throttle::LoginThrottle;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: medtour_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Failed-login counters per client IP.
    pub login_throttle: Arc<LoginThrottle>,
}

impl AppState {
    pub fn new(pool: medtour_db::DbPool, config: ServerConfig) -> Self {
        let login_throttle = LoginThrottle::new(
            config.login_max_attempts,
            std::time::Duration::from_secs(config.login_window_secs),
        );
        Self {
            pool,
            config: Arc::new(config),
            login_throttle: Arc::new(login_throttle),
        }
    }
}
