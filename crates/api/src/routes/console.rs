//! Route definitions backing the admin console: content type registry,
//! dashboard figures and the activity log.

use axum::routing::get;
use axum::Router;

use crate::handlers::{activity, cpt, dashboard};
use crate::state::AppState;

/// ```text
/// GET /cpt          -> cpt::list
/// GET /cpt/{key}    -> cpt::get_by_key
/// GET /dashboard    -> dashboard::get
/// GET /activity     -> activity::list (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cpt", get(cpt::list))
        .route("/cpt/{key}", get(cpt::get_by_key))
        .route("/dashboard", get(dashboard::get))
        .route("/activity", get(activity::list))
}
