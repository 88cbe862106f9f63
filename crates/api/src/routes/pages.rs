//! Route definitions for the server-rendered admin console.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /                -> dashboard
/// GET /login           -> login
/// GET /activity        -> activity log (super admin)
/// GET /{cpt}           -> Listing screen
/// GET /{cpt}/new       -> Studio, new record
/// GET /{cpt}/{id}      -> Studio, existing record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/login", get(pages::login))
        .route("/activity", get(pages::activity))
        .route("/{cpt}", get(pages::listing))
        .route("/{cpt}/new", get(pages::studio_new))
        .route("/{cpt}/{id}", get(pages::studio_edit))
}
