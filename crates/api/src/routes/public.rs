//! Route definitions for the unauthenticated `/public` API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{public, submission};
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// POST /submissions     -> submission::create_public
/// GET  /{cpt}           -> public::list (published only)
/// GET  /{cpt}/{slug}    -> public::get_by_slug (published only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(submission::create_public))
        .route("/{cpt}", get(public::list))
        .route("/{cpt}/{slug}", get(public::get_by_slug))
}
