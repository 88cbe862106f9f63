//! Route definitions for the `/submissions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submission;
use crate::state::AppState;

/// Staff inbox routes mounted at `/submissions`.
///
/// ```text
/// GET    /          -> list
/// GET    /export    -> export (CSV)
/// POST   /bulk      -> bulk
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submission::list))
        .route("/export", get(submission::export))
        .route("/bulk", post(submission::bulk))
        .route(
            "/{id}",
            get(submission::get_by_id)
                .put(submission::update)
                .delete(submission::delete),
        )
}
