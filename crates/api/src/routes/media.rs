//! Route definitions for the `/media` resource and document import.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{import, media};
use crate::state::AppState;

/// Media library routes mounted at `/media`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> upload (multipart)
/// POST   /editor-upload  -> editor_upload (multipart, images only)
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list).post(media::upload))
        .route("/editor-upload", post(media::editor_upload))
        .route(
            "/{id}",
            get(media::get_by_id).put(media::update).delete(media::delete),
        )
}

/// Routes mounted at `/import`.
///
/// ```text
/// POST /document -> import_document (multipart)
/// ```
pub fn import_router() -> Router<AppState> {
    Router::new().route("/document", post(import::import_document))
}
