//! Handler for `POST /api/import/document`: convert an uploaded document to
//! HTML for the Studio editor. Nothing is stored.

use axum::extract::{Multipart, State};
use axum::Json;
use medtour_core::document::{convert_to_html, ImportFormat, ImportedDocument};
use medtour_core::media::check_size;

use crate::error::{AppError, AppResult};
use crate::handlers::media::read_upload;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/import/document
pub async fn import_document(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportedDocument>>> {
    let (file, _) = read_upload(multipart).await?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    check_size(file.data.len(), state.config.max_upload_bytes)?;
    let format = ImportFormat::from_filename(&file.filename)?;

    // .docx unzipping and regex passes are CPU-bound.
    let data = file.data;
    let document = tokio::task::spawn_blocking(move || convert_to_html(format, &data))
        .await
        .map_err(|e| AppError::InternalError(format!("Import task failed: {e}")))??;

    tracing::info!(
        filename = %file.filename,
        format = ?format,
        words = document.word_count,
        user_id = user.user_id,
        "Document imported"
    );
    Ok(Json(DataResponse { data: document }))
}
