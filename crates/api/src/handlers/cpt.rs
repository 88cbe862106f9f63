//! Handlers exposing the content type registry to the admin console.

use axum::extract::Path;
use axum::Json;
use medtour_core::cpt::{registry, ContentType, CptConfig};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

/// GET /api/cpt
pub async fn list(RequireAuth(_user): RequireAuth) -> Json<DataResponse<Vec<CptConfig>>> {
    Json(DataResponse { data: registry() })
}

/// GET /api/cpt/{key}
pub async fn get_by_key(
    RequireAuth(_user): RequireAuth,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<CptConfig>>> {
    let ct = ContentType::from_key(&key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown content type '{key}'")))?;
    Ok(Json(DataResponse { data: ct.config() }))
}
