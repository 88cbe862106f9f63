//! Handlers for the `/specialties` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::status::validate_content_status;
use medtour_core::types::DbId;
use medtour_core::validation::{non_negative, optional_text, require_text, require_text_if_present, MAX_NAME_LEN};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::specialty::{CreateSpecialty, Specialty, UpdateSpecialty};
use medtour_db::repositories::SpecialtyRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Specialty;

/// POST /api/specialties
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateSpecialty>,
) -> AppResult<(StatusCode, Json<DataResponse<Specialty>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    optional_text("icon", input.icon.as_deref(), MAX_NAME_LEN)?;
    non_negative("sort_order", input.sort_order)?;
    validate_content_status(input.status.as_deref())?;
    content::resolve_create_slug(&mut input.slug, &input.name)?;

    let specialty = SpecialtyRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, specialty.id, &specialty.name).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: specialty })))
}

/// GET /api/specialties
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Page<Specialty>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = SpecialtyRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/specialties/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Specialty>>> {
    let specialty = SpecialtyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: specialty }))
}

/// PUT /api/specialties/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateSpecialty>,
) -> AppResult<Json<DataResponse<Specialty>>> {
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    optional_text("icon", input.icon.as_deref(), MAX_NAME_LEN)?;
    non_negative("sort_order", input.sort_order)?;
    validate_content_status(input.status.as_deref())?;
    content::normalize_update_slug(&mut input.slug)?;

    let specialty = SpecialtyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &specialty.name).await;
    Ok(Json(DataResponse { data: specialty }))
}

/// DELETE /api/specialties/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/specialties/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
