//! Handlers for the `/destinations` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use medtour_core::validation::{
    optional_text, optional_url, require_text, require_text_if_present, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::destination::{
    CreateDestination, Destination, DestinationFilter, UpdateDestination,
};
use medtour_db::repositories::DestinationRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Destination;

/// POST /api/destinations
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateDestination>,
) -> AppResult<(StatusCode, Json<DataResponse<Destination>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    require_text("country", &input.country, MAX_NAME_LEN)?;
    optional_text("city", input.city.as_deref(), MAX_NAME_LEN)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::resolve_create_slug(&mut input.slug, &input.name)?;

    let destination = DestinationRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, destination.id, &destination.name).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: destination })))
}

/// GET /api/destinations
///
/// Accepts the common listing parameters plus `country`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<DestinationFilter>,
) -> AppResult<Json<DataResponse<Page<Destination>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = DestinationRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/destinations/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Destination>>> {
    let destination = DestinationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: destination }))
}

/// PUT /api/destinations/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateDestination>,
) -> AppResult<Json<DataResponse<Destination>>> {
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    require_text_if_present("country", input.country.as_deref(), MAX_NAME_LEN)?;
    optional_text("city", input.city.as_deref(), MAX_NAME_LEN)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::normalize_update_slug(&mut input.slug)?;

    let destination = DestinationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &destination.name).await;
    Ok(Json(DataResponse { data: destination }))
}

/// DELETE /api/destinations/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/destinations/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
