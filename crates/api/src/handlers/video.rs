//! Handlers for the `/videos` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::status::validate_content_status;
use medtour_core::types::DbId;
use medtour_core::validation::{
    non_negative, optional_text, optional_url, require_text, require_text_if_present,
    validate_url, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::video::{CreateVideo, UpdateVideo, Video, VideoFilter};
use medtour_db::repositories::VideoRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Video;

/// POST /api/videos
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateVideo>,
) -> AppResult<(StatusCode, Json<DataResponse<Video>>)> {
    require_text("title", &input.title, MAX_NAME_LEN)?;
    require_text("url", &input.url, 2048)?;
    validate_url("url", &input.url)?;
    optional_url("thumbnail", input.thumbnail.as_deref())?;
    optional_text("description", input.description.as_deref(), 5000)?;
    non_negative("duration_secs", input.duration_secs)?;
    validate_content_status(input.status.as_deref())?;
    for (field, link) in [
        ("treatment_id", &mut input.treatment_id),
        ("specialty_id", &mut input.specialty_id),
        ("hospital_id", &mut input.hospital_id),
    ] {
        content::validate_link(field, *link)?;
        content::create_link(link);
    }
    content::resolve_create_slug(&mut input.slug, &input.title)?;

    let video = VideoRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, video.id, &video.title).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// GET /api/videos
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<VideoFilter>,
) -> AppResult<Json<DataResponse<Page<Video>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = VideoRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/videos/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Video>>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: video }))
}

/// PUT /api/videos/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateVideo>,
) -> AppResult<Json<DataResponse<Video>>> {
    require_text_if_present("title", input.title.as_deref(), MAX_NAME_LEN)?;
    if let Some(url) = &input.url {
        require_text("url", url, 2048)?;
        validate_url("url", url)?;
    }
    optional_url("thumbnail", input.thumbnail.as_deref())?;
    optional_text("description", input.description.as_deref(), 5000)?;
    non_negative("duration_secs", input.duration_secs)?;
    validate_content_status(input.status.as_deref())?;
    content::validate_link("treatment_id", input.treatment_id)?;
    content::validate_link("specialty_id", input.specialty_id)?;
    content::validate_link("hospital_id", input.hospital_id)?;
    content::normalize_update_slug(&mut input.slug)?;

    let video = VideoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &video.title).await;
    Ok(Json(DataResponse { data: video }))
}

/// DELETE /api/videos/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/videos/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
