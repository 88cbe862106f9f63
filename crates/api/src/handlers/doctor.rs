//! Handlers for the `/doctors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use medtour_core::validation::{
    non_negative, normalize_ids, optional_text, optional_url, require_text,
    require_text_if_present, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::doctor::{CreateDoctor, Doctor, DoctorFilter, UpdateDoctor};
use medtour_db::repositories::DoctorRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Doctor;

/// POST /api/doctors
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateDoctor>,
) -> AppResult<(StatusCode, Json<DataResponse<Doctor>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    optional_text("title", input.title.as_deref(), MAX_NAME_LEN)?;
    non_negative("experience_years", input.experience_years)?;
    optional_url("photo", input.photo.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    for (field, link) in [
        ("hospital_id", &mut input.hospital_id),
        ("destination_id", &mut input.destination_id),
        ("specialty_id", &mut input.specialty_id),
    ] {
        content::validate_link(field, *link)?;
        content::create_link(link);
    }
    input.treatment_ids = normalize_ids("treatment_ids", &input.treatment_ids)?;
    content::clean_labels(&mut input.languages);
    content::resolve_create_slug(&mut input.slug, &input.name)?;

    let doctor = DoctorRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, doctor.id, &doctor.name).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: doctor })))
}

/// GET /api/doctors
///
/// Accepts the common listing parameters plus `specialty_id`, `hospital_id`,
/// `destination_id` and `treatment_id`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<DoctorFilter>,
) -> AppResult<Json<DataResponse<Page<Doctor>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = DoctorRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/doctors/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Doctor>>> {
    let doctor = DoctorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: doctor }))
}

/// PUT /api/doctors/{id}
///
/// A link id of `0` detaches the doctor from that hospital, destination or
/// specialty.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateDoctor>,
) -> AppResult<Json<DataResponse<Doctor>>> {
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    optional_text("title", input.title.as_deref(), MAX_NAME_LEN)?;
    non_negative("experience_years", input.experience_years)?;
    optional_url("photo", input.photo.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::validate_link("hospital_id", input.hospital_id)?;
    content::validate_link("destination_id", input.destination_id)?;
    content::validate_link("specialty_id", input.specialty_id)?;
    if let Some(ids) = &input.treatment_ids {
        input.treatment_ids = Some(normalize_ids("treatment_ids", ids)?);
    }
    content::clean_labels(&mut input.languages);
    content::normalize_update_slug(&mut input.slug)?;

    let doctor = DoctorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &doctor.name).await;
    Ok(Json(DataResponse { data: doctor }))
}

/// DELETE /api/doctors/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/doctors/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
