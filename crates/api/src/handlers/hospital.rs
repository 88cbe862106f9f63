//! Handlers for the `/hospitals` resource.
//!
//! A hospital's specialties are written to `hospital_specialties` in the same
//! transaction as the hospital row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::error::CoreError;
use medtour_core::types::DbId;
use medtour_core::validation::{
    non_negative, normalize_ids, optional_text, optional_url, require_text,
    require_text_if_present, validate_score, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::hospital::{CreateHospital, Hospital, HospitalFilter, UpdateHospital};
use medtour_db::repositories::HospitalRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Hospital;

fn validate_numbers(
    rating: Option<f64>,
    established_year: Option<i32>,
    bed_count: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(r) = rating {
        validate_score("rating", r)?;
    }
    non_negative("established_year", established_year)?;
    non_negative("bed_count", bed_count)?;
    Ok(())
}

/// POST /api/hospitals
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateHospital>,
) -> AppResult<(StatusCode, Json<DataResponse<Hospital>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    optional_text("address", input.address.as_deref(), 500)?;
    validate_numbers(input.rating, input.established_year, input.bed_count)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    input.specialty_ids = normalize_ids("specialty_ids", &input.specialty_ids)?;
    content::clean_labels(&mut input.accreditations);
    content::resolve_create_slug(&mut input.slug, &input.name)?;

    let hospital = HospitalRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, hospital.id, &hospital.name).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: hospital })))
}

/// GET /api/hospitals
///
/// Accepts the common listing parameters plus `destination_id` and `specialty_id`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<HospitalFilter>,
) -> AppResult<Json<DataResponse<Page<Hospital>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = HospitalRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/hospitals/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Hospital>>> {
    let hospital = HospitalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: hospital }))
}

/// PUT /api/hospitals/{id}
///
/// `specialty_ids`, when present, replaces the hospital's specialty set.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateHospital>,
) -> AppResult<Json<DataResponse<Hospital>>> {
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    optional_text("address", input.address.as_deref(), 500)?;
    validate_numbers(input.rating, input.established_year, input.bed_count)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    if let Some(ids) = &input.specialty_ids {
        input.specialty_ids = Some(normalize_ids("specialty_ids", ids)?);
    }
    content::clean_labels(&mut input.accreditations);
    content::normalize_update_slug(&mut input.slug)?;

    let hospital = HospitalRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &hospital.name).await;
    Ok(Json(DataResponse { data: hospital }))
}

/// DELETE /api/hospitals/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/hospitals/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
