//! Handlers for the `/testimonials` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::status::validate_content_status;
use medtour_core::types::DbId;
use medtour_core::validation::{
    optional_text, optional_url, require_text, require_text_if_present, validate_rating,
    MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::testimonial::{
    CreateTestimonial, Testimonial, TestimonialFilter, UpdateTestimonial,
};
use medtour_db::repositories::TestimonialRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Testimonial;

const MAX_CONTENT_LEN: usize = 5000;

/// POST /api/testimonials
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTestimonial>,
) -> AppResult<(StatusCode, Json<DataResponse<Testimonial>>)> {
    require_text("patient_name", &input.patient_name, MAX_NAME_LEN)?;
    require_text("content", &input.content, MAX_CONTENT_LEN)?;
    optional_text("patient_country", input.patient_country.as_deref(), MAX_NAME_LEN)?;
    validate_rating(input.rating)?;
    optional_url("photo", input.photo.as_deref())?;
    optional_url("video_url", input.video_url.as_deref())?;
    validate_content_status(input.status.as_deref())?;
    for (field, link) in [
        ("treatment_id", &mut input.treatment_id),
        ("hospital_id", &mut input.hospital_id),
        ("doctor_id", &mut input.doctor_id),
    ] {
        content::validate_link(field, *link)?;
        content::create_link(link);
    }

    let testimonial = TestimonialRepo::create(&state.pool, &input).await?;
    content::record_write(
        &state,
        &user,
        "create",
        CT,
        testimonial.id,
        &testimonial.patient_name,
    )
    .await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// GET /api/testimonials
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<TestimonialFilter>,
) -> AppResult<Json<DataResponse<Page<Testimonial>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = TestimonialRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/testimonials/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Testimonial>>> {
    let testimonial = TestimonialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: testimonial }))
}

/// PUT /api/testimonials/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTestimonial>,
) -> AppResult<Json<DataResponse<Testimonial>>> {
    require_text_if_present("patient_name", input.patient_name.as_deref(), MAX_NAME_LEN)?;
    require_text_if_present("content", input.content.as_deref(), MAX_CONTENT_LEN)?;
    optional_text("patient_country", input.patient_country.as_deref(), MAX_NAME_LEN)?;
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }
    optional_url("photo", input.photo.as_deref())?;
    optional_url("video_url", input.video_url.as_deref())?;
    validate_content_status(input.status.as_deref())?;
    content::validate_link("treatment_id", input.treatment_id)?;
    content::validate_link("hospital_id", input.hospital_id)?;
    content::validate_link("doctor_id", input.doctor_id)?;

    let testimonial = TestimonialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &testimonial.patient_name).await;
    Ok(Json(DataResponse { data: testimonial }))
}

/// DELETE /api/testimonials/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/testimonials/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
