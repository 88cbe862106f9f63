//! Handlers for the `/treatments` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use medtour_core::validation::{
    optional_text, optional_url, require_text, require_text_if_present, validate_currency,
    validate_price_range, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::treatment::{CreateTreatment, Treatment, TreatmentFilter, UpdateTreatment};
use medtour_db::repositories::TreatmentRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Treatment;

/// Normalize a currency code to upper case and validate it.
fn normalize_currency(currency: &mut Option<String>) -> Result<(), medtour_core::error::CoreError> {
    if let Some(code) = currency.as_mut() {
        *code = code.trim().to_ascii_uppercase();
        validate_currency(code)?;
    }
    Ok(())
}

/// POST /api/treatments
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTreatment>,
) -> AppResult<(StatusCode, Json<DataResponse<Treatment>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    optional_text("duration", input.duration.as_deref(), MAX_NAME_LEN)?;
    optional_text("recovery_time", input.recovery_time.as_deref(), MAX_NAME_LEN)?;
    validate_price_range(input.price_from, input.price_to)?;
    normalize_currency(&mut input.currency)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::resolve_create_slug(&mut input.slug, &input.name)?;

    let treatment = TreatmentRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, treatment.id, &treatment.name).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: treatment })))
}

/// GET /api/treatments
///
/// Accepts the common listing parameters plus `specialty_id`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<TreatmentFilter>,
) -> AppResult<Json<DataResponse<Page<Treatment>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = TreatmentRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/treatments/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Treatment>>> {
    let treatment = TreatmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: treatment }))
}

/// PUT /api/treatments/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTreatment>,
) -> AppResult<Json<DataResponse<Treatment>>> {
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    optional_text("duration", input.duration.as_deref(), MAX_NAME_LEN)?;
    optional_text("recovery_time", input.recovery_time.as_deref(), MAX_NAME_LEN)?;
    validate_price_range(input.price_from, input.price_to)?;
    normalize_currency(&mut input.currency)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::normalize_update_slug(&mut input.slug)?;

    let treatment = TreatmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &treatment.name).await;
    Ok(Json(DataResponse { data: treatment }))
}

/// DELETE /api/treatments/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/treatments/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
