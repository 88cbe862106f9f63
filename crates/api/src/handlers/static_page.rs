//! Handlers for the `/pages` resource (About, Privacy, Terms, ...).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::{ContentType, PAGE_TEMPLATES};
use medtour_core::error::CoreError;
use medtour_core::types::DbId;
use medtour_core::validation::{require_text, require_text_if_present, MAX_NAME_LEN};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::static_page::{CreateStaticPage, StaticPage, UpdateStaticPage};
use medtour_db::repositories::StaticPageRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::StaticPage;

fn validate_template(template: Option<&str>) -> Result<(), CoreError> {
    match template {
        Some(t) if !PAGE_TEMPLATES.contains(&t) => Err(CoreError::Validation(format!(
            "Invalid template '{t}'. Must be one of: {}",
            PAGE_TEMPLATES.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// POST /api/pages
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateStaticPage>,
) -> AppResult<(StatusCode, Json<DataResponse<StaticPage>>)> {
    require_text("title", &input.title, MAX_NAME_LEN)?;
    validate_template(input.template.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::resolve_create_slug(&mut input.slug, &input.title)?;

    let page = StaticPageRepo::create(&state.pool, &input).await?;
    content::record_write(&state, &user, "create", CT, page.id, &page.title).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /api/pages
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Page<StaticPage>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = StaticPageRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/pages/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StaticPage>>> {
    let page = StaticPageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/pages/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateStaticPage>,
) -> AppResult<Json<DataResponse<StaticPage>>> {
    require_text_if_present("title", input.title.as_deref(), MAX_NAME_LEN)?;
    validate_template(input.template.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::normalize_update_slug(&mut input.slug)?;

    let page = StaticPageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &page.title).await;
    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/pages/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/pages/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
