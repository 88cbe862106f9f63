//! Handlers for visitor enquiries: the public form endpoint and the staff
//! inbox (`/submissions`).

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use medtour_core::bulk::{validate_ids, BulkResult, BulkSubmissionAction};
use medtour_core::cpt::{ContentType, FORM_TYPES};
use medtour_core::csv::to_csv;
use medtour_core::error::CoreError;
use medtour_core::status::validate_submission_status;
use medtour_core::types::DbId;
use medtour_core::validation::{optional_text, require_text, validate_email, MAX_NAME_LEN};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::submission::{
    CreateSubmission, Submission, SubmissionFilter, UpdateSubmission,
};
use medtour_db::repositories::{ContentRepo, SubmissionRepo};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::activity::{record, Activity};
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::auth::ClientIp;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Submission;

const MAX_MESSAGE_LEN: usize = 5000;

const EXPORT_HEADERS: &[&str] = &[
    "id",
    "created_at",
    "form_type",
    "status",
    "name",
    "email",
    "phone",
    "country",
    "treatment",
    "message",
    "source_page",
    "notes",
];

/// POST /api/public/submissions
///
/// Unauthenticated. The row always starts in the `new` state and records the
/// client address.
pub async fn create_public(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(mut input): Json<CreateSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<Submission>>)> {
    require_text("name", &input.name, MAX_NAME_LEN)?;
    require_text("email", &input.email, MAX_NAME_LEN)?;
    validate_email(&input.email)?;
    input.email = input.email.trim().to_string();
    optional_text("phone", input.phone.as_deref(), 50)?;
    optional_text("country", input.country.as_deref(), MAX_NAME_LEN)?;
    optional_text("message", input.message.as_deref(), MAX_MESSAGE_LEN)?;
    optional_text("source_page", input.source_page.as_deref(), 2048)?;
    if let Some(form_type) = input.form_type.as_deref() {
        if !FORM_TYPES.contains(&form_type) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid form_type '{form_type}'. Must be one of: {}",
                FORM_TYPES.join(", ")
            ))));
        }
    }
    content::validate_link("treatment_id", input.treatment_id)?;
    content::create_link(&mut input.treatment_id);

    let ip = ip.map(|ip| ip.to_string());
    let submission = SubmissionRepo::create(&state.pool, &input, ip.as_deref()).await?;

    tracing::info!(
        id = submission.id,
        form_type = %submission.form_type,
        "Submission received"
    );
    record(
        &state,
        Activity {
            user: None,
            action: "create",
            entity_type: CT.entity_type(),
            entity_id: Some(submission.id),
            summary: format!("New {} enquiry from {}", submission.form_type, submission.name),
            details: None,
        },
    )
    .await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}

/// GET /api/submissions
///
/// Listing parameters plus `form_type`, `treatment_id`, `from` and `to`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<SubmissionFilter>,
) -> AppResult<Json<DataResponse<Page<Submission>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = SubmissionRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/submissions/export
///
/// Same filters as the listing, returned as a CSV attachment.
pub async fn export(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<SubmissionFilter>,
) -> AppResult<impl IntoResponse> {
    let params = ListParams::resolve(CT, &query)?;
    let rows = SubmissionRepo::export(&state.pool, &params, &filter).await?;
    let count = rows.len();

    let body = to_csv(
        EXPORT_HEADERS,
        rows.into_iter().map(|s| {
            vec![
                s.id.to_string(),
                s.created_at.to_rfc3339(),
                s.form_type,
                s.status,
                s.name,
                s.email,
                s.phone.unwrap_or_default(),
                s.country.unwrap_or_default(),
                s.treatment_name.unwrap_or_default(),
                s.message.unwrap_or_default(),
                s.source_page.unwrap_or_default(),
                s.notes.unwrap_or_default(),
            ]
        }),
    );

    tracing::info!(rows = count, user_id = user.user_id, "Submissions exported");
    let filename = format!(
        "submissions-{}.csv",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// GET /api/submissions/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: submission }))
}

/// PUT /api/submissions/{id}
///
/// Staff follow-up: only `status` and `notes` can change.
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubmission>,
) -> AppResult<Json<DataResponse<Submission>>> {
    validate_submission_status(input.status.as_deref())?;
    optional_text("notes", input.notes.as_deref(), MAX_MESSAGE_LEN)?;

    let submission = SubmissionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;

    tracing::info!(id, status = %submission.status, user_id = user.user_id, "Submission updated");
    let summary = format!("Updated submission from {}", submission.name);
    record(&state, Activity::on(&user, "update", CT, id, summary)).await;
    Ok(Json(DataResponse { data: submission }))
}

/// DELETE /api/submissions/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    if !SubmissionRepo::delete(&state.pool, id).await? {
        return Err(content::not_found(CT, id));
    }

    tracing::info!(id, user_id = user.user_id, "Submission deleted");
    let summary = format!("Deleted submission from {}", submission.name);
    record(&state, Activity::on(&user, "delete", CT, id, summary)).await;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/submissions/bulk
///
/// `action` is a submission status (`new`, `contacted`, `in_progress`,
/// `closed`) or `delete`. Submissions have no dependents, so deletes run as
/// one statement.
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    let action: BulkSubmissionAction = input.action.trim().parse()?;
    let ids = validate_ids(&input.ids)?;
    let mut result = BulkResult::new(ids.len());

    match action {
        BulkSubmissionAction::SetStatus(status) => {
            let updated = ContentRepo::set_status(&state.pool, CT, &ids, status.as_str()).await?;
            result.updated = updated.len() as u64;
            result.skip_missing(&ids, &updated);
        }
        BulkSubmissionAction::Delete => {
            let deleted = ContentRepo::delete_many(&state.pool, CT, &ids).await?;
            result.deleted = deleted.len() as u64;
            result.skip_missing(&ids, &deleted);
        }
    }

    tracing::info!(
        action = action.as_str(),
        requested = result.requested,
        updated = result.updated,
        deleted = result.deleted,
        user_id = user.user_id,
        "Bulk submission action applied"
    );
    record(
        &state,
        Activity {
            user: Some(&user),
            action: "bulk",
            entity_type: CT.entity_type(),
            entity_id: None,
            summary: format!("Bulk {} on {} submissions", action.as_str(), result.requested),
            details: Some(json!({
                "action": action.as_str(),
                "ids": ids,
                "updated": result.updated,
                "deleted": result.deleted,
            })),
        },
    )
    .await;
    Ok(Json(DataResponse { data: result }))
}
