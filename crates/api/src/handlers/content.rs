//! Operations shared by every content type: guarded delete, bulk actions,
//! slug handling and common field checks.

use axum::Json;
use medtour_core::bulk::{validate_ids, BulkAction, BulkResult};
use medtour_core::cpt::ContentType;
use medtour_core::dependencies::check_deletion;
use medtour_core::error::CoreError;
use medtour_core::slug::{resolve_slug, validate_slug};
use medtour_core::status::validate_content_status;
use medtour_core::types::DbId;
use medtour_core::validation::{optional_text, MAX_META_DESCRIPTION_LEN, MAX_NAME_LEN};
use medtour_db::repositories::{ContentRepo, DependencyRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::activity::{record, Activity};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /api/<cpt>/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub ids: Vec<DbId>,
    pub action: String,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Fill in the slug of a new row, generating it from `fallback` when absent.
pub fn resolve_create_slug(slug: &mut Option<String>, fallback: &str) -> Result<(), CoreError> {
    *slug = Some(resolve_slug(slug.as_deref(), fallback)?);
    Ok(())
}

/// Validate a slug sent with an update. A blank slug leaves the stored one as is.
pub fn normalize_update_slug(slug: &mut Option<String>) -> Result<(), CoreError> {
    match slug.as_deref().map(str::trim) {
        None => {}
        Some("") => *slug = None,
        Some(s) => {
            validate_slug(s)?;
            *slug = Some(s.to_string());
        }
    }
    Ok(())
}

/// Checks shared by every publishable type: status value and SEO field lengths.
pub fn validate_common(
    status: Option<&str>,
    meta_title: Option<&str>,
    meta_description: Option<&str>,
) -> Result<(), CoreError> {
    validate_content_status(status)?;
    optional_text("meta_title", meta_title, MAX_NAME_LEN)?;
    optional_text("meta_description", meta_description, MAX_META_DESCRIPTION_LEN)?;
    Ok(())
}

/// Trim a list of free-form labels (tags, languages, accreditations) and drop
/// blank entries.
pub fn clean_labels(labels: &mut Option<Vec<String>>) {
    if let Some(list) = labels.as_mut() {
        *list = list
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }
}

/// On create, an optional link of `0` means "no link".
pub fn create_link(link: &mut Option<DbId>) {
    if *link == Some(0) {
        *link = None;
    }
}

/// Reject negative link ids. `0` is allowed and clears the link on update.
pub fn validate_link(field: &str, link: Option<DbId>) -> Result<(), CoreError> {
    match link {
        Some(id) if id < 0 => Err(CoreError::Validation(format!("{field} must not be negative"))),
        _ => Ok(()),
    }
}

pub fn not_found(ct: ContentType, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ct.label(),
        id,
    })
}

/// Log and record a create or update.
pub async fn record_write(
    state: &AppState,
    user: &AuthUser,
    action: &str,
    ct: ContentType,
    id: DbId,
    title: &str,
) {
    tracing::info!(entity = ct.entity_type(), id, user_id = user.user_id, action, "Content saved");
    let verb = if action == "create" { "Created" } else { "Updated" };
    let summary = format!("{verb} {} '{title}'", ct.label().to_lowercase());
    record(state, Activity::on(user, action, ct, id, summary)).await;
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Why `id` cannot be deleted, or `None` when nothing references it.
async fn blocking_dependents(state: &AppState, ct: ContentType, id: DbId) -> AppResult<Option<CoreError>> {
    if ct.dependents().is_empty() {
        return Ok(None);
    }
    let groups = DependencyRepo::scan(&state.pool, ct, id).await?;
    Ok(check_deletion(&ct.label().to_lowercase(), groups)
        .into_result()
        .err())
}

/// Hard-delete one row after confirming nothing references it.
///
/// Returns 404 when the row does not exist and 409 with the dependency list
/// when other rows still point at it.
pub async fn delete_row(state: &AppState, user: &AuthUser, ct: ContentType, id: DbId) -> AppResult<()> {
    let title = ContentRepo::title_of(&state.pool, ct, id)
        .await?
        .ok_or_else(|| not_found(ct, id))?;

    if let Some(err) = blocking_dependents(state, ct, id).await? {
        tracing::info!(entity = ct.entity_type(), id, "Delete blocked by dependents");
        return Err(AppError::Core(err));
    }

    let deleted = ContentRepo::delete(&state.pool, ct, id)
        .await
        .map_err(AppError::from_delete)?;
    if !deleted {
        return Err(not_found(ct, id));
    }

    tracing::info!(entity = ct.entity_type(), id, user_id = user.user_id, "Content deleted");
    let summary = format!("Deleted {} '{title}'", ct.label().to_lowercase());
    record(state, Activity::on(user, "delete", ct, id, summary)).await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// Apply a bulk status change or delete to a publishable type.
///
/// Status changes run as one statement over the existing ids. Deletes are
/// attempted per row; rows still referenced elsewhere are reported in
/// `skipped` and do not fail the batch.
pub async fn bulk(
    state: &AppState,
    user: &AuthUser,
    ct: ContentType,
    input: BulkRequest,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    let action: BulkAction = input.action.trim().parse()?;
    let ids = validate_ids(&input.ids)?;
    let mut result = BulkResult::new(ids.len());

    match action.target_status() {
        Some(status) => {
            let updated = ContentRepo::set_status(&state.pool, ct, &ids, status.as_str()).await?;
            result.updated = updated.len() as u64;
            result.skip_missing(&ids, &updated);
        }
        None => {
            let existing = ContentRepo::existing_ids(&state.pool, ct, &ids).await?;
            result.skip_missing(&ids, &existing);
            for id in ids.iter().copied().filter(|id| existing.contains(id)) {
                if let Some(err) = blocking_dependents(state, ct, id).await? {
                    result.skip(id, err.to_string());
                    continue;
                }
                match ContentRepo::delete(&state.pool, ct, id).await {
                    Ok(true) => result.deleted += 1,
                    Ok(false) => result.skip(id, "Not found"),
                    Err(e) => match AppError::from_delete(e) {
                        AppError::Core(err) => result.skip(id, err.to_string()),
                        other => return Err(other),
                    },
                }
            }
        }
    }

    tracing::info!(
        entity = ct.entity_type(),
        action = action.as_str(),
        requested = result.requested,
        updated = result.updated,
        deleted = result.deleted,
        skipped = result.skipped.len(),
        user_id = user.user_id,
        "Bulk action applied"
    );
    record(
        state,
        Activity {
            user: Some(user),
            action: "bulk",
            entity_type: ct.entity_type(),
            entity_id: None,
            summary: format!(
                "Bulk {} on {} {}",
                action.as_str(),
                result.requested,
                ct.label_plural().to_lowercase()
            ),
            details: Some(json!({
                "action": action.as_str(),
                "ids": ids,
                "updated": result.updated,
                "deleted": result.deleted,
                "skipped": result.skipped,
            })),
        },
    )
    .await;

    Ok(Json(DataResponse { data: result }))
}
