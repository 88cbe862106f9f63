//! Handlers for the `/activity` resource and the shared activity recorder.

use axum::extract::{Query, State};
use axum::Json;
use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use medtour_db::listing::Page;
use medtour_db::models::activity::{ActivityEntry, ActivityQuery, CreateActivity};
use medtour_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/activity
pub async fn list(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Page<ActivityEntry>>>> {
    let page = ActivityRepo::query(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// One activity-log row to write after a successful mutation.
pub struct Activity<'a> {
    pub user: Option<&'a AuthUser>,
    pub action: &'a str,
    pub entity_type: &'a str,
    pub entity_id: Option<DbId>,
    pub summary: String,
    pub details: Option<serde_json::Value>,
}

impl<'a> Activity<'a> {
    /// Activity on a row of a registered content type.
    pub fn on(user: &'a AuthUser, action: &'a str, ct: ContentType, id: DbId, summary: String) -> Self {
        Self {
            user: Some(user),
            action,
            entity_type: ct.entity_type(),
            entity_id: Some(id),
            summary,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Write an activity row.
///
/// The mutation it describes has already committed, so a failed write is
/// logged and swallowed rather than turned into an error response.
pub async fn record(state: &AppState, activity: Activity<'_>) {
    let entry = CreateActivity {
        user_id: activity.user.map(|u| u.user_id),
        action: activity.action.to_string(),
        entity_type: activity.entity_type.to_string(),
        entity_id: activity.entity_id,
        summary: activity.summary,
        details: activity.details,
    };
    if let Err(e) = ActivityRepo::insert(&state.pool, &entry).await {
        tracing::warn!(
            error = %e,
            action = %entry.action,
            entity = %entry.entity_type,
            "Failed to write activity log entry"
        );
    }
}
