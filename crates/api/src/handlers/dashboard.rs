//! Handler for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;
use medtour_db::models::dashboard::Dashboard;
use medtour_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/dashboard
///
/// Content counts per status, new submissions, media total and the most
/// recent activity.
pub async fn get(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let dashboard = DashboardRepo::load(&state.pool).await?;
    Ok(Json(DataResponse { data: dashboard }))
}
