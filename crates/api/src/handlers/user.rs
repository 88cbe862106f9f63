//! Handlers for console user management (`/users`, super admin only).
//!
//! Guards: nobody can delete or deactivate their own account, and the last
//! active super admin can never be deleted, demoted or deactivated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::cpt::ContentType;
use medtour_core::error::CoreError;
use medtour_core::roles::Role;
use medtour_core::types::DbId;
use medtour_core::validation::{require_text, require_text_if_present, validate_email, MAX_NAME_LEN};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::user::{CreateUser, CreateUserRequest, UpdateUser, User, UserFilter};
use medtour_db::repositories::UserRepo;
use serde_json::json;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::activity::{record, Activity};
use crate::handlers::content;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::User;

fn parse_role(role: &str) -> Result<Role, CoreError> {
    role.trim().parse::<Role>()
}

fn hash(password: &str) -> AppResult<String> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

fn conflict(msg: &str) -> AppError {
    AppError::Core(CoreError::Conflict(msg.into()))
}

/// Refuse a change that would leave no active super admin.
async fn ensure_other_super_admin(state: &AppState, id: DbId) -> AppResult<()> {
    if UserRepo::count_active_super_admins(&state.pool, id).await? == 0 {
        return Err(conflict("Cannot remove the last active super admin"));
    }
    Ok(())
}

/// POST /api/users
pub async fn create(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    require_text("email", &input.email, MAX_NAME_LEN)?;
    validate_email(&input.email)?;
    require_text("name", &input.name, MAX_NAME_LEN)?;
    let role = parse_role(&input.role)?;
    let password_hash = hash(&input.password)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_string(),
            name: input.name.trim().to_string(),
            password_hash,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(id = user.id, role = %user.role, user_id = admin.user_id, "User created");
    let summary = format!("Created user {} ({})", user.email, user.role);
    record(&state, Activity::on(&admin, "create", CT, user.id, summary)).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/users
///
/// Listing parameters plus `role` and `is_active`.
pub async fn list(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<DataResponse<Page<User>>>> {
    if let Some(role) = filter.role.as_deref() {
        parse_role(role)?;
    }
    let params = ListParams::resolve(CT, &query)?;
    let page = UserRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/users/{id}
///
/// Partial update of email, name, role, activation and password.
pub async fn update(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<User>>> {
    if let Some(email) = &input.email {
        require_text("email", email, MAX_NAME_LEN)?;
        validate_email(email)?;
    }
    require_text_if_present("name", input.name.as_deref(), MAX_NAME_LEN)?;
    let new_role = input.role.as_deref().map(parse_role).transpose()?;
    input.role = new_role.map(|r| r.as_str().to_string());
    let password_hash = input.password.as_deref().map(hash).transpose()?;

    let existing = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;

    let deactivating = input.is_active == Some(false) && existing.is_active;
    if deactivating && id == admin.user_id {
        return Err(conflict("You cannot deactivate your own account"));
    }
    let losing_super_admin = existing.is_active
        && existing.role == Role::SuperAdmin.as_str()
        && (deactivating || new_role.is_some_and(|r| r != Role::SuperAdmin));
    if losing_super_admin {
        ensure_other_super_admin(&state, id).await?;
    }

    let user = UserRepo::update(&state.pool, id, &input, password_hash.as_deref())
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;

    tracing::info!(id, user_id = admin.user_id, "User updated");
    let summary = format!("Updated user {}", user.email);
    record(
        &state,
        Activity::on(&admin, "update", CT, id, summary).with_details(json!({
            "role": input.role,
            "is_active": input.is_active,
            "password_changed": password_hash.is_some(),
        })),
    )
    .await;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/users/{id}
pub async fn delete(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(conflict("You cannot delete your own account"));
    }
    let existing = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    if existing.is_active && existing.role == Role::SuperAdmin.as_str() {
        ensure_other_super_admin(&state, id).await?;
    }

    let deleted = UserRepo::delete(&state.pool, id)
        .await
        .map_err(AppError::from_delete)?;
    if !deleted {
        return Err(content::not_found(CT, id));
    }

    tracing::info!(id, user_id = admin.user_id, "User deleted");
    let summary = format!("Deleted user {}", existing.email);
    record(&state, Activity::on(&admin, "delete", CT, id, summary)).await;
    Ok(StatusCode::NO_CONTENT)
}
