//! Handlers for the `/auth` resource (login, logout, current user, password).

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use chrono::Utc;
use medtour_core::error::CoreError;
use medtour_core::types::Timestamp;
use medtour_db::models::user::User;
use medtour_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::cookie::{auth_cookie, clear_auth_cookie};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::activity::{record, Activity};
use crate::middleware::auth::{AuthUser, ClientIp};
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. On success the session token is set
/// as an HttpOnly cookie and the user is returned.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(input): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<DataResponse<User>>)> {
    // 1. Refuse early while this address is throttled.
    if let Some(ip) = ip {
        state
            .login_throttle
            .check(ip)
            .map_err(|retry_after_secs| AppError::TooManyRequests { retry_after_secs })?;
    }

    let failed = || {
        if let Some(ip) = ip {
            state.login_throttle.record_failure(ip);
        }
        tracing::info!(ip = ?ip, "Failed login attempt");
        AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
    };

    // 2. Find the user; a locked account is refused before any password check.
    let email = input.email.trim().to_lowercase();
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        return Err(failed());
    };
    if let Some(retry_after_secs) = lock_remaining_secs(user.locked_until) {
        return Err(AppError::TooManyRequests { retry_after_secs });
    }

    // 3. Verify the password, counting failures against the account too.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        let locked_until = UserRepo::record_failed_login(
            &state.pool,
            user.id,
            i32::try_from(state.config.login_max_attempts).unwrap_or(i32::MAX),
            state.config.login_window_secs as f64,
        )
        .await?;
        if lock_remaining_secs(locked_until).is_some() {
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }
        return Err(failed());
    }

    // 4. Correct credentials on a deactivated account.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 5. Success: reset both counters, stamp the login, issue the cookie.
    if let Some(ip) = ip {
        state.login_throttle.clear(ip);
    }
    UserRepo::record_login(&state.pool, user.id).await?;

    let token = generate_access_token(user.id, &user.role, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = auth_cookie(
        &token,
        state.config.jwt.expiry_secs(),
        state.config.cookie_secure,
    );

    let auth_user = AuthUser {
        user_id: user.id,
        role: user
            .role
            .parse()
            .map_err(|_| AppError::InternalError(format!("Unknown role '{}'", user.role)))?,
        email: user.email.clone(),
        name: user.name.clone(),
    };
    tracing::info!(user_id = user.id, "User logged in");
    record(
        &state,
        Activity {
            user: Some(&auth_user),
            action: "login",
            entity_type: "user",
            entity_id: Some(user.id),
            summary: format!("{} signed in", user.email),
            details: None,
        },
    )
    .await;

    Ok((set_cookie(&cookie)?, Json(DataResponse { data: user })))
}

/// POST /api/auth/logout
///
/// Expire the session cookie. Returns 204 No Content. Works without a valid
/// session so a stale cookie can always be cleared.
pub async fn logout(State(state): State<AppState>) -> AppResult<(StatusCode, HeaderMap)> {
    let headers = set_cookie(&clear_auth_cookie(state.config.cookie_secure))?;
    Ok((StatusCode::NO_CONTENT, headers))
}

/// GET /api/auth/me
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/auth/password
///
/// Change the signed-in user's password after re-checking the current one.
pub async fn change_password(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    record(
        &state,
        Activity {
            user: Some(&auth_user),
            action: "password_change",
            entity_type: "user",
            entity_id: Some(user.id),
            summary: format!("{} changed their password", user.email),
            details: None,
        },
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whole seconds left on an account lock, `None` once it has passed.
fn lock_remaining_secs(locked_until: Option<Timestamp>) -> Option<u64> {
    let remaining = (locked_until? - Utc::now()).num_seconds();
    u64::try_from(remaining).ok().filter(|secs| *secs > 0)
}

fn set_cookie(cookie: &str) -> AppResult<HeaderMap> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::InternalError(format!("Invalid cookie header: {e}")))?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}
