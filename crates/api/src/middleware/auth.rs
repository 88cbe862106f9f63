//! JWT-based authentication extractors for Axum handlers.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use medtour_core::error::CoreError;
use medtour_core::roles::Role;
use medtour_core::types::DbId;
use medtour_db::repositories::UserRepo;

use crate::auth::cookie::{read_cookie, AUTH_COOKIE};
use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated console user.
///
/// The token is read from the `token` cookie, falling back to an
/// `Authorization: Bearer` header. The user row is re-loaded on every
/// request, so deactivation and role changes apply immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    /// Resolve the request's user, or `None` when no valid session exists.
    ///
    /// Only database failures are errors.
    pub async fn resolve(headers: &HeaderMap, state: &AppState) -> AppResult<Option<AuthUser>> {
        let Some(token) = request_token(headers) else {
            return Ok(None);
        };
        let Ok(claims) = validate_token(&token, &state.config.jwt) else {
            return Ok(None);
        };
        let Some(user) = UserRepo::find_by_id(&state.pool, claims.sub).await? else {
            return Ok(None);
        };
        if !user.is_active {
            return Ok(None);
        }
        let Ok(role) = user.role.parse::<Role>() else {
            tracing::warn!(user_id = user.id, role = %user.role, "User has an unknown role");
            return Ok(None);
        };
        Ok(Some(AuthUser {
            user_id: user.id,
            role,
            email: user.email,
            name: user.name,
        }))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if request_token(&parts.headers).is_none() {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Authentication required".into(),
            )));
        }
        AuthUser::resolve(&parts.headers, state).await?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired session".into(),
            ))
        })
    }
}

/// Token from the session cookie, else from a Bearer header.
fn request_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, AUTH_COOKIE).or_else(|| {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Client address for the login throttle and submission records.
///
/// The socket peer address by default. With `TRUST_PROXY` on, the first
/// `X-Forwarded-For` entry wins, since the proxy in front sets it. `None`
/// when neither is available.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        if !state.config.trust_proxy {
            return Ok(ClientIp(peer));
        }
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        Ok(ClientIp(forwarded.or(peer)))
    }
}
