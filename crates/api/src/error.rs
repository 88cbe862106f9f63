use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use medtour_core::error::CoreError;
use serde_json::json;

/// PostgreSQL SQLSTATE codes the API maps to client errors.
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_CHECK_VIOLATION: &str = "23514";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `medtour_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A resource addressed by something other than its id was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Too many failed attempts; retry after the given number of seconds.
    #[error("Too many requests, retry after {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Map an error raised by a DELETE statement.
    ///
    /// A foreign-key violation there means another row still references the
    /// target, which is a conflict rather than a bad reference in the request.
    pub fn from_delete(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) {
                return AppError::Core(CoreError::Conflict(
                    "This record is still referenced by other records".into(),
                ));
            }
        }
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut dependencies = None;
        let mut retry_after = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::HasDependents {
                    message,
                    dependents,
                } => {
                    dependencies = Some(json!(dependents));
                    (StatusCode::CONFLICT, "HAS_DEPENDENTS", message.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::TooManyRequests { retry_after_secs } => {
                retry_after = Some(*retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "TOO_MANY_REQUESTS",
                    format!("Too many failed attempts. Try again in {retry_after_secs} seconds."),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(deps) = dependencies {
            body["dependencies"] = deps;
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, secs.into());
        }
        response
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations map to 400 naming the duplicated field.
/// - Foreign-key violations map to 400 (unknown related id).
/// - Check violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(PG_UNIQUE_VIOLATION) => {
                let field = duplicate_field(db_err.constraint(), db_err.table());
                (
                    StatusCode::BAD_REQUEST,
                    "DUPLICATE",
                    format!("A record with this {field} already exists"),
                )
            }
            Some(PG_FOREIGN_KEY_VIOLATION) => {
                let field = reference_field(db_err.constraint(), db_err.table());
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_REFERENCE",
                    format!("The selected {field} does not exist"),
                )
            }
            Some(PG_CHECK_VIOLATION) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!(
                    "Value out of range ({})",
                    db_err.constraint().unwrap_or("check constraint")
                ),
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Column named by a `uq_<table>_<column>` constraint.
fn duplicate_field(constraint: Option<&str>, table: Option<&str>) -> String {
    constraint_column("uq_", constraint, table).unwrap_or_else(|| "value".to_string())
}

/// Referenced entity named by a `fk_<table>_<column>` constraint, without `_id`.
fn reference_field(constraint: Option<&str>, table: Option<&str>) -> String {
    constraint_column("fk_", constraint, table)
        .map(|col| col.trim_end_matches("_id").replace('_', " "))
        .unwrap_or_else(|| "related record".to_string())
}

fn constraint_column(prefix: &str, constraint: Option<&str>, table: Option<&str>) -> Option<String> {
    let rest = constraint?.strip_prefix(prefix)?;
    let column = match table.and_then(|t| rest.strip_prefix(t)) {
        Some(after_table) => after_table.trim_start_matches('_'),
        None => rest.rsplit('_').next().unwrap_or(rest),
    };
    (!column.is_empty()).then(|| column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_strips_table_prefix() {
        assert_eq!(
            duplicate_field(Some("uq_blog_posts_slug"), Some("blog_posts")),
            "slug"
        );
        assert_eq!(duplicate_field(Some("uq_users_email"), Some("users")), "email");
        assert_eq!(duplicate_field(Some("uq_media_filename"), None), "filename");
        assert_eq!(duplicate_field(None, None), "value");
    }

    #[test]
    fn reference_field_names_related_entity() {
        assert_eq!(
            reference_field(Some("fk_treatments_specialty_id"), Some("treatments")),
            "specialty"
        );
        assert_eq!(
            reference_field(Some("fk_hospital_specialties_specialty_id"), Some("hospital_specialties")),
            "specialty"
        );
        assert_eq!(reference_field(Some("weird"), None), "related record");
    }

    #[test]
    fn too_many_requests_sets_retry_after() {
        let response = AppError::TooManyRequests {
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn has_dependents_maps_to_conflict() {
        let response = AppError::Core(CoreError::HasDependents {
            message: "Cannot delete".into(),
            dependents: vec![],
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
