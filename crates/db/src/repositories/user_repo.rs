//! Repository for the `users` table.
//!
//! Emails are stored lower-cased; lookups compare lower-cased input.

use medtour_core::roles::ROLE_SUPER_ADMIN;
use medtour_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};

const COLUMNS: &str = "t.id, t.email, t.name, t.password_hash, t.role, t.is_active, \
    t.last_login_at, t.failed_login_count, t.locked_until, t.created_at, t.updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users AS t (email, name, password_hash, role) \
             VALUES (LOWER(TRIM($1)), $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users t WHERE t.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users t WHERE t.email = LOWER(TRIM($1))");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &UserFilter,
    ) -> Result<Page<User>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_text("t.role", filter.role.as_deref());
        if let Some(active) = filter.is_active {
            where_.condition(if active { "t.is_active" } else { "NOT t.is_active" });
        }
        fetch_page(
            pool,
            COLUMNS,
            "users t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update of profile, role, activation and, when given, the
    /// password hash. One statement, so a password change never lands
    /// without the rest of the edit.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users t SET \
                email = COALESCE(LOWER(TRIM($2)), email), \
                name = COALESCE($3, name), \
                role = COALESCE($4, role), \
                is_active = COALESCE($5, is_active), \
                password_hash = COALESCE($6, password_hash) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.role)
            .bind(input.is_active)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login: stamp `last_login_at` and clear the
    /// failure counter and any lock.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET \
                last_login_at = NOW(), \
                failed_login_count = 0, \
                locked_until = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Count a failed password for the account and lock it for `lock_secs`
    /// once `max_attempts` consecutive failures are reached. An expired lock
    /// starts a fresh count. Returns the resulting `locked_until`.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_secs: f64,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET \
                failed_login_count = CASE \
                    WHEN locked_until <= NOW() THEN 1 \
                    ELSE failed_login_count + 1 END, \
                locked_until = CASE \
                    WHEN (CASE WHEN locked_until <= NOW() THEN 1 \
                               ELSE failed_login_count + 1 END) >= $2 \
                        THEN NOW() + make_interval(secs => $3) \
                    WHEN locked_until <= NOW() THEN NULL \
                    ELSE locked_until END \
             WHERE id = $1 \
             RETURNING locked_until",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_secs)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active super admins other than `excluding` (pass `0` to count all).
    pub async fn count_active_super_admins(
        pool: &PgPool,
        excluding: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM users \
             WHERE role = $1 AND is_active AND id <> $2",
        )
        .bind(ROLE_SUPER_ADMIN)
        .bind(excluding)
        .fetch_one(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users")
            .fetch_one(pool)
            .await
    }
}
