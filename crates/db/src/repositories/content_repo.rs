//! Table-generic operations used by bulk actions and the dashboard.
//!
//! Table names come only from the static [`ContentType`] registry, never
//! from request input.

use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use sqlx::PgPool;

pub struct ContentRepo;

impl ContentRepo {
    /// Set `status` on every existing row in `ids`, returning the ids updated.
    ///
    /// Publishing blog posts stamps a missing `published_at`.
    pub async fn set_status(
        pool: &PgPool,
        ct: ContentType,
        ids: &[DbId],
        status: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let stamp = if ct == ContentType::BlogPost {
            ", published_at = CASE WHEN $1 = 'published' AND published_at IS NULL \
               THEN NOW() ELSE published_at END"
        } else {
            ""
        };
        let query = format!(
            "UPDATE {} SET status = $1{stamp} WHERE id = ANY($2) RETURNING id",
            ct.table()
        );
        sqlx::query_scalar(&query)
            .bind(status)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Ids from `ids` that exist in the type's table.
    pub async fn existing_ids(
        pool: &PgPool,
        ct: ContentType,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT id FROM {} WHERE id = ANY($1)", ct.table());
        sqlx::query_scalar(&query).bind(ids).fetch_all(pool).await
    }

    /// Display title of a row, used in activity summaries.
    pub async fn title_of(
        pool: &PgPool,
        ct: ContentType,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let query = format!(
            "SELECT {}::TEXT FROM {} WHERE id = $1",
            ct.title_column(),
            ct.table()
        );
        sqlx::query_scalar(&query).bind(id).fetch_optional(pool).await
    }

    /// Hard-delete one row. Returns `true` if it existed.
    pub async fn delete(pool: &PgPool, ct: ContentType, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", ct.table());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete several rows, returning the ids removed.
    pub async fn delete_many(
        pool: &PgPool,
        ct: ContentType,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = ANY($1) RETURNING id", ct.table());
        sqlx::query_scalar(&query).bind(ids).fetch_all(pool).await
    }
}
