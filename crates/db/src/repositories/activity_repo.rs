//! Repository for the `activity_log` table.

use sqlx::PgPool;

use medtour_core::listing::{clamp_limit, clamp_offset};

use crate::listing::{fetch_page, ListFilter, Page};
use crate::models::activity::{ActivityEntry, ActivityQuery, CreateActivity};

const COLUMNS: &str = "t.id, t.user_id, \
    (SELECT u.name FROM users u WHERE u.id = t.user_id) AS user_name, \
    t.action, t.entity_type, t.entity_id, t.summary, t.details, t.created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn insert(pool: &PgPool, entry: &CreateActivity) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log AS t \
                (user_id, action, entity_type, entity_id, summary, details) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.summary)
            .bind(&entry.details)
            .fetch_one(pool)
            .await
    }

    /// Filtered, newest-first page of entries.
    pub async fn query(
        pool: &PgPool,
        params: &ActivityQuery,
    ) -> Result<Page<ActivityEntry>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter.eq_id("t.user_id", params.user_id);
        filter.eq_text("t.entity_type", params.entity_type.as_deref());
        filter.eq_text("t.action", params.action.as_deref());
        filter.eq_id("t.entity_id", params.entity_id);
        fetch_page(
            pool,
            COLUMNS,
            "activity_log t",
            &filter,
            "t.created_at DESC, t.id DESC",
            clamp_limit(params.limit),
            clamp_offset(params.offset),
        )
        .await
    }

    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log t ORDER BY t.created_at DESC, t.id DESC LIMIT $1"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
