//! Repository for the `submissions` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, bind_values, ListFilter, ListParams, Page};
use crate::models::submission::{
    CreateSubmission, Submission, SubmissionFilter, UpdateSubmission,
};

const COLUMNS: &str = "t.id, t.form_type, t.name, t.email, t.phone, t.country, \
    t.treatment_id, (SELECT tr.name FROM treatments tr WHERE tr.id = t.treatment_id) AS treatment_name, \
    t.message, t.source_page, t.status, t.notes, t.ip_address, t.created_at, t.updated_at";

/// Upper bound on rows in one CSV export.
pub const MAX_EXPORT_ROWS: i64 = 10_000;

pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Record a public enquiry. New submissions always start as `new`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
        ip_address: Option<&str>,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions AS t \
                (form_type, name, email, phone, country, treatment_id, message, \
                 source_page, status, ip_address) \
             VALUES (COALESCE($1, 'contact'), $2, $3, $4, $5, $6, $7, $8, 'new', $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(&input.form_type)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.country)
            .bind(input.treatment_id)
            .bind(&input.message)
            .bind(&input.source_page)
            .bind(ip_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions t WHERE t.id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &SubmissionFilter,
    ) -> Result<Page<Submission>, sqlx::Error> {
        let where_ = build_filter(params, filter);
        fetch_page(
            pool,
            COLUMNS,
            "submissions t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// All rows matching the listing filters, for CSV export.
    pub async fn export(
        pool: &PgPool,
        params: &ListParams,
        filter: &SubmissionFilter,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let where_ = build_filter(params, filter);
        let query = format!(
            "SELECT {COLUMNS} FROM submissions t {} ORDER BY {} LIMIT {MAX_EXPORT_ROWS}",
            where_.where_clause(),
            params.order_by(),
        );
        bind_values(sqlx::query_as::<_, Submission>(&query), where_.binds())
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions t SET \
                status = COALESCE($2, status), \
                notes = COALESCE($3, notes) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of submissions still in the `new` state.
    pub async fn count_new(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM submissions WHERE status = 'new'")
            .fetch_one(pool)
            .await
    }
}

fn build_filter(params: &ListParams, filter: &SubmissionFilter) -> ListFilter {
    let mut where_ = ListFilter::from_params(params);
    where_.eq_text("t.form_type", filter.form_type.as_deref());
    where_.eq_id("t.treatment_id", filter.treatment_id);
    where_.since("t.created_at", filter.from);
    where_.until("t.created_at", filter.to);
    where_
}
