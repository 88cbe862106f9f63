//! Repository for the `treatments` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::treatment::{CreateTreatment, Treatment, TreatmentFilter, UpdateTreatment};

const COLUMNS: &str = "t.id, t.specialty_id, \
    (SELECT s.name FROM specialties s WHERE s.id = t.specialty_id) AS specialty_name, \
    t.name, t.slug, t.summary, t.content, t.price_from, t.price_to, t.currency, \
    t.duration, t.recovery_time, t.featured_image, t.meta_title, t.meta_description, \
    t.status, t.created_at, t.updated_at";

pub struct TreatmentRepo;

impl TreatmentRepo {
    pub async fn create(pool: &PgPool, input: &CreateTreatment) -> Result<Treatment, sqlx::Error> {
        let query = format!(
            "INSERT INTO treatments AS t \
                (specialty_id, name, slug, summary, content, price_from, price_to, currency, \
                 duration, recovery_time, featured_image, meta_title, meta_description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'USD'), \
                     $9, $10, $11, $12, $13, COALESCE($14, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Treatment>(&query)
            .bind(input.specialty_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(input.price_from)
            .bind(input.price_to)
            .bind(&input.currency)
            .bind(&input.duration)
            .bind(&input.recovery_time)
            .bind(&input.featured_image)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Treatment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM treatments t WHERE t.id = $1");
        sqlx::query_as::<_, Treatment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Treatment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM treatments t WHERE t.slug = $1");
        sqlx::query_as::<_, Treatment>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &TreatmentFilter,
    ) -> Result<Page<Treatment>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_id("t.specialty_id", filter.specialty_id);
        fetch_page(
            pool,
            COLUMNS,
            "treatments t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTreatment,
    ) -> Result<Option<Treatment>, sqlx::Error> {
        let query = format!(
            "UPDATE treatments t SET \
                specialty_id = COALESCE($2, specialty_id), \
                name = COALESCE($3, name), \
                slug = COALESCE($4, slug), \
                summary = COALESCE($5, summary), \
                content = COALESCE($6, content), \
                price_from = COALESCE($7, price_from), \
                price_to = COALESCE($8, price_to), \
                currency = COALESCE($9, currency), \
                duration = COALESCE($10, duration), \
                recovery_time = COALESCE($11, recovery_time), \
                featured_image = COALESCE($12, featured_image), \
                meta_title = COALESCE($13, meta_title), \
                meta_description = COALESCE($14, meta_description), \
                status = COALESCE($15, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Treatment>(&query)
            .bind(id)
            .bind(input.specialty_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(input.price_from)
            .bind(input.price_to)
            .bind(&input.currency)
            .bind(&input.duration)
            .bind(&input.recovery_time)
            .bind(&input.featured_image)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
