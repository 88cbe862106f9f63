//! Repository for the `specialties` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::specialty::{CreateSpecialty, Specialty, UpdateSpecialty};

const COLUMNS: &str = "t.id, t.name, t.slug, t.description, t.icon, t.sort_order, \
    t.status, t.created_at, t.updated_at";

pub struct SpecialtyRepo;

impl SpecialtyRepo {
    /// Insert a new specialty. `input.slug` must already be resolved.
    pub async fn create(pool: &PgPool, input: &CreateSpecialty) -> Result<Specialty, sqlx::Error> {
        let query = format!(
            "INSERT INTO specialties AS t (name, slug, description, icon, sort_order, status) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Specialty>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.sort_order)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Specialty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM specialties t WHERE t.id = $1");
        sqlx::query_as::<_, Specialty>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Specialty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM specialties t WHERE t.slug = $1");
        sqlx::query_as::<_, Specialty>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Page<Specialty>, sqlx::Error> {
        let filter = ListFilter::from_params(params);
        fetch_page(
            pool,
            COLUMNS,
            "specialties t",
            &filter,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update; `None` fields keep their value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpecialty,
    ) -> Result<Option<Specialty>, sqlx::Error> {
        let query = format!(
            "UPDATE specialties t SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                icon = COALESCE($5, icon), \
                sort_order = COALESCE($6, sort_order), \
                status = COALESCE($7, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Specialty>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.sort_order)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
