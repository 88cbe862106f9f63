//! Repository for the `destinations` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::destination::{
    CreateDestination, Destination, DestinationFilter, UpdateDestination,
};

const COLUMNS: &str = "t.id, t.name, t.slug, t.country, t.city, t.summary, t.content, \
    t.featured_image, t.meta_title, t.meta_description, t.status, t.created_at, t.updated_at";

pub struct DestinationRepo;

impl DestinationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDestination,
    ) -> Result<Destination, sqlx::Error> {
        let query = format!(
            "INSERT INTO destinations AS t \
                (name, slug, country, city, summary, content, featured_image, \
                 meta_title, meta_description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Destination>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Destination>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM destinations t WHERE t.id = $1");
        sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Destination>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM destinations t WHERE t.slug = $1");
        sqlx::query_as::<_, Destination>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &DestinationFilter,
    ) -> Result<Page<Destination>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_text_ci("t.country", filter.country.as_deref());
        fetch_page(
            pool,
            COLUMNS,
            "destinations t",
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
        input: &UpdateDestination,
    ) -> Result<Option<Destination>, sqlx::Error> {
        let query = format!(
            "UPDATE destinations t SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                country = COALESCE($4, country), \
                city = COALESCE($5, city), \
                summary = COALESCE($6, summary), \
                content = COALESCE($7, content), \
                featured_image = COALESCE($8, featured_image), \
                meta_title = COALESCE($9, meta_title), \
                meta_description = COALESCE($10, meta_description), \
                status = COALESCE($11, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Destination>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
