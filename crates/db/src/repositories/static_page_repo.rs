//! Repository for the `static_pages` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::static_page::{CreateStaticPage, StaticPage, UpdateStaticPage};

const COLUMNS: &str = "t.id, t.title, t.slug, t.content, t.template, t.meta_title, \
    t.meta_description, t.status, t.created_at, t.updated_at";

pub struct StaticPageRepo;

impl StaticPageRepo {
    pub async fn create(pool: &PgPool, input: &CreateStaticPage) -> Result<StaticPage, sqlx::Error> {
        let query = format!(
            "INSERT INTO static_pages AS t \
                (title, slug, content, template, meta_title, meta_description, status) \
             VALUES ($1, $2, $3, COALESCE($4, 'default'), $5, $6, COALESCE($7, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaticPage>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.template)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StaticPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM static_pages t WHERE t.id = $1");
        sqlx::query_as::<_, StaticPage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<StaticPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM static_pages t WHERE t.slug = $1");
        sqlx::query_as::<_, StaticPage>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Page<StaticPage>, sqlx::Error> {
        let filter = ListFilter::from_params(params);
        fetch_page(
            pool,
            COLUMNS,
            "static_pages t",
            &filter,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaticPage,
    ) -> Result<Option<StaticPage>, sqlx::Error> {
        let query = format!(
            "UPDATE static_pages t SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                content = COALESCE($4, content), \
                template = COALESCE($5, template), \
                meta_title = COALESCE($6, meta_title), \
                meta_description = COALESCE($7, meta_description), \
                status = COALESCE($8, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaticPage>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.template)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
