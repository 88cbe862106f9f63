//! Repository for the `media` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::media::{CreateMedia, Media, MediaFilter, UpdateMedia};

const COLUMNS: &str = "t.id, t.filename, t.original_name, t.mime_type, t.size_bytes, \
    t.width, t.height, t.alt_text, t.url, t.uploaded_by, t.created_at, t.updated_at";

pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media AS t \
                (filename, original_name, mime_type, size_bytes, width, height, \
                 alt_text, url, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&input.filename)
            .bind(&input.original_name)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.alt_text)
            .bind(&input.url)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media t WHERE t.id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List media; `kind=image` keeps `image/*` types, `kind=document` the rest.
    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &MediaFilter,
    ) -> Result<Page<Media>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        match filter.kind.as_deref() {
            Some("image") => where_.condition("t.mime_type LIKE 'image/%'"),
            Some("document") => where_.condition("t.mime_type NOT LIKE 'image/%'"),
            _ => {}
        }
        fetch_page(
            pool,
            COLUMNS,
            "media t",
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
        input: &UpdateMedia,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media t SET alt_text = COALESCE($2, alt_text) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(&input.alt_text)
            .fetch_optional(pool)
            .await
    }

    /// Delete the row and return it so the caller can remove the stored file.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("DELETE FROM media t WHERE t.id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM media")
            .fetch_one(pool)
            .await
    }
}
