//! Repository for the `videos` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, ListFilter, ListParams, Page};
use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoFilter};

const COLUMNS: &str = "t.id, t.title, t.slug, t.url, t.thumbnail, t.description, \
    t.treatment_id, t.specialty_id, t.hospital_id, t.duration_secs, \
    t.status, t.created_at, t.updated_at";

pub struct VideoRepo;

impl VideoRepo {
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos AS t \
                (title, slug, url, thumbnail, description, treatment_id, specialty_id, \
                 hospital_id, duration_secs, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.url)
            .bind(&input.thumbnail)
            .bind(&input.description)
            .bind(input.treatment_id)
            .bind(input.specialty_id)
            .bind(input.hospital_id)
            .bind(input.duration_secs)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos t WHERE t.id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos t WHERE t.slug = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &VideoFilter,
    ) -> Result<Page<Video>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_id("t.treatment_id", filter.treatment_id);
        where_.eq_id("t.specialty_id", filter.specialty_id);
        where_.eq_id("t.hospital_id", filter.hospital_id);
        fetch_page(
            pool,
            COLUMNS,
            "videos t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update. Link ids of `0` clear the link.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos t SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                url = COALESCE($4, url), \
                thumbnail = COALESCE($5, thumbnail), \
                description = COALESCE($6, description), \
                treatment_id = NULLIF(COALESCE($7, treatment_id), 0), \
                specialty_id = NULLIF(COALESCE($8, specialty_id), 0), \
                hospital_id = NULLIF(COALESCE($9, hospital_id), 0), \
                duration_secs = COALESCE($10, duration_secs), \
                status = COALESCE($11, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.url)
            .bind(&input.thumbnail)
            .bind(&input.description)
            .bind(input.treatment_id)
            .bind(input.specialty_id)
            .bind(input.hospital_id)
            .bind(input.duration_secs)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
