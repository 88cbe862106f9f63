//! Repository for the `blog_posts` table.
//!
//! Publishing a post without a `published_at` stamps it with the current
//! time, both here and in the bulk status path of `ContentRepo`.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, BindValue, ListFilter, ListParams, Page};
use crate::models::blog_post::{BlogPost, BlogPostFilter, CreateBlogPost, UpdateBlogPost};

const COLUMNS: &str = "t.id, t.title, t.slug, t.excerpt, t.content, t.featured_image, \
    t.category, t.tags, t.author_id, \
    (SELECT u.name FROM users u WHERE u.id = t.author_id) AS author_name, \
    t.specialty_id, (SELECT s.name FROM specialties s WHERE s.id = t.specialty_id) AS specialty_name, \
    t.published_at, t.meta_title, t.meta_description, t.status, t.created_at, t.updated_at";

pub struct BlogPostRepo;

impl BlogPostRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateBlogPost,
        author_id: Option<DbId>,
    ) -> Result<BlogPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_posts AS t \
                (title, slug, excerpt, content, featured_image, category, tags, author_id, \
                 specialty_id, published_at, meta_title, meta_description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{{}}'::TEXT[]), $8, $9, \
                     CASE WHEN $10::TIMESTAMPTZ IS NULL AND COALESCE($13, 'draft') = 'published' \
                          THEN NOW() ELSE $10::TIMESTAMPTZ END, \
                     $11, $12, COALESCE($13, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(author_id)
            .bind(input.specialty_id)
            .bind(input.published_at)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_posts t WHERE t.id = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_posts t WHERE t.slug = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &BlogPostFilter,
    ) -> Result<Page<BlogPost>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_text_ci("t.category", filter.category.as_deref());
        where_.eq_id("t.specialty_id", filter.specialty_id);
        if let Some(tag) = filter.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            where_.push("{} = ANY(t.tags)", BindValue::Text(tag.to_string()));
        }
        fetch_page(
            pool,
            COLUMNS,
            "blog_posts t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update. `specialty_id: 0` clears the link.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts t SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                excerpt = COALESCE($4, excerpt), \
                content = COALESCE($5, content), \
                featured_image = COALESCE($6, featured_image), \
                category = COALESCE($7, category), \
                tags = COALESCE($8, tags), \
                specialty_id = NULLIF(COALESCE($9, specialty_id), 0), \
                published_at = CASE \
                    WHEN COALESCE($10, published_at) IS NULL \
                         AND COALESCE($13, status) = 'published' THEN NOW() \
                    ELSE COALESCE($10, published_at) END, \
                meta_title = COALESCE($11, meta_title), \
                meta_description = COALESCE($12, meta_description), \
                status = COALESCE($13, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.featured_image)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.specialty_id)
            .bind(input.published_at)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
