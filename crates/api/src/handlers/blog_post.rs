//! Handlers for the `/blog-posts` resource.
//!
//! The author of a new post is the signed-in user. `published_at` is stamped
//! by the repository the first time a post becomes published.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use medtour_core::bulk::BulkResult;
use medtour_core::cpt::ContentType;
use medtour_core::types::DbId;
use medtour_core::validation::{
    optional_text, optional_url, require_text, require_text_if_present, MAX_NAME_LEN,
};
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::blog_post::{BlogPost, BlogPostFilter, CreateBlogPost, UpdateBlogPost};
use medtour_db::repositories::BlogPostRepo;

use crate::error::AppResult;
use crate::handlers::content::{self, BulkRequest};
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::BlogPost;

const MAX_EXCERPT_LEN: usize = 1000;

/// POST /api/blog-posts
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(mut input): Json<CreateBlogPost>,
) -> AppResult<(StatusCode, Json<DataResponse<BlogPost>>)> {
    require_text("title", &input.title, MAX_NAME_LEN)?;
    optional_text("excerpt", input.excerpt.as_deref(), MAX_EXCERPT_LEN)?;
    optional_text("category", input.category.as_deref(), MAX_NAME_LEN)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::validate_link("specialty_id", input.specialty_id)?;
    content::create_link(&mut input.specialty_id);
    content::clean_labels(&mut input.tags);
    content::resolve_create_slug(&mut input.slug, &input.title)?;

    let post = BlogPostRepo::create(&state.pool, &input, Some(user.user_id)).await?;
    content::record_write(&state, &user, "create", CT, post.id, &post.title).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/blog-posts
///
/// Accepts the common listing parameters plus `category`, `specialty_id` and `tag`.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<BlogPostFilter>,
) -> AppResult<Json<DataResponse<Page<BlogPost>>>> {
    let params = ListParams::resolve(CT, &query)?;
    let page = BlogPostRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/blog-posts/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    let post = BlogPostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: post }))
}

/// PUT /api/blog-posts/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateBlogPost>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    require_text_if_present("title", input.title.as_deref(), MAX_NAME_LEN)?;
    optional_text("excerpt", input.excerpt.as_deref(), MAX_EXCERPT_LEN)?;
    optional_text("category", input.category.as_deref(), MAX_NAME_LEN)?;
    optional_url("featured_image", input.featured_image.as_deref())?;
    content::validate_common(
        input.status.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
    )?;
    content::validate_link("specialty_id", input.specialty_id)?;
    content::clean_labels(&mut input.tags);
    content::normalize_update_slug(&mut input.slug)?;

    let post = BlogPostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    content::record_write(&state, &user, "update", CT, id, &post.title).await;
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/blog-posts/{id}
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    content::delete_row(&state, &user, CT, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/blog-posts/bulk
pub async fn bulk(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<BulkRequest>,
) -> AppResult<Json<DataResponse<BulkResult>>> {
    content::bulk(&state, &user, CT, input).await
}
