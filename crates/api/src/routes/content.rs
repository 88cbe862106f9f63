//! Route definitions for the publishable content types.
//!
//! Every type exposes the same five routes, mounted at `/<key>`:
//!
//! ```text
//! GET    /          -> list
//! POST   /          -> create
//! POST   /bulk      -> bulk
//! GET    /{id}      -> get_by_id
//! PUT    /{id}      -> update
//! DELETE /{id}      -> delete
//! ```

use axum::routing::{get, post};
use axum::Router;
use medtour_core::cpt::ContentType;

use crate::handlers::{
    blog_post, destination, doctor, hospital, specialty, static_page, testimonial, treatment,
    video,
};
use crate::state::AppState;

macro_rules! content_router {
    ($module:ident) => {
        Router::new()
            .route("/", get($module::list).post($module::create))
            .route("/bulk", post($module::bulk))
            .route(
                "/{id}",
                get($module::get_by_id)
                    .put($module::update)
                    .delete($module::delete),
            )
    };
}

/// CRUD routers for every publishable type, keyed by URL segment.
pub fn routers() -> Vec<(&'static str, Router<AppState>)> {
    vec![
        (ContentType::Specialty.key(), content_router!(specialty)),
        (ContentType::Treatment.key(), content_router!(treatment)),
        (ContentType::Destination.key(), content_router!(destination)),
        (ContentType::Hospital.key(), content_router!(hospital)),
        (ContentType::Doctor.key(), content_router!(doctor)),
        (ContentType::BlogPost.key(), content_router!(blog_post)),
        (ContentType::Testimonial.key(), content_router!(testimonial)),
        (ContentType::Video.key(), content_router!(video)),
        (ContentType::StaticPage.key(), content_router!(static_page)),
    ]
}
