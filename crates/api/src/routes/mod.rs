pub mod auth;
pub mod console;
pub mod content;
pub mod health;
pub mod media;
pub mod pages;
pub mod public;
pub mod submission;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/logout                                 logout
/// /auth/me                                     current user
/// /auth/password                               change password
///
/// /specialties, /treatments, /destinations,
/// /hospitals, /doctors, /blog-posts,
/// /testimonials, /videos, /pages               list, create
///     /bulk                                    bulk status change / delete
///     /{id}                                    get, update, delete
///
/// /submissions                                 list
/// /submissions/export                          CSV export
/// /submissions/bulk                            bulk status change / delete
/// /submissions/{id}                            get, update, delete
///
/// /media                                       list, upload
/// /media/editor-upload                         inline editor image upload
/// /media/{id}                                  get, update alt text, delete
/// /import/document                             document to HTML
///
/// /users                                       list, create (super admin)
/// /users/{id}                                  get, update, delete (super admin)
///
/// /cpt                                         content type registry
/// /cpt/{key}                                   one content type
/// /dashboard                                   dashboard figures
/// /activity                                    activity log (super admin)
///
/// /public/submissions                          enquiry form (public)
/// /public/{cpt}                                published rows (public)
/// /public/{cpt}/{slug}                         published row by slug (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    let mut router = Router::new()
        .nest("/auth", auth::router())
        .nest("/submissions", submission::router())
        .nest("/media", media::router())
        .nest("/import", media::import_router())
        .nest("/users", user::router())
        .nest("/public", public::router())
        .merge(console::router());

    for (key, content_router) in content::routers() {
        router = router.nest(&format!("/{key}"), content_router);
    }
    router
}
