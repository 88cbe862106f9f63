//! Server-rendered admin console pages (`/admin/...`).
//!
//! Pages are thin HTML shells: the dashboard and activity log are rendered
//! here, while Listing and Studio screens load `listing.js` / `studio.js`
//! which read their configuration from `/api/cpt/<key>`. Every dynamic value
//! goes through [`escape_html`].

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use medtour_core::cpt::{ContentType, ALL};
use medtour_core::document::escape_html;
use medtour_core::types::DbId;
use medtour_db::models::activity::{ActivityEntry, ActivityQuery};
use medtour_db::models::dashboard::Dashboard;
use medtour_db::repositories::{ActivityRepo, DashboardRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/admin/login";

/// Rows shown on the activity page.
const ACTIVITY_PAGE_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Session extractor
// ---------------------------------------------------------------------------

/// Signed-in user for an HTML page. Without a valid session the request is
/// redirected to the login page instead of receiving a JSON 401.
pub struct PageUser(pub AuthUser);

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::resolve(&parts.headers, state).await {
            Ok(Some(user)) => Ok(PageUser(user)),
            Ok(None) => Err(Redirect::to(LOGIN_PATH).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/login
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if AuthUser::resolve(&headers, &state).await?.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }
    let body = r#"<main class="login">
  <form id="login-form" class="card" autocomplete="on">
    <h1>Sign in</h1>
    <label>Email <input type="email" name="email" required autofocus></label>
    <label>Password <input type="password" name="password" required></label>
    <p class="error" id="login-error" hidden></p>
    <button type="submit" class="primary">Sign in</button>
  </form>
</main>"#;
    Ok(Html(document("Sign in", body, &["/static/js/login.js"])).into_response())
}

/// GET /admin
pub async fn dashboard(
    PageUser(user): PageUser,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let dashboard = DashboardRepo::load(&state.pool).await?;
    let body = render_dashboard(&dashboard);
    Ok(Html(shell(&user, "Dashboard", None, &body, &[])))
}

/// GET /admin/activity
pub async fn activity(
    PageUser(user): PageUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    if !user.role.is_super_admin() {
        return Ok(forbidden(&user));
    }
    let page = ActivityRepo::query(
        &state.pool,
        &ActivityQuery {
            limit: Some(ACTIVITY_PAGE_LIMIT),
            ..Default::default()
        },
    )
    .await?;
    let body = format!(
        "<h1>Activity</h1>\n<p class=\"muted\">Showing {} of {} entries</p>\n{}",
        page.items.len(),
        page.total,
        activity_table(&page.items)
    );
    Ok(Html(shell(&user, "Activity", None, &body, &[])).into_response())
}

/// GET /admin/{cpt}
pub async fn listing(
    PageUser(user): PageUser,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let ct = console_type(&key)?;
    if ct == ContentType::User && !user.role.is_super_admin() {
        return Ok(forbidden(&user));
    }
    let body = format!(
        "<div id=\"listing\" data-cpt=\"{key}\" data-can-write=\"{write}\"></div>",
        key = escape_html(ct.key()),
        write = user.role.can_write(),
    );
    Ok(Html(shell(
        &user,
        ct.label_plural(),
        Some(ct),
        &body,
        &["/static/js/listing.js"],
    ))
    .into_response())
}

/// GET /admin/{cpt}/new
pub async fn studio_new(
    PageUser(user): PageUser,
    Path(key): Path<String>,
) -> AppResult<Response> {
    studio(user, &key, None)
}

/// GET /admin/{cpt}/{id}
pub async fn studio_edit(
    PageUser(user): PageUser,
    Path((key, id)): Path<(String, DbId)>,
) -> AppResult<Response> {
    studio(user, &key, Some(id))
}

fn studio(user: AuthUser, key: &str, id: Option<DbId>) -> AppResult<Response> {
    let ct = console_type(key)?;
    if ct == ContentType::User && !user.role.is_super_admin() {
        return Ok(forbidden(&user));
    }
    let title = match id {
        Some(id) => format!("Edit {} #{id}", ct.label().to_lowercase()),
        None => format!("New {}", ct.label().to_lowercase()),
    };
    let body = format!(
        "<div id=\"studio\" data-cpt=\"{key}\" data-id=\"{id}\" data-can-write=\"{write}\"></div>",
        key = escape_html(ct.key()),
        id = id.map(|i| i.to_string()).unwrap_or_default(),
        write = user.role.can_write(),
    );
    Ok(Html(shell(&user, &title, Some(ct), &body, &["/static/js/studio.js"])).into_response())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn console_type(key: &str) -> AppResult<ContentType> {
    ContentType::from_key(key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown admin page '{key}'")))
}

fn forbidden(user: &AuthUser) -> Response {
    let body = "<h1>Not permitted</h1>\n<p>This page requires the Super Admin role.</p>";
    (
        StatusCode::FORBIDDEN,
        Html(shell(user, "Not permitted", None, body, &[])),
    )
        .into_response()
}

/// Bare HTML document with the console stylesheet and `api.js`.
fn document(title: &str, body: &str, scripts: &[&str]) -> String {
    let scripts: String = std::iter::once("/static/js/api.js")
        .chain(scripts.iter().copied())
        .map(|src| format!("  <script src=\"{src}\" defer></script>\n"))
        .collect();
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  \
         <title>{title} · MedTour Admin</title>\n  \
         <link rel=\"stylesheet\" href=\"/static/css/admin.css\">\n{scripts}</head>\n\
         <body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Console page: sidebar navigation, header with the signed-in user, content.
fn shell(
    user: &AuthUser,
    title: &str,
    active: Option<ContentType>,
    content: &str,
    scripts: &[&str],
) -> String {
    let body = format!(
        "<div class=\"layout\">\n<nav class=\"sidebar\">\n{nav}</nav>\n\
         <div class=\"main\">\n<header class=\"topbar\">\
         <span class=\"user\">{name} <small>({role})</small></span>\
         <button type=\"button\" id=\"logout\">Sign out</button></header>\n\
         <section class=\"content\">\n{content}\n</section>\n</div>\n</div>",
        nav = navigation(user, active),
        name = escape_html(&user.name),
        role = escape_html(user.role.as_str()),
    );
    document(title, &body, scripts)
}

fn navigation(user: &AuthUser, active: Option<ContentType>) -> String {
    let mut nav = String::from("<a class=\"brand\" href=\"/admin\">MedTour</a>\n<ul>\n");
    nav.push_str("<li><a href=\"/admin\">Dashboard</a></li>\n");
    for ct in ALL
        .iter()
        .copied()
        .filter(|ct| *ct != ContentType::User || user.role.is_super_admin())
    {
        let class = if active == Some(ct) { " class=\"active\"" } else { "" };
        nav.push_str(&format!(
            "<li><a{class} href=\"/admin/{key}\">{label}</a></li>\n",
            key = escape_html(ct.key()),
            label = escape_html(ct.label_plural()),
        ));
    }
    if user.role.is_super_admin() {
        nav.push_str("<li><a href=\"/admin/activity\">Activity</a></li>\n");
    }
    nav.push_str("</ul>\n");
    nav
}

fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut cards = String::new();
    for summary in &dashboard.content {
        cards.push_str(&format!(
            "<a class=\"card stat\" href=\"/admin/{key}\"><h3>{label}</h3>\
             <p class=\"total\">{total}</p>\
             <p class=\"muted\">{published} published · {draft} draft · {archived} archived</p></a>\n",
            key = escape_html(summary.key),
            label = escape_html(summary.label),
            total = summary.total,
            published = summary.published,
            draft = summary.draft,
            archived = summary.archived,
        ));
    }
    format!(
        "<h1>Dashboard</h1>\n<div class=\"cards\">\n\
         <a class=\"card stat highlight\" href=\"/admin/submissions?status=new\"><h3>New enquiries</h3>\
         <p class=\"total\">{new}</p></a>\n\
         <a class=\"card stat\" href=\"/admin/media\"><h3>Media files</h3><p class=\"total\">{media}</p></a>\n\
         {cards}</div>\n<h2>Recent activity</h2>\n{activity}",
        new = dashboard.new_submissions,
        media = dashboard.media_count,
        activity = activity_table(&dashboard.recent_activity),
    )
}

fn activity_table(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return "<p class=\"muted\">No activity yet.</p>".to_string();
    }
    let rows: String = entries
        .iter()
        .map(|e| {
            format!(
                "<tr><td>{when}</td><td>{who}</td><td>{action}</td><td>{entity}</td><td>{summary}</td></tr>\n",
                when = e.created_at.format("%Y-%m-%d %H:%M"),
                who = escape_html(e.user_name.as_deref().unwrap_or("System")),
                action = escape_html(&e.action),
                entity = escape_html(&e.entity_type),
                summary = escape_html(&e.summary),
            )
        })
        .collect();
    format!(
        "<table class=\"table\">\n<thead><tr><th>When</th><th>User</th><th>Action</th>\
         <th>Type</th><th>Summary</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
    )
}

#[cfg(test)]
mod tests {
    use medtour_core::roles::Role;

    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            role,
            email: "a@example.com".into(),
            name: "<b>Ann</b>".into(),
        }
    }

    #[test]
    fn shell_escapes_user_name() {
        let html = shell(&user(Role::Editor), "Doctors", None, "", &[]);
        assert!(html.contains("&lt;b&gt;Ann&lt;/b&gt;"));
        assert!(!html.contains("<b>Ann</b>"));
    }

    #[test]
    fn users_link_only_for_super_admin() {
        assert!(!navigation(&user(Role::Editor), None).contains("/admin/users"));
        assert!(navigation(&user(Role::SuperAdmin), None).contains("/admin/users"));
        assert!(navigation(&user(Role::SuperAdmin), None).contains("/admin/activity"));
    }

    #[test]
    fn document_loads_api_js_first() {
        let html = document("X", "", &["/static/js/listing.js"]);
        let api = html.find("api.js").unwrap();
        let listing = html.find("listing.js").unwrap();
        assert!(api < listing);
    }

    #[test]
    fn activity_table_escapes_summary() {
        let entry = ActivityEntry {
            id: 1,
            user_id: None,
            user_name: None,
            action: "create".into(),
            entity_type: "doctor".into(),
            entity_id: Some(1),
            summary: "Created doctor '<script>'".into(),
            details: None,
            created_at: chrono::Utc::now(),
        };
        let html = activity_table(&[entry]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("System"));
    }
}
