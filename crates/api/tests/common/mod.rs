//! Shared helpers for the HTTP-level integration tests.
//!
//! Tests drive the real router from [`build_app_router`] with
//! `tower::ServiceExt::oneshot`. No `ConnectInfo` is attached; the test
//! config trusts `X-Forwarded-For`, so tests pick the client address with
//! that header.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use medtour_api::auth::jwt::JwtConfig;
use medtour_api::auth::password::hash_password;
use medtour_api::config::ServerConfig;
use medtour_api::router::build_app_router;
use medtour_api::state::AppState;
use medtour_db::models::user::{CreateUser, User};
use medtour_db::repositories::UserRepo;

/// Plaintext password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults and the given upload dir.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_hours: 1,
        },
        cookie_secure: false,
        upload_dir,
        static_dir: PathBuf::from("../../static"),
        max_upload_bytes: 1024 * 1024,
        login_max_attempts: 3,
        login_window_secs: 60,
        trust_proxy: true,
        bootstrap_admin: None,
    }
}

/// The application under test. Uploaded files live in a temp directory that
/// is removed when this value is dropped.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
}

/// Build the full application router, with all middleware layers, on the
/// given pool.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {})
}

/// Like [`build_test_app`], with a chance to adjust the config first.
pub fn build_test_app_with(pool: PgPool, configure: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("temp upload dir");
    let mut config = test_config(upload_dir.path().to_path_buf());
    configure(&mut config);
    let state = AppState::new(pool, config.clone());
    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert an active user with [`TEST_PASSWORD`] directly through the repo.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        name: format!("Test {role}"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the `token=...` cookie pair.
pub async fn login(app: &TestApp, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_cookie(&response).expect("login must set the session cookie")
}

/// Create a user with `role` and return its session cookie.
pub async fn signed_in(pool: &PgPool, app: &TestApp, role: &str) -> String {
    let email = format!("{role}@medtour.test");
    create_user(pool, &email, role).await;
    login(app, &email).await
}

/// The `name=value` part of the `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn builder(method: &str, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
}

/// Send a request through a clone of the router.
pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let request = builder("GET", uri, cookie).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let request = builder("DELETE", uri, cookie).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    let request = builder(method, uri, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    send_json(app, "POST", uri, body, cookie).await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    send_json(app, "PUT", uri, body, cookie).await
}

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "medtour-test-boundary";

/// A `multipart/form-data` body with one `file` part and optional text fields.
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: &TestApp,
    uri: &str,
    body: Vec<u8>,
    cookie: Option<&str>,
) -> Response<Body> {
    let request = builder("POST", uri, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Collect the response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

/// Parse the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("response body should be UTF-8")
}
