//! HTTP-level integration tests for the `/api/auth` endpoints, the session
//! cookie, and the failed-login throttle.

mod common;

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response, StatusCode};
use common::{
    body_json, build_test_app, build_test_app_with, create_user, get, login, post_json, put_json,
    send, session_cookie, TEST_PASSWORD,
};
use medtour_db::models::user::UpdateUser;
use medtour_db::repositories::UserRepo;
use sqlx::PgPool;

fn login_from(ip: &str, email: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({ "email": email, "password": password });
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_sets_http_only_cookie(pool: PgPool) {
    let user = create_user(&pool, "editor@medtour.test", "editor").await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "editor@medtour.test", "password": TEST_PASSWORD });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["role"], "editor");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_email_is_case_insensitive(pool: PgPool) {
    create_user(&pool, "case@medtour.test", "viewer").await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "  CASE@medtour.test ", "password": TEST_PASSWORD });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "wrong@medtour.test", "editor").await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "wrong@medtour.test", "password": "nope-nope" });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_email_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let body = serde_json::json!({ "email": "ghost@medtour.test", "password": TEST_PASSWORD });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_deactivated_account_is_403(pool: PgPool) {
    let user = create_user(&pool, "gone@medtour.test", "editor").await;
    let deactivate = UpdateUser {
        is_active: Some(false),
        ..Default::default()
    };
    UserRepo::update(&pool, user.id, &deactivate, None).await.unwrap();
    let app = build_test_app(pool);

    let body = serde_json::json!({ "email": "gone@medtour.test", "password": TEST_PASSWORD });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Account is deactivated");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_stamps_last_login(pool: PgPool) {
    let user = create_user(&pool, "stamp@medtour.test", "viewer").await;
    assert!(user.last_login_at.is_none());
    let app = build_test_app(pool.clone());

    login(&app, "stamp@medtour.test").await;

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_expires_cookie(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(&app, "/api/auth/logout", serde_json::json!({}), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_cookie(pool: PgPool) {
    create_user(&pool, "me@medtour.test", "super_admin").await;
    let app = build_test_app(pool);
    let cookie = login(&app, "me@medtour.test").await;

    let response = get(&app, "/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "me@medtour.test");
    assert_eq!(json["data"]["role"], "super_admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_bearer_token(pool: PgPool) {
    create_user(&pool, "bearer@medtour.test", "viewer").await;
    let app = build_test_app(pool);
    let cookie = login(&app, "bearer@medtour.test").await;
    let token = cookie.trim_start_matches("token=");

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_without_session_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/api/auth/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, "/api/auth/me", Some("token=not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_session_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "revoked@medtour.test", "editor").await;
    let app = build_test_app(pool.clone());
    let cookie = login(&app, "revoked@medtour.test").await;

    let deactivate = UpdateUser {
        is_active: Some(false),
        ..Default::default()
    };
    UserRepo::update(&pool, user.id, &deactivate, None).await.unwrap();

    let response = get(&app, "/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password(pool: PgPool) {
    create_user(&pool, "pw@medtour.test", "editor").await;
    let app = build_test_app(pool);
    let cookie = login(&app, "pw@medtour.test").await;

    let body = serde_json::json!({
        "current_password": "not-my-password",
        "new_password": "brand-new-password",
    });
    let response = put_json(&app, "/api/auth/password", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({
        "current_password": TEST_PASSWORD,
        "new_password": "short",
    });
    let response = put_json(&app, "/api/auth/password", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({
        "current_password": TEST_PASSWORD,
        "new_password": "brand-new-password",
    });
    let response = put_json(&app, "/api/auth/password", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "email": "pw@medtour.test", "password": "brand-new-password" });
    let response = post_json(&app, "/api/auth/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

fn retry_after(response: &Response<Body>) -> u64 {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("Retry-After header")
}

/// The test config allows three failures per window; the fourth attempt from
/// the same address is refused with 429 and a `Retry-After` header, even
/// with the right password.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_logins_are_throttled_per_ip(pool: PgPool) {
    create_user(&pool, "target@medtour.test", "editor").await;
    let app = build_test_app(pool);

    for n in 0..3 {
        let email = format!("nobody{n}@medtour.test");
        let response = send(&app, login_from("203.0.113.7", &email, "bad-guess")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = send(&app, login_from("203.0.113.7", "target@medtour.test", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!((1..=60).contains(&retry_after(&response)));

    // Another address is unaffected.
    let response = send(&app, login_from("198.51.100.2", "target@medtour.test", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Rotating the client address does not help: the account itself is locked
/// after three consecutive failures, for the right password too.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_across_rotating_addresses(pool: PgPool) {
    create_user(&pool, "locked@medtour.test", "editor").await;
    let app = build_test_app(pool.clone());

    let mut statuses = Vec::new();
    for n in 0..20 {
        let ip = format!("198.18.0.{}", n + 1);
        let response = send(&app, login_from(&ip, "locked@medtour.test", "bad-guess")).await;
        statuses.push(response.status());
    }
    assert!(statuses[..3].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert!(statuses[3..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));

    let response = send(&app, login_from("198.18.1.1", "locked@medtour.test", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!((1..=60).contains(&retry_after(&response)));

    let user = UserRepo::find_by_email(&pool, "locked@medtour.test").await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 3);
    assert!(user.locked_until.is_some());
}

/// Without `TRUST_PROXY` the header is ignored and the peer address is used,
/// so a forged `X-Forwarded-For` per attempt still hits the throttle.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forwarded_header_ignored_without_trusted_proxy(pool: PgPool) {
    let app = build_test_app_with(pool, |config| config.trust_proxy = false);
    let peer = SocketAddr::from(([192, 0, 2, 10], 40_000));

    let mut statuses = Vec::new();
    for n in 0..5 {
        let ip = format!("198.18.2.{}", n + 1);
        let email = format!("nobody{n}@medtour.test");
        let mut request = login_from(&ip, &email, "bad-guess");
        request.extensions_mut().insert(ConnectInfo(peer));
        statuses.push(send(&app, request).await.status());
    }
    assert_eq!(
        statuses,
        vec![
            StatusCode::UNAUTHORIZED,
            StatusCode::UNAUTHORIZED,
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::TOO_MANY_REQUESTS,
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_successful_login_resets_throttle(pool: PgPool) {
    create_user(&pool, "reset@medtour.test", "editor").await;
    let app = build_test_app(pool.clone());
    let ip = "203.0.113.9";

    for _ in 0..2 {
        let response = send(&app, login_from(ip, "reset@medtour.test", "bad-guess")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
    let response = send(&app, login_from(ip, "reset@medtour.test", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let user = UserRepo::find_by_email(&pool, "reset@medtour.test").await.unwrap().unwrap();
    assert_eq!(user.failed_login_count, 0);

    for _ in 0..2 {
        let response = send(&app, login_from(ip, "reset@medtour.test", "bad-guess")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
