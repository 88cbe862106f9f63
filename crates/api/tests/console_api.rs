//! HTTP-level integration tests for the console support endpoints: the
//! content type registry, the dashboard and the activity log.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json, signed_in};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_responses_carry_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cpt_registry(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let viewer = signed_in(&pool, &app, "viewer").await;

    let response = get(&app, "/api/cpt", Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let keys: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"treatments"));
    assert!(keys.contains(&"submissions"));

    let response = get(&app, "/api/cpt/hospitals", Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let config = body_json(response).await["data"].clone();
    assert_eq!(config["has_slug"], true);
    assert_eq!(config["publishable"], true);

    let response = get(&app, "/api/cpt/spaceships", Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_counts(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    post_json(&app, "/api/specialties", json!({ "name": "Fertility", "status": "published" }), Some(&editor)).await;
    post_json(&app, "/api/specialties", json!({ "name": "Spine" }), Some(&editor)).await;
    post_json(&app, "/api/public/submissions", json!({ "name": "Kim", "email": "kim@example.com" }), None).await;

    let response = get(&app, "/api/dashboard", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    let specialties = data["content"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["key"] == "specialties")
        .cloned()
        .expect("specialties card");
    assert_eq!(specialties["published"], 1);
    assert_eq!(specialties["draft"], 1);
    assert_eq!(specialties["total"], 2);
    assert_eq!(data["new_submissions"], 1);
    assert!(!data["recent_activity"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activity_log_is_super_admin_only(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;
    let admin = signed_in(&pool, &app, "super_admin").await;

    post_json(&app, "/api/specialties", json!({ "name": "Hepatology" }), Some(&editor)).await;

    let response = get(&app, "/api/activity", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app, "/api/activity?entity_type=specialty&action=create", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["summary"], "Created specialty 'Hepatology'");
    assert_eq!(page["items"][0]["user_name"], "Test editor");
}
