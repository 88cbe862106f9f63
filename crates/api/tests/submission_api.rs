//! HTTP-level integration tests for visitor enquiries: the public form
//! endpoint, the staff inbox and CSV export.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{
    body_json, body_text, build_test_app, delete, get, post_json, put_json, send, signed_in,
    TestApp,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn submit(app: &TestApp, body: Value) -> Value {
    let response = post_json(app, "/api/public/submissions", body, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_submission_starts_new_and_records_ip(pool: PgPool) {
    let app = build_test_app(pool);

    let body = json!({
        "form_type": "quote",
        "name": "Ana Souza",
        "email": " ana@example.com ",
        "message": "Price for dental implants?",
        "source_page": "/treatments/dental-implants",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/public/submissions")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "192.0.2.44")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["status"], "new");
    assert_eq!(data["form_type"], "quote");
    assert_eq!(data["email"], "ana@example.com");
    assert_eq!(data["ip_address"], "192.0.2.44");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_submission_validation(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        &app,
        "/api/public/submissions",
        json!({ "name": "", "email": "a@example.com" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/public/submissions",
        json!({ "name": "Bo", "email": "not-an-email" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/public/submissions",
        json!({ "name": "Bo", "email": "bo@example.com", "form_type": "newsletter" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inbox_requires_session_and_editor_for_changes(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let submission = submit(&app, json!({ "name": "Li Wei", "email": "li@example.com" })).await;
    let id = submission["id"].as_i64().unwrap();

    let response = get(&app, "/api/submissions", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let viewer = signed_in(&pool, &app, "viewer").await;
    let response = get(&app, &format!("/api/submissions/{id}"), Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        &app,
        &format!("/api/submissions/{id}"),
        json!({ "status": "contacted" }),
        Some(&viewer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_status_and_notes(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;
    let submission = submit(&app, json!({ "name": "Omar", "email": "omar@example.com" })).await;
    let uri = format!("/api/submissions/{}", submission["id"]);

    let body = json!({ "status": "in_progress", "notes": "Called back on Monday" });
    let response = put_json(&app, &uri, body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["status"], "in_progress");
    assert_eq!(data["notes"], "Called back on Monday");

    let response = put_json(&app, &uri, json!({ "status": "published" }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(&app, &uri, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_status_change(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;
    let a = submit(&app, json!({ "name": "A", "email": "a@example.com" })).await;
    let b = submit(&app, json!({ "name": "B", "email": "b@example.com" })).await;

    let body = json!({ "ids": [a["id"], b["id"]], "action": "closed" });
    let response = post_json(&app, "/api/submissions/bulk", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let response = get(&app, "/api/submissions?status=closed", Some(&editor)).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_csv(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let viewer = signed_in(&pool, &app, "viewer").await;
    submit(
        &app,
        json!({
            "name": "Smith, Jane",
            "email": "jane@example.com",
            "message": "Line one\nLine \"two\"",
        }),
    )
    .await;

    let response = get(&app, "/api/submissions/export", Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"submissions-"));

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,created_at,form_type,status,name,email,phone,country,treatment,message,source_page,notes"
    );
    assert!(csv.contains("\"Smith, Jane\""));
    assert!(csv.contains("\"Line one\nLine \"\"two\"\"\""));
}
