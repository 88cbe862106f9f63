//! HTTP-level integration tests for the content CRUD routes: role checks,
//! slugs, listing, dependency-guarded deletes and bulk actions.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json, signed_in, TestApp};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(app: &TestApp, cookie: &str, uri: &str, body: Value) -> Value {
    let response = post_json(app, uri, body, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::CREATED, "create {uri}");
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_content_requires_session(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/api/specialties", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_can_read_but_not_write(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let viewer = signed_in(&pool, &app, "viewer").await;

    let response = get(&app, "/api/specialties", Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/specialties", json!({ "name": "Oncology" }), Some(&viewer)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_generates_slug_and_defaults_to_draft(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let specialty = create(&app, &editor, "/api/specialties", json!({ "name": "Cardiac Surgery" })).await;
    assert_eq!(specialty["slug"], "cardiac-surgery");
    assert_eq!(specialty["status"], "draft");

    let id = specialty["id"].as_i64().unwrap();
    let response = get(&app, &format!("/api/specialties/{id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Cardiac Surgery");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_validates_input(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let response = post_json(&app, "/api/specialties", json!({ "name": "   " }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "Dental", "status": "live" });
    let response = post_json(&app, "/api/specialties", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "Dental", "slug": "Not A Slug!" });
    let response = post_json(&app, "/api/specialties", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    create(&app, &editor, "/api/specialties", json!({ "name": "Orthopedics" })).await;
    let response = post_json(&app, "/api/specialties", json!({ "name": "Orthopedics" }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DUPLICATE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_missing_parent_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let body = json!({ "name": "Knee Replacement", "specialty_id": 999_999 });
    let response = post_json(&app, "/api/treatments", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_is_partial_and_blank_slug_is_ignored(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let destination = create(
        &app,
        &editor,
        "/api/destinations",
        json!({ "name": "Bangkok", "country": "Thailand", "city": "Bangkok" }),
    )
    .await;
    let id = destination["id"].as_i64().unwrap();

    let body = json!({ "summary": "Hub for cosmetic surgery", "slug": "" });
    let response = put_json(&app, &format!("/api/destinations/{id}"), body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["slug"], "bangkok");
    assert_eq!(updated["country"], "Thailand");
    assert_eq!(updated["summary"], "Hub for cosmetic surgery");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_row_is_404(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let response = get(&app, "/api/videos/424242", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(&app, "/api/videos/424242", json!({ "title": "x" }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, "/api/videos/424242", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_paginates(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    for name in ["Cardiology", "Dermatology", "Neurology"] {
        create(&app, &editor, "/api/specialties", json!({ "name": name, "status": "published" })).await;
    }
    create(&app, &editor, "/api/specialties", json!({ "name": "Urology" })).await;

    let response = get(&app, "/api/specialties?status=published&sort=name&order=asc&limit=2", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    let names: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Cardiology", "Dermatology"]);

    let response = get(&app, "/api/specialties?q=derma", Some(&editor)).await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Dermatology");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_unknown_sort_column(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let response = get(&app, "/api/specialties?sort=password_hash", Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_with_dependents_is_409(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let specialty = create(&app, &editor, "/api/specialties", json!({ "name": "Bariatrics" })).await;
    let specialty_id = specialty["id"].as_i64().unwrap();
    let treatment = create(
        &app,
        &editor,
        "/api/treatments",
        json!({ "name": "Gastric Sleeve", "specialty_id": specialty_id }),
    )
    .await;

    let response = delete(&app, &format!("/api/specialties/{specialty_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "HAS_DEPENDENTS");
    assert_eq!(json["dependencies"][0]["entity"], "treatments");
    assert_eq!(json["dependencies"][0]["count"], 1);
    assert_eq!(json["dependencies"][0]["examples"][0], "Gastric Sleeve");

    // Removing the child unblocks the parent.
    let treatment_id = treatment["id"].as_i64().unwrap();
    let response = delete(&app, &format!("/api/treatments/{treatment_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete(&app, &format!("/api/specialties/{specialty_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/specialties/{specialty_id}"), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_publish_reports_missing_ids(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let a = create(&app, &editor, "/api/videos", json!({ "title": "Clinic tour", "url": "https://video.example.com/a" })).await;
    let b = create(&app, &editor, "/api/videos", json!({ "title": "Patient story", "url": "https://video.example.com/b" })).await;
    let ids = [a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap(), 999_999];

    let body = json!({ "ids": ids, "action": "publish" });
    let response = post_json(&app, "/api/videos/bulk", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await["data"].clone();
    assert_eq!(result["requested"], 3);
    assert_eq!(result["updated"], 2);
    assert_eq!(result["skipped"][0]["id"], 999_999);

    let response = get(&app, "/api/videos?status=published", Some(&editor)).await;
    assert_eq!(body_json(response).await["data"]["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_delete_skips_referenced_rows(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let used = create(&app, &editor, "/api/specialties", json!({ "name": "Ophthalmology" })).await;
    let unused = create(&app, &editor, "/api/specialties", json!({ "name": "Podiatry" })).await;
    let used_id = used["id"].as_i64().unwrap();
    create(
        &app,
        &editor,
        "/api/treatments",
        json!({ "name": "LASIK", "specialty_id": used_id }),
    )
    .await;

    let body = json!({ "ids": [used_id, unused["id"]], "action": "delete" });
    let response = post_json(&app, "/api/specialties/bulk", body, Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await["data"].clone();
    assert_eq!(result["deleted"], 1);
    assert_eq!(result["skipped"][0]["id"], used_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_rejects_bad_requests(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let editor = signed_in(&pool, &app, "editor").await;

    let response = post_json(&app, "/api/specialties/bulk", json!({ "ids": [], "action": "publish" }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(&app, "/api/specialties/bulk", json!({ "ids": [1], "action": "promote" }), Some(&editor)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
