//! E2E tests: test plan CRUD, filtering and pagination.

use super::test_helpers::*;
use actix_web::test;

/// Requests without a bearer token are rejected.
#[actix_rt::test]
async fn test_unauthorized_access() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/testplans/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

/// Garbage bearer tokens are rejected.
#[actix_rt::test]
async fn test_invalid_token_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = get_json(&app, "not-a-token", "/api/v1/testplans/").await;
    assert_eq!(status, 401, "{body}");
    assert_eq!(body["error"], "UNAUTHORIZED");
}

/// Create a plan and read it back; status defaults to not_started.
#[actix_rt::test]
async fn test_create_and_retrieve_plan() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let title = unique_name("API Test Plan");
    let (status, created) = post_json(
        &app,
        &token,
        "/api/v1/testplans/",
        serde_json::json!({ "title": title, "description": "Plan for API testing" }),
    )
    .await;
    assert_eq!(status, 201, "{created}");
    assert_eq!(created["title"], title.as_str());
    assert_eq!(created["status"], "not_started");

    let plan_id = created["id"].as_str().unwrap();
    let (status, fetched) = get_json(&app, &token, &format!("/api/v1/testplans/{plan_id}/")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["title"], title.as_str());
    assert_eq!(fetched["description"], "Plan for API testing");
}

/// The list endpoint returns the pagination envelope.
#[actix_rt::test]
async fn test_list_plans_envelope() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    create_plan(&app, &token, &unique_name("Envelope Plan")).await;

    let (status, body) = get_json(&app, &token, "/api/v1/testplans/?page_size=5").await;
    assert_eq!(status, 200);
    assert!(body["results"].is_array());
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["page_size"], 5);
    assert!(body["pagination"]["total"].as_u64().unwrap() >= 1);
}

/// Title filtering is substring and case-insensitive; status is exact.
#[actix_rt::test]
async fn test_plan_filters() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let marker = unique_name("FilterMarker");
    let (_, in_progress) = post_json(
        &app,
        &token,
        "/api/v1/testplans/",
        serde_json::json!({ "title": format!("{marker} Login"), "status": "in_progress" }),
    )
    .await;
    post_json(
        &app,
        &token,
        "/api/v1/testplans/",
        serde_json::json!({ "title": format!("{marker} Checkout"), "status": "completed" }),
    )
    .await;

    // Substring match, lowercased on purpose.
    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/?title={}", marker.to_lowercase()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    // Combined with exact status match.
    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/?title={marker}&status=in_progress"),
    )
    .await;
    assert_eq!(status, 200);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], in_progress["id"]);
}

/// PATCH updates only the provided fields.
#[actix_rt::test]
async fn test_update_plan() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let title = unique_name("Update Plan");
    let plan_id = create_plan(&app, &token, &title).await;

    let (status, updated) = patch_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/"),
        serde_json::json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(status, 200, "{updated}");
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], title.as_str());
}

/// Deleting a plan cascades to every descendant.
#[actix_rt::test]
async fn test_delete_plan_cascades() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Cascade Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Doomed Case").await;

    let status = delete(&app, &token, &format!("/api/v1/testplans/{plan_id}/")).await;
    assert_eq!(status, 204);

    let (status, _) = get_json(&app, &token, &format!("/api/v1/testplans/{plan_id}/")).await;
    assert_eq!(status, 404);

    let (status, _) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/"),
    )
    .await;
    assert_eq!(status, 404);
}

/// Unknown enum values in payloads are rejected with 400.
#[actix_rt::test]
async fn test_invalid_status_rejected() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (status, body) = post_json(
        &app,
        &token,
        "/api/v1/testplans/",
        serde_json::json!({ "title": "Bad status", "status": "done" }),
    )
    .await;
    assert_eq!(status, 400, "{body}");
    assert!(body["error"].is_string());
}
