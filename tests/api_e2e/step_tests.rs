//! E2E tests: the step generation replacement contract.

use super::test_helpers::*;

async fn list_steps<S>(app: &S, token: &str, plan_id: &str, case_id: &str) -> serde_json::Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = get_json(
        app,
        token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
    )
    .await;
    assert_eq!(status, 200, "{body}");
    body
}

/// Steps list as a bare array in ascending order.
#[actix_rt::test]
async fn test_steps_listed_in_order() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Step Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Ordered Case").await;

    // Submit out of order; the list must come back sorted by order.
    let (status, body) = post_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
        serde_json::json!([
            { "order": 3, "action": "Third" },
            { "order": 1, "action": "First" },
            { "order": 2, "action": "Second" },
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["order"], 1);
    assert_eq!(steps[1]["order"], 2);
    assert_eq!(steps[2]["order"], 3);
    assert_eq!(steps[0]["action"], "First");
}

/// Submitting a batch replaces the previous generation entirely.
#[actix_rt::test]
async fn test_create_steps_replaces_existing() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Replace Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Replace Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    let (status, _) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "Old first" },
            { "order": 2, "action": "Old second" },
        ]),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "New first" },
            { "order": 2, "action": "New second" },
            { "order": 3, "action": "New third" },
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body.as_array().unwrap().len(), 3);

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["action"], "New first");
    assert_eq!(steps[2]["action"], "New third");
}

/// Replaying the identical submission yields the identical final set.
#[actix_rt::test]
async fn test_replacement_is_idempotent() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Idempotent Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Idempotent Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    let batch = serde_json::json!([
        { "order": 1, "action": "a", "expected_result": "x" },
        { "order": 2, "action": "b", "expected_result": "y" },
    ]);

    let (status, _) = post_json(&app, &token, &path, batch.clone()).await;
    assert_eq!(status, 201);
    let (status, _) = post_json(&app, &token, &path, batch).await;
    assert_eq!(status, 201);

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["order"], 1);
    assert_eq!(steps[0]["action"], "a");
    assert_eq!(steps[1]["order"], 2);
    assert_eq!(steps[1]["action"], "b");
}

/// Submitted order values are retained as-is, not re-numbered.
#[actix_rt::test]
async fn test_non_contiguous_orders_retained() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Sparse Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Sparse Case").await;

    let (status, _) = post_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
        serde_json::json!([
            { "order": 10, "action": "ten" },
            { "order": 5, "action": "five" },
        ]),
    )
    .await;
    assert_eq!(status, 201);

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps[0]["order"], 5);
    assert_eq!(steps[1]["order"], 10);
}

/// An empty batch is valid and clears the generation.
#[actix_rt::test]
async fn test_empty_batch_clears_generation() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Empty Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Empty Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    post_json(
        &app,
        &token,
        &path,
        serde_json::json!([{ "order": 1, "action": "soon gone" }]),
    )
    .await;

    let (status, body) = post_json(&app, &token, &path, serde_json::json!([])).await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body.as_array().unwrap().len(), 0);

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    assert_eq!(steps.as_array().unwrap().len(), 0);
}

/// An item without `order` aborts the batch and leaves the previous
/// generation untouched.
#[actix_rt::test]
async fn test_invalid_item_leaves_generation_unchanged() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Rollback Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Rollback Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    let (status, _) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "keep me" },
            { "order": 2, "action": "keep me too" },
        ]),
    )
    .await;
    assert_eq!(status, 201);

    // Second item is missing its order.
    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "would replace" },
            { "action": "no order here" },
        ]),
    )
    .await;
    assert_eq!(status, 400, "{body}");
    assert_eq!(body["error"], "VALIDATION");

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["action"], "keep me");
    assert_eq!(steps[1]["action"], "keep me too");
}

/// Duplicate orders within one submission abort the batch.
#[actix_rt::test]
async fn test_duplicate_order_in_batch_rejected() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Dup Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Dup Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    let (status, _) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([{ "order": 1, "action": "original" }]),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "first" },
            { "order": 1, "action": "second with same order" },
        ]),
    )
    .await;
    assert_eq!(status, 400, "{body}");

    // Old generation survived the rollback.
    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["action"], "original");
}

/// Direct insertion of a conflicting order fails with a constraint error.
#[actix_rt::test]
async fn test_duplicate_order_direct_insert() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Direct Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Direct Case").await;
    let case_uuid: uuid::Uuid = case_id.parse().unwrap();

    pool.insert_step(case_uuid, 1, "first", "").await.unwrap();
    let err = pool.insert_step(case_uuid, 1, "duplicate", "").await;
    assert!(err.is_err());
}

/// The full end-to-end authoring scenario.
#[actix_rt::test]
async fn test_end_to_end_step_authoring() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("E2E Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "E2E Case").await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/");

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "a1" },
            { "order": 2, "action": "a2" },
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["order"], 1);
    assert_eq!(created[1]["order"], 2);

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([{ "order": 1, "action": "b1" }]),
    )
    .await;
    assert_eq!(status, 201, "{body}");

    let steps = list_steps(&app, &token, &plan_id, &case_id).await;
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["order"], 1);
    assert_eq!(steps[0]["action"], "b1");
}
