//! E2E tests: executed result steps mirror the step replacement contract.

use super::test_helpers::*;

async fn setup_result<S>(app: &S, token: &str) -> (String, String, String)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let plan_id = create_plan(app, token, &unique_name("RS Plan")).await;
    let case_id = create_case(app, token, &plan_id, "RS Case").await;
    let result_id = create_result(
        app,
        token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "in_progress" }),
    )
    .await;
    (plan_id, case_id, result_id)
}

/// Result steps list in ascending order with their outcome and comment.
#[actix_rt::test]
async fn test_result_steps_ordered() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id, result_id) = setup_result(&app, &token).await;
    let path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps/"
    );

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 2, "action": "Second", "status": "fail", "comment": "broke here" },
            { "order": 1, "action": "First", "status": "pass" },
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");

    let (status, body) = get_json(&app, &token, &path).await;
    assert_eq!(status, 200);
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["order"], 1);
    assert_eq!(steps[0]["status"], "pass");
    assert_eq!(steps[1]["order"], 2);
    assert_eq!(steps[1]["status"], "fail");
    assert_eq!(steps[1]["comment"], "broke here");
}

/// A new batch replaces the previous generation.
#[actix_rt::test]
async fn test_result_steps_replaced() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id, result_id) = setup_result(&app, &token).await;
    let path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps/"
    );

    post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "old", "status": "pass" },
            { "order": 2, "action": "old", "status": "pass" },
        ]),
    )
    .await;

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "new first", "status": "pass" },
            { "order": 2, "action": "new second", "status": "fail" },
            { "order": 3, "action": "new third", "status": "skip" },
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get_json(&app, &token, &path).await;
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["action"], "new first");
    assert_eq!(steps[2]["status"], "skip");
}

/// An invalid item rolls the whole batch back.
#[actix_rt::test]
async fn test_result_step_batch_rolls_back() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id, result_id) = setup_result(&app, &token).await;
    let path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps/"
    );

    post_json(
        &app,
        &token,
        &path,
        serde_json::json!([{ "order": 1, "action": "survivor", "status": "pass" }]),
    )
    .await;

    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "action": "a", "status": "pass" },
            { "action": "missing order", "status": "fail" },
        ]),
    )
    .await;
    assert_eq!(status, 400, "{body}");

    let (_, body) = get_json(&app, &token, &path).await;
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["action"], "survivor");
}

/// Result steps may point back at the authored step they executed.
#[actix_rt::test]
async fn test_result_step_links_to_authored_step() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id, result_id) = setup_result(&app, &token).await;

    let (status, steps) = post_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
        serde_json::json!([{ "order": 1, "action": "authored" }]),
    )
    .await;
    assert_eq!(status, 201);
    let step_id = steps[0]["id"].as_str().unwrap();

    let path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps/"
    );
    let (status, body) = post_json(
        &app,
        &token,
        &path,
        serde_json::json!([
            { "order": 1, "step": step_id, "action": "authored", "status": "pass" }
        ]),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body[0]["step"], step_id);

    // Replacing the authored generation clears the link but keeps the
    // executed history.
    let (status, _) = post_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
        serde_json::json!([{ "order": 1, "action": "re-authored" }]),
    )
    .await;
    assert_eq!(status, 201);

    let (_, body) = get_json(&app, &token, &path).await;
    let steps = body.as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert!(steps[0]["step"].is_null());
    assert_eq!(steps[0]["action"], "authored");
}
