//! E2E tests: test cases and their derived execution fields.

use super::test_helpers::*;

/// A case with no results has both derived fields absent.
#[actix_rt::test]
async fn test_new_case_has_no_derived_state() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Derived Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Fresh Case").await;

    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/"),
    )
    .await;
    assert_eq!(status, 200);
    assert!(body["latest_result"].is_null());
    assert!(body["executed_at"].is_null());
}

/// After two executions the derived fields reflect the newest result.
#[actix_rt::test]
async fn test_latest_result_tracks_newest_execution() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Latest Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Executed Case").await;

    create_result(
        &app,
        &token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "pass", "browser": "chrome", "os": "windows10" }),
    )
    .await;
    create_result(
        &app,
        &token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "fail", "browser": "firefox", "os": "macos" }),
    )
    .await;

    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["latest_result"], "fail");
    assert!(body["executed_at"].is_string());
}

/// Deleting the newest result moves the projection back to the previous
/// one; nothing is cached on the case.
#[actix_rt::test]
async fn test_latest_result_recomputed_after_delete() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Recompute Plan")).await;
    let case_id = create_case(&app, &token, &plan_id, "Recompute Case").await;

    create_result(
        &app,
        &token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "pass" }),
    )
    .await;
    let newest = create_result(
        &app,
        &token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "fail" }),
    )
    .await;

    let status = delete(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{newest}/"),
    )
    .await;
    assert_eq!(status, 204);

    let (_, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/"),
    )
    .await;
    assert_eq!(body["latest_result"], "pass");
}

/// The case list supports filtering on the derived latest result.
#[actix_rt::test]
async fn test_filter_cases_by_latest_result() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Latest Filter Plan")).await;
    let passing = create_case(&app, &token, &plan_id, "Passing Case").await;
    let failing = create_case(&app, &token, &plan_id, "Failing Case").await;
    create_case(&app, &token, &plan_id, "Never Executed").await;

    create_result(
        &app,
        &token,
        &plan_id,
        &passing,
        serde_json::json!({ "result": "pass" }),
    )
    .await;
    create_result(
        &app,
        &token,
        &plan_id,
        &failing,
        serde_json::json!({ "result": "fail" }),
    )
    .await;

    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/?latest_result=pass"),
    )
    .await;
    assert_eq!(status, 200);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], passing.as_str());
}

/// A case id under the wrong plan is a 404.
#[actix_rt::test]
async fn test_case_scoped_to_plan() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_a = create_plan(&app, &token, &unique_name("Scope Plan A")).await;
    let plan_b = create_plan(&app, &token, &unique_name("Scope Plan B")).await;
    let case_in_a = create_case(&app, &token, &plan_a, "Scoped Case").await;

    let (status, _) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_b}/testcases/{case_in_a}/"),
    )
    .await;
    assert_eq!(status, 404);
}

/// Case list is scoped to its plan and filters by title/status.
#[actix_rt::test]
async fn test_list_cases_scoped_and_filtered() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let plan_id = create_plan(&app, &token, &unique_name("Case List Plan")).await;
    let other_plan = create_plan(&app, &token, &unique_name("Other Plan")).await;
    create_case(&app, &token, &plan_id, "Login Case").await;
    create_case(&app, &token, &plan_id, "Logout Case").await;
    create_case(&app, &token, &other_plan, "Login Case Elsewhere").await;

    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let (status, body) = get_json(
        &app,
        &token,
        &format!("/api/v1/testplans/{plan_id}/testcases/?title=login"),
    )
    .await;
    assert_eq!(status, 200);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Login Case");
}
