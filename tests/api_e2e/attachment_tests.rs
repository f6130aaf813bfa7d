//! E2E tests: attachment batches, order resolution and downloads.

use super::test_helpers::*;
use actix_web::test;
use planboard_lib::db::attachments::NewAttachment;

/// Build a case with steps at orders 1 and 2; returns path parts.
async fn setup_case_with_steps<S>(app: &S, token: &str) -> (String, String)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let plan_id = create_plan(app, token, &unique_name("Attach Plan")).await;
    let case_id = create_case(app, token, &plan_id, "Attach Case").await;

    let (status, _) = post_json(
        app,
        token,
        &format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps/"),
        serde_json::json!([
            { "order": 1, "action": "First" },
            { "order": 2, "action": "Second" },
        ]),
    )
    .await;
    assert_eq!(status, 201);

    (plan_id, case_id)
}

/// A batch of two files lands on the steps referenced by order.
#[actix_rt::test]
async fn test_create_step_attachments_batch() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    let (status, body) = post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "first.txt", b"content one"),
            Part::text("1_step", "2"),
            Part::file("1_file", "second.txt", b"content two"),
        ],
    )
    .await;
    assert_eq!(status, 201, "{body}");
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["file_name"], "first.txt");
    assert_eq!(created[1]["file_name"], "second.txt");

    let (status, body) = get_json(&app, &token, &path).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

/// A new batch replaces the case's previous attachment generation.
#[actix_rt::test]
async fn test_attachment_batch_replaces_previous() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "old-a.txt", b"a"),
            Part::text("1_step", "2"),
            Part::file("1_file", "old-b.txt", b"b"),
        ],
    )
    .await;

    let (status, _) = post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "replacement.txt", b"new"),
        ],
    )
    .await;
    assert_eq!(status, 201);

    let (_, body) = get_json(&app, &token, &path).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["file_name"], "replacement.txt");
}

/// An unresolved order fails the whole batch, valid siblings included.
#[actix_rt::test]
async fn test_unresolved_order_fails_whole_batch() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    let (status, body) = post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "valid.txt", b"fine"),
            Part::text("1_step", "999"),
            Part::file("1_file", "dangling.txt", b"no step"),
        ],
    )
    .await;
    assert_eq!(status, 400, "{body}");
    assert!(body["error"].is_string());

    // Nothing was created.
    let (_, body) = get_json(&app, &token, &path).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

/// An empty multipart form is a 400.
#[actix_rt::test]
async fn test_empty_batch_rejected() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    let (status, body) = post_multipart(&app, &token, &path, &[]).await;
    assert_eq!(status, 400, "{body}");
    assert!(body["error"].is_string());
}

/// Executable uploads are rejected and create nothing.
#[actix_rt::test]
async fn test_exe_upload_rejected() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    let (status, body) = post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "malicious.exe", b"fake exe content"),
        ],
    )
    .await;
    assert_eq!(status, 400, "{body}");
    assert!(body["error"].is_string());

    let (_, body) = get_json(&app, &token, &path).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

/// Uploaded files download back byte-for-byte with disposition headers.
#[actix_rt::test]
async fn test_download_roundtrip() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let path = format!("/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/");

    let (status, body) = post_multipart(
        &app,
        &token,
        &path,
        &[
            Part::text("0_step", "1"),
            Part::file("0_file", "notes.txt", b"roundtrip content"),
        ],
    )
    .await;
    assert_eq!(status, 201, "{body}");
    let attachment_id = body[0]["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("{path}{attachment_id}/download/"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
    assert!(resp.headers().contains_key("content-disposition"));

    let data = test::read_body(resp).await;
    assert_eq!(&data[..], b"roundtrip content");
}

/// An attachment row without a stored file downloads as 404.
#[actix_rt::test]
async fn test_download_without_file_is_404() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let case_uuid: uuid::Uuid = case_id.parse().unwrap();

    // Seed a file-less attachment through the db layer.
    let created = pool
        .replace_step_attachments(
            case_uuid,
            &[NewAttachment {
                parent_order: 1,
                file_key: None,
                file_name: None,
            }],
        )
        .await
        .unwrap();

    let (status, _) = get_json(
        &app,
        &token,
        &format!(
            "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/{}/download/",
            created[0].id
        ),
    )
    .await;
    assert_eq!(status, 404);
}

/// A recorded key whose object is gone from the store is also a 404.
#[actix_rt::test]
async fn test_download_missing_object_is_404() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let case_uuid: uuid::Uuid = case_id.parse().unwrap();

    let created = pool
        .replace_step_attachments(
            case_uuid,
            &[NewAttachment {
                parent_order: 1,
                file_key: Some("attachments/nonexistent/gone.txt".to_string()),
                file_name: Some("gone.txt".to_string()),
            }],
        )
        .await
        .unwrap();

    let (status, _) = get_json(
        &app,
        &token,
        &format!(
            "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/{}/download/",
            created[0].id
        ),
    )
    .await;
    assert_eq!(status, 404);
}

/// Result-step attachments use `{i}_result_step` keys and the same
/// resolution contract.
#[actix_rt::test]
async fn test_result_step_attachment_batch() {
    let pool = create_test_pool().await;
    let (_, token) = create_user_with_token(&pool).await;
    let app = create_test_app(&pool).await;

    let (plan_id, case_id) = setup_case_with_steps(&app, &token).await;
    let result_id = create_result(
        &app,
        &token,
        &plan_id,
        &case_id,
        serde_json::json!({ "result": "in_progress" }),
    )
    .await;

    let rs_path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps/"
    );
    let (status, _) = post_json(
        &app,
        &token,
        &rs_path,
        serde_json::json!([
            { "order": 1, "action": "Executed first", "status": "pass" },
        ]),
    )
    .await;
    assert_eq!(status, 201);

    let attach_path = format!(
        "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments/"
    );
    let (status, body) = post_multipart(
        &app,
        &token,
        &attach_path,
        &[
            Part::text("0_result_step", "1"),
            Part::file("0_file", "evidence.txt", b"it passed"),
        ],
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unknown order at the result level fails the batch too.
    let (status, _) = post_multipart(
        &app,
        &token,
        &attach_path,
        &[
            Part::text("0_result_step", "42"),
            Part::file("0_file", "nowhere.txt", b"x"),
        ],
    )
    .await;
    assert_eq!(status, 400);

    let (_, body) = get_json(&app, &token, &attach_path).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
