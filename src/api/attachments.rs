//! Attachment API handlers for steps and result steps.
//!
//! Batches arrive as multipart form data with positionally indexed field
//! names: `{i}_step` (or `{i}_result_step`) carries the parent's order
//! number, `{i}_file` the file, for i = 0, 1, 2, ... Parsing stops at the
//! first index where both keys are absent.

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ResultStepAttachmentResponse, StepAttachmentResponse};
use crate::services::attachments::{
    store_result_step_attachments, store_step_attachments, AttachmentUpload,
};
use crate::services::Storage;

/// A text or file field collected from the multipart stream.
enum FormField {
    Text(String),
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

/// Drain the multipart stream into named fields.
async fn read_form_fields(mut payload: Multipart) -> AppResult<HashMap<String, FormField>> {
    let mut fields = HashMap::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let (name, file_name) = {
            let content_disposition = field.content_disposition().ok_or_else(|| {
                AppError::InvalidInput("Missing content disposition".to_string())
            })?;
            (
                content_disposition.get_name().map(str::to_string),
                content_disposition.get_filename().map(str::to_string),
            )
        };
        let Some(name) = name else { continue };
        let content_type = field.content_type().map(|m| m.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            data.extend_from_slice(&chunk);
        }

        let value = if file_name.is_some() {
            FormField::File {
                file_name,
                content_type,
                data,
            }
        } else {
            FormField::Text(String::from_utf8_lossy(&data).into_owned())
        };
        fields.insert(name, value);
    }

    Ok(fields)
}

/// Assemble the positional batch from collected fields.
///
/// `parent_key` is `"step"` or `"result_step"`. Iteration stops at the
/// first index i where neither `{i}_{parent_key}` nor `{i}_file` exists;
/// later indices are ignored (fewer than N pairs found = N items
/// processed).
fn collect_batch(
    mut fields: HashMap<String, FormField>,
    parent_key: &str,
) -> AppResult<Vec<AttachmentUpload>> {
    let mut uploads = Vec::new();

    for index in 0usize.. {
        let order_key = format!("{index}_{parent_key}");
        let file_key = format!("{index}_file");

        let order_field = fields.remove(&order_key);
        let file_field = fields.remove(&file_key);

        if order_field.is_none() && file_field.is_none() {
            break;
        }

        let order_text = match order_field {
            Some(FormField::Text(text)) => text,
            Some(FormField::File { .. }) | None => {
                return Err(AppError::batch_item(
                    index,
                    parent_key,
                    format!("missing required field '{order_key}'"),
                ));
            }
        };

        let parent_order: i32 = order_text.trim().parse().map_err(|_| {
            AppError::batch_item(
                index,
                parent_key,
                format!("'{order_text}' is not a valid order number"),
            )
        })?;

        let (file_name, content_type, data) = match file_field {
            Some(FormField::File {
                file_name,
                content_type,
                data,
            }) => (file_name, content_type, Some(data)),
            Some(FormField::Text(_)) | None => (None, None, None),
        };

        uploads.push(AttachmentUpload {
            parent_order,
            file_name,
            data,
            content_type,
        });
    }

    Ok(uploads)
}

/// Build the octet-stream download response shared by both scopes.
fn file_response(data: Vec<u8>, file_name: Option<String>) -> HttpResponse {
    let file_name = file_name.unwrap_or_else(|| "attachment.bin".to_string());
    HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", urlencoding::encode(&file_name)),
        ))
        .body(data)
}

/// List step attachments scoped to a case.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    responses(
        (status = 200, description = "Attachments under the case's steps", body = [StepAttachmentResponse]),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn list_step_attachments(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let attachments = pool.list_step_attachments(case_id).await?;
    let response: Vec<StepAttachmentResponse> = attachments
        .into_iter()
        .map(StepAttachmentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Upload a step attachment batch, replacing the case's previous one.
///
/// Multipart fields: `{i}_step` = order number of the target step,
/// `{i}_file` = the file. The whole batch fails on the first unresolved
/// order or disallowed file type.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    responses(
        (status = 201, description = "Created attachments", body = [StepAttachmentResponse]),
        (status = 400, description = "Empty batch, unresolved order or disallowed file type"),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn create_step_attachments(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<(Uuid, Uuid)>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let fields = read_form_fields(payload).await?;
    let uploads = collect_batch(fields, "step")?;

    let attachments = store_step_attachments(&pool, &storage, case_id, uploads).await?;

    info!(
        case_id = %case_id,
        count = attachments.len(),
        user = %auth.user.username,
        "Step attachment batch stored"
    );

    let response: Vec<StepAttachmentResponse> = attachments
        .into_iter()
        .map(StepAttachmentResponse::from)
        .collect();
    Ok(HttpResponse::Created().json(response))
}

/// Download a step attachment's file.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststepattachments/{attachment_id}/download",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("attachment_id" = Uuid, Path, description = "Attachment id")
    ),
    responses(
        (status = 200, description = "Raw file bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown attachment, or no file stored for it")
    )
)]
pub async fn download_step_attachment(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, attachment_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let attachment = pool
        .get_step_attachment_in_case(case_id, attachment_id)
        .await?;
    let Some(file_key) = attachment.file_key else {
        return Err(AppError::NotFound(format!(
            "File for attachment {}",
            attachment_id
        )));
    };

    let data = storage.get(&file_key).await?;
    Ok(file_response(data, attachment.file_name))
}

/// List result-step attachments scoped to a result.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    responses(
        (status = 200, description = "Attachments under the result's steps", body = [ResultStepAttachmentResponse]),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn list_result_step_attachments(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.get_result_in_case(case_id, result_id).await?;

    let attachments = pool.list_result_step_attachments(result_id).await?;
    let response: Vec<ResultStepAttachmentResponse> = attachments
        .into_iter()
        .map(ResultStepAttachmentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Upload a result-step attachment batch, replacing the result's previous
/// one. Multipart fields: `{i}_result_step` and `{i}_file`.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    responses(
        (status = 201, description = "Created attachments", body = [ResultStepAttachmentResponse]),
        (status = 400, description = "Empty batch, unresolved order or disallowed file type"),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn create_result_step_attachments(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.get_result_in_case(case_id, result_id).await?;

    let fields = read_form_fields(payload).await?;
    let uploads = collect_batch(fields, "result_step")?;

    let attachments = store_result_step_attachments(&pool, &storage, result_id, uploads).await?;

    info!(
        result_id = %result_id,
        count = attachments.len(),
        user = %auth.user.username,
        "Result step attachment batch stored"
    );

    let response: Vec<ResultStepAttachmentResponse> = attachments
        .into_iter()
        .map(ResultStepAttachmentResponse::from)
        .collect();
    Ok(HttpResponse::Created().json(response))
}

/// Download a result-step attachment's file.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments/{attachment_id}/download",
    tag = "Attachments",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id"),
        ("attachment_id" = Uuid, Path, description = "Attachment id")
    ),
    responses(
        (status = 200, description = "Raw file bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown attachment, or no file stored for it")
    )
)]
pub async fn download_result_step_attachment(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<(Uuid, Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id, attachment_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.get_result_in_case(case_id, result_id).await?;

    let attachment = pool
        .get_result_step_attachment_in_result(result_id, attachment_id)
        .await?;
    let Some(file_key) = attachment.file_key else {
        return Err(AppError::NotFound(format!(
            "File for attachment {}",
            attachment_id
        )));
    };

    let data = storage.get(&file_key).await?;
    Ok(file_response(data, attachment.file_name))
}

/// Configure attachment routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/testplans/{plan_id}/testcases/{case_id}/teststepattachments")
            .route(web::get().to(list_step_attachments))
            .route(web::post().to(create_step_attachments)),
    )
    .service(
        web::resource(
            "/testplans/{plan_id}/testcases/{case_id}/teststepattachments/{attachment_id}/download",
        )
        .route(web::get().to(download_step_attachment)),
    )
    .service(
        web::resource(
            "/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments",
        )
        .route(web::get().to(list_result_step_attachments))
        .route(web::post().to(create_result_step_attachments)),
    )
    .service(
        web::resource(
            "/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultstepattachments/{attachment_id}/download",
        )
        .route(web::get().to(download_result_step_attachment)),
    );
}
