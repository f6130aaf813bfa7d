//! Attachment batch service.
//!
//! Sits between the multipart handlers and the database layer: resolves
//! the submitted order numbers against the parent's live generation,
//! enforces the filename denylist, ships bytes to storage, then hands the
//! resolved batch to the transactional generation replacement.
//!
//! Ordering matters and is contractual: order resolution first, then the
//! extension check, then persistence. A batch that fails any of those
//! creates nothing.

use uuid::Uuid;

use crate::db::attachments::NewAttachment;
use crate::db::DbPool;
use crate::entity::{test_result_step_attachment, test_step_attachment};
use crate::error::{AppError, AppResult};
use crate::services::Storage;

/// Filename extensions that are never accepted.
const DISALLOWED_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "com", "msi", "scr", "sh", "dll"];

/// One parsed item of an attachment batch.
#[derive(Debug)]
pub struct AttachmentUpload {
    /// Order number of the parent step (or result step).
    pub parent_order: i32,
    pub file_name: Option<String>,
    pub data: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

/// Store a step attachment batch for a case, replacing the previous one.
pub async fn store_step_attachments(
    pool: &DbPool,
    storage: &Storage,
    case_id: Uuid,
    uploads: Vec<AttachmentUpload>,
) -> AppResult<Vec<test_step_attachment::Model>> {
    if uploads.is_empty() {
        return Err(AppError::InvalidInput(
            "No attachment data provided".to_string(),
        ));
    }

    // Resolve orders against the live generation before touching storage;
    // the replacement below re-resolves inside its own transaction.
    let orders: Vec<i32> = uploads.iter().map(|u| u.parent_order).collect();
    pool.resolve_step_orders(case_id, &orders).await?;

    validate_extensions(&uploads)?;

    let items = upload_files(storage, uploads, Storage::step_attachment_key).await?;

    pool.replace_step_attachments(case_id, &items).await
}

/// Store a result-step attachment batch for a result, replacing the
/// previous one.
pub async fn store_result_step_attachments(
    pool: &DbPool,
    storage: &Storage,
    result_id: Uuid,
    uploads: Vec<AttachmentUpload>,
) -> AppResult<Vec<test_result_step_attachment::Model>> {
    if uploads.is_empty() {
        return Err(AppError::InvalidInput(
            "No attachment data provided".to_string(),
        ));
    }

    let orders: Vec<i32> = uploads.iter().map(|u| u.parent_order).collect();
    pool.resolve_result_step_orders(result_id, &orders).await?;

    validate_extensions(&uploads)?;

    let items = upload_files(storage, uploads, Storage::result_step_attachment_key).await?;

    pool.replace_result_step_attachments(result_id, &items).await
}

/// Ship each item's bytes to storage, producing the rows to insert.
async fn upload_files(
    storage: &Storage,
    uploads: Vec<AttachmentUpload>,
    key_for: fn(&Uuid, &str) -> String,
) -> AppResult<Vec<NewAttachment>> {
    let mut items = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let (file_key, file_name) = match upload.data {
            Some(data) => {
                let name = sanitize_filename(upload.file_name.as_deref());
                let key = key_for(&Uuid::new_v4(), &name);
                storage
                    .put(&key, data, upload.content_type.as_deref())
                    .await?;
                (Some(key), Some(name))
            }
            None => (None, upload.file_name),
        };

        items.push(NewAttachment {
            parent_order: upload.parent_order,
            file_key,
            file_name,
        });
    }

    Ok(items)
}

/// Reject any item whose filename carries a disallowed extension.
fn validate_extensions(uploads: &[AttachmentUpload]) -> AppResult<()> {
    for (index, upload) in uploads.iter().enumerate() {
        if let Some(ref name) = upload.file_name {
            if let Some(ext) = disallowed_extension(name) {
                return Err(AppError::Validation {
                    message: format!("Item {index}: file type .{ext} is not allowed"),
                    details: serde_json::json!({ "index": index, "file_name": name }),
                });
            }
        }
    }
    Ok(())
}

/// Returns the offending extension when the filename is on the denylist.
fn disallowed_extension(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_lowercase();
    DISALLOWED_EXTENSIONS
        .iter()
        .find(|&&denied| denied == ext)
        .copied()
}

/// Reduce a client-supplied filename to its final path component.
fn sanitize_filename(name: Option<&str>) -> String {
    let raw = name.unwrap_or("attachment.bin");
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty() && *s != "..")
        .unwrap_or("attachment.bin");
    base.to_string()
}
