//! Axum route handlers for the per-slot document inputs.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::documents::slot::{SlotKind, UploadedFile};
use crate::errors::AppError;
use crate::extract::{JsonBody, Path, Upload};
use crate::page::snapshot::SlotSnapshot;
use crate::page::{lock_page, InputEffects};
use crate::state::AppState;

/// Multipart field the page shell puts the chosen file in.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SlotUpdateResponse {
    pub slot: SlotKind,
    pub effects: InputEffects,
    pub state: SlotSnapshot,
}

/// PUT /api/v1/sessions/:id/documents/:slot/text
pub async fn handle_set_text(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, SlotKind)>,
    JsonBody(request): JsonBody<SetTextRequest>,
) -> Result<Json<SlotUpdateResponse>, AppError> {
    let session = state.session(id)?;
    let mut page = lock_page(&session.page);
    let effects = page.set_text_content(slot, &request.text);

    Ok(Json(SlotUpdateResponse {
        slot,
        effects,
        state: SlotSnapshot::of(&page, slot),
    }))
}

/// POST /api/v1/sessions/:id/documents/:slot/file
///
/// Expects a multipart body with a `file` field. The slot keeps its prior
/// state until decoding succeeds; an upload that loses a race with another
/// edit is rejected with 409.
pub async fn handle_upload_file(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, SlotKind)>,
    Upload(multipart): Upload,
) -> Result<Json<SlotUpdateResponse>, AppError> {
    let session = state.session(id)?;
    let file = read_upload(multipart).await?;

    let revision = lock_page(&session.page).slot_revision(slot);
    let decoded = state.decoder.decode(&file).await.map_err(|e| {
        warn!("Rejected {slot} upload: {e}");
        AppError::from(e)
    })?;

    let file_name = file.file_name.clone();
    let mut page = lock_page(&session.page);
    let effects = page
        .set_file_content_at(slot, revision, decoded, file)?
        .ok_or_else(|| {
            warn!("Discarded {slot} upload {}: slot changed while decoding", file_name);
            AppError::Conflict(format!("The {slot} document changed while the upload was decoding"))
        })?;

    Ok(Json(SlotUpdateResponse {
        slot,
        effects,
        state: SlotSnapshot::of(&page, slot),
    }))
}

/// DELETE /api/v1/sessions/:id/documents/:slot/file
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, SlotKind)>,
) -> Result<Json<SlotUpdateResponse>, AppError> {
    let session = state.session(id)?;
    let mut page = lock_page(&session.page);
    let effects = page.remove_file(slot);

    Ok(Json(SlotUpdateResponse {
        slot,
        effects,
        state: SlotSnapshot::of(&page, slot),
    }))
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(String::from)
            .ok_or_else(|| AppError::Validation("Upload is missing a file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        return Ok(UploadedFile::new(file_name, bytes)?);
    }

    Err(AppError::Validation(format!(
        "Multipart body has no '{UPLOAD_FIELD}' field"
    )))
}
