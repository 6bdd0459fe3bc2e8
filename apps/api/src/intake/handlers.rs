//! Resume upload and lookup endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::{ingest_files, IncomingFile, UploadReport};
use crate::models::Resume;
use crate::state::AppState;

const FILES_FIELD: &str = "files";

/// POST /api/v1/resumes
///
/// Multipart upload; every part named `files` is one resume. Returns 201 when at least
/// one resume was created, even if a later file stopped the batch.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReport>), AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read {file_name}: {e}")))?;
        files.push(IncomingFile {
            file_name,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(AppError::Validation(format!(
            "No files provided in the '{FILES_FIELD}' field"
        )));
    }

    let report = ingest_files(
        files,
        state.files.as_ref(),
        state.extraction.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    if report.created.is_empty() {
        let message = report
            .error
            .unwrap_or_else(|| "No resumes were created".to_string());
        return Err(AppError::UnprocessableEntity(message));
    }
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_resumes().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    state
        .store
        .get_resume(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}
