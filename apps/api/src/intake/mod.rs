//! Resume intake: store each uploaded file, extract its fields and persist a Resume.
//!
//! Files are processed one at a time and the first failure stops the batch. Resumes
//! created before the failure are kept and reported.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::files::{resume_object_key, FileStore};
use crate::models::{NewResume, Resume};
use crate::oracle::{ExtractionOracle, ExtractionStatus, FileKind, UploadedFile};
use crate::store::EntityStore;

pub mod handlers;

pub const UNSUPPORTED_FILES_MESSAGE: &str = "Please upload PDF, image or text files only";

/// A file as it arrived in the multipart request.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub created: Vec<Resume>,
    /// Names of files dropped for having an unsupported media type.
    pub unsupported: Vec<String>,
    /// "Error processing <name>: <reason>" for the file that stopped the batch.
    pub error: Option<String>,
}

pub async fn ingest_files(
    files: Vec<IncomingFile>,
    file_store: &dyn FileStore,
    extraction: &dyn ExtractionOracle,
    store: &dyn EntityStore,
) -> Result<UploadReport, AppError> {
    let mut accepted = Vec::new();
    let mut unsupported = Vec::new();
    for file in files {
        match FileKind::from_content_type(&file.content_type) {
            Some(kind) => accepted.push((file, kind)),
            None => unsupported.push(file.file_name),
        }
    }
    if accepted.is_empty() {
        return Err(AppError::Validation(UNSUPPORTED_FILES_MESSAGE.to_string()));
    }

    let mut report = UploadReport {
        created: Vec::new(),
        unsupported,
        error: None,
    };

    for (file, kind) in accepted {
        match ingest_one(&file, kind, file_store, extraction, store).await {
            Ok(resume) => {
                info!("Created resume {} from {}", resume.id, file.file_name);
                report.created.push(resume);
            }
            Err(reason) => {
                warn!("Upload batch stopped at {}: {reason}", file.file_name);
                report.error = Some(format!("Error processing {}: {reason}", file.file_name));
                break;
            }
        }
    }

    Ok(report)
}

/// Returns the user-facing reason on failure.
async fn ingest_one(
    file: &IncomingFile,
    kind: FileKind,
    file_store: &dyn FileStore,
    extraction: &dyn ExtractionOracle,
    store: &dyn EntityStore,
) -> Result<Resume, String> {
    let key = resume_object_key(&file.file_name);
    let file_url = file_store
        .put(&key, file.bytes.clone(), &file.content_type)
        .await
        .map_err(|e| e.to_string())?;

    let uploaded = UploadedFile {
        file_name: file.file_name.clone(),
        kind,
        bytes: file.bytes.clone(),
        file_url: file_url.clone(),
    };
    let result = extraction
        .extract(&uploaded)
        .await
        .map_err(|e| e.to_string())?;

    let output = match (result.status, result.output) {
        (ExtractionStatus::Success, Some(output)) => output,
        _ => {
            return Err(result
                .details
                .unwrap_or_else(|| "Failed to extract resume data".to_string()))
        }
    };

    let new = NewResume::from_extraction(output, file_url, result.source_text.as_deref());
    store.create_resume(new).await.map_err(|e| e.to_string())
}
