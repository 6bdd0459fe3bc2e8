//! Oracles: the external LLM calls whose reasoning this service does not model.
//!
//! Only the request/response contracts live here. `AppState` carries each oracle as
//! an `Arc<dyn …>` so handlers and the analysis run never see the LLM client.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{AnalysisReport, ExtractedResume, JobDescription};

pub mod analysis;
pub mod extraction;
pub mod prompts;

pub use analysis::LlmAnalysisOracle;
pub use extraction::LlmExtractionOracle;

/// Media types the intake pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    PlainText,
    /// A photo or scan of a resume; the model reads it directly.
    Image(ImageFormat),
}

/// Image formats the model accepts as content blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl FileKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(FileKind::Pdf),
            "text/plain" => Some(FileKind::PlainText),
            "image/jpeg" | "image/jpg" => Some(FileKind::Image(ImageFormat::Jpeg)),
            "image/png" => Some(FileKind::Image(ImageFormat::Png)),
            "image/gif" => Some(FileKind::Image(ImageFormat::Gif)),
            "image/webp" => Some(FileKind::Image(ImageFormat::Webp)),
            _ => None,
        }
    }
}

/// A single uploaded resume file, already persisted to file storage.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub kind: FileKind,
    pub bytes: Bytes,
    pub file_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// Outcome of an extraction call. Anything but `Success` with an `output` is a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub status: ExtractionStatus,
    pub output: Option<ExtractedResume>,
    pub details: Option<String>,
    /// Text read locally from the file before the model saw it. Images have none.
    #[serde(skip)]
    pub source_text: Option<String>,
}

impl ExtractionResult {
    pub fn success(output: ExtractedResume, source_text: Option<String>) -> Self {
        Self {
            status: ExtractionStatus::Success,
            output: Some(output),
            details: None,
            source_text,
        }
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self {
            status: ExtractionStatus::Error,
            output: None,
            details: Some(details.into()),
            source_text: None,
        }
    }
}

#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult, AppError>;
}

#[async_trait]
pub trait AnalysisOracle: Send + Sync {
    async fn analyze(
        &self,
        job: &JobDescription,
        resume_text: &str,
    ) -> Result<AnalysisReport, AppError>;
}
