use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ImageInput, LlmClient, LlmError};
use crate::models::ExtractedResume;
use crate::oracle::prompts::{
    EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM, IMAGE_EXTRACTION_PROMPT_TEMPLATE,
};
use crate::oracle::{ExtractionOracle, ExtractionResult, FileKind, ImageFormat, UploadedFile};

/// Reads the text out of an uploaded file locally, then asks the LLM to structure it.
/// Images skip the local read and go to the model as an image block.
pub struct LlmExtractionOracle {
    llm: LlmClient,
}

impl LlmExtractionOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ExtractionOracle for LlmExtractionOracle {
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult, AppError> {
        let (called, source_text) = match file.kind {
            FileKind::Image(format) => (self.extract_image(file, format).await?, None),
            FileKind::Pdf | FileKind::PlainText => {
                let text = match read_text(file).await? {
                    Ok(text) => text,
                    Err(details) => return Ok(ExtractionResult::error(details)),
                };
                let prompt = build_extraction_prompt(&text)?;
                let called = self
                    .llm
                    .call_json::<ExtractedResume>(&prompt, EXTRACTION_SYSTEM)
                    .await;
                (called, Some(text))
            }
        };

        match called {
            Ok(output) => {
                info!(
                    "Extracted resume fields from {} ({} skills)",
                    file.file_name,
                    output.extracted_skills.len()
                );
                Ok(ExtractionResult::success(output, source_text))
            }
            Err(e) => {
                warn!("Resume extraction call failed for {}: {e}", file.file_name);
                Ok(ExtractionResult::error(format!(
                    "Could not extract resume fields: {e}"
                )))
            }
        }
    }
}

impl LlmExtractionOracle {
    async fn extract_image(
        &self,
        file: &UploadedFile,
        format: ImageFormat,
    ) -> Result<Result<ExtractedResume, LlmError>, AppError> {
        let prompt = build_image_extraction_prompt()?;
        let image = ImageInput {
            media_type: format.media_type(),
            bytes: &file.bytes,
        };
        Ok(self
            .llm
            .call_json_with_image::<ExtractedResume>(&prompt, EXTRACTION_SYSTEM, image)
            .await)
    }
}

/// Returns the file's text, or a user-facing reason it has none.
/// The outer error is reserved for infrastructure failures.
async fn read_text(file: &UploadedFile) -> Result<Result<String, String>, AppError> {
    let text = match file.kind {
        FileKind::PlainText => String::from_utf8_lossy(&file.bytes).into_owned(),
        FileKind::Image(_) => return Ok(Err("Images carry no embedded text".to_string())),
        FileKind::Pdf => {
            let bytes = file.bytes.clone();
            let parsed =
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await;
            match parsed {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => return Ok(Err(format!("Could not read PDF: {e}"))),
                // The PDF parser panics on some malformed files.
                Err(e) if e.is_panic() => {
                    return Ok(Err("Could not read PDF: malformed document".to_string()))
                }
                Err(e) => {
                    return Err(AppError::Internal(anyhow::anyhow!(
                        "PDF extraction task failed: {e}"
                    )))
                }
            }
        }
    };

    if text.trim().is_empty() {
        return Ok(Err("No readable text found in file".to_string()));
    }
    Ok(Ok(text))
}

pub fn build_extraction_prompt(resume_text: &str) -> Result<String, AppError> {
    let schema = schema_json()?;
    Ok(fill_template(
        EXTRACTION_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("schema", schema.as_str())],
    ))
}

pub fn build_image_extraction_prompt() -> Result<String, AppError> {
    let schema = schema_json()?;
    Ok(fill_template(
        IMAGE_EXTRACTION_PROMPT_TEMPLATE,
        &[("schema", schema.as_str())],
    ))
}

fn schema_json() -> Result<String, AppError> {
    serde_json::to_string_pretty(&extraction_schema())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize schema: {e}")))
}

/// Mirrors `ExtractedResume`.
fn extraction_schema() -> serde_json::Value {
    let strings = json!({ "type": "array", "items": { "type": "string" } });
    json!({
        "type": "object",
        "properties": {
            "candidate_name": { "type": "string" },
            "email": { "type": "string" },
            "phone": { "type": "string" },
            "extracted_text": { "type": "string" },
            "extracted_skills": strings,
            "experience_years": { "type": "number" },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "degree": { "type": "string" },
                        "institution": { "type": "string" },
                        "year": { "type": "string" },
                        "gpa": { "type": "string" }
                    }
                }
            },
            "work_experience": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "company": { "type": "string" },
                        "duration": { "type": "string" },
                        "description": { "type": "string" }
                    }
                }
            },
            "projects": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "technologies": strings,
                        "impact": { "type": "string" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(kind: FileKind, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: "cv".to_string(),
            kind,
            bytes: Bytes::from_static(bytes),
            file_url: "http://files/cv".to_string(),
        }
    }

    #[tokio::test]
    async fn test_plain_text_is_read_directly() {
        let text = read_text(&upload(FileKind::PlainText, b"Jane Doe\nRust, Go"))
            .await
            .unwrap();
        assert_eq!(text, Ok("Jane Doe\nRust, Go".to_string()));
    }

    #[tokio::test]
    async fn test_blank_file_reports_no_text() {
        let text = read_text(&upload(FileKind::PlainText, b"  \n "))
            .await
            .unwrap();
        assert!(text.is_err());
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_a_user_facing_failure() {
        let text = read_text(&upload(FileKind::Pdf, b"definitely not a pdf"))
            .await
            .unwrap();
        assert!(text.unwrap_err().starts_with("Could not read PDF"));
    }

    #[tokio::test]
    async fn test_images_are_not_read_locally() {
        let text = read_text(&upload(FileKind::Image(ImageFormat::Png), b"\x89PNG"))
            .await
            .unwrap();
        assert!(text.is_err());
    }

    #[test]
    fn test_image_prompt_asks_for_transcription() {
        let prompt = build_image_extraction_prompt().unwrap();
        assert!(prompt.contains("extracted_text"));
        assert!(prompt.contains("\"work_experience\""));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_extraction_prompt_carries_text() {
        let prompt = build_extraction_prompt("Jane Doe, Rust engineer").unwrap();
        assert!(prompt.contains("Jane Doe, Rust engineer"));
        assert!(prompt.contains("\"work_experience\""));
    }
}
