//! Optical Text Stage: reads resume and job-posting images through the reasoning service.
//!
//! Only JPEG and PNG are accepted; the MIME type is checked when an upload is parsed,
//! so a bad format never reaches the service.

pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, ChatModel, ChatRequest, ContentBlock, Role};
use crate::ocr::prompts::OCR_INSTRUCTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    /// Parses a `Content-Type` value, ignoring parameters and case.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, AppError> {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("image/jpeg") => Ok(ImageMime::Jpeg),
            Some("image/png") => Ok(ImageMime::Png),
            _ => Err(AppError::InvalidFormat(
                "Invalid image format. Use JPEG or PNG.".to_string(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }
}

/// An uploaded image, fully buffered in memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub mime: ImageMime,
    pub bytes: Bytes,
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageUpload) -> Result<String, AppError>;
}

pub struct LlmTextRecognizer {
    llm: Arc<dyn ChatModel>,
}

impl LlmTextRecognizer {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TextRecognizer for LlmTextRecognizer {
    /// One call, temperature 0, no retry. Content rejections become `AppError::Upstream`.
    async fn recognize(&self, image: &ImageUpload) -> Result<String, AppError> {
        let request = ChatRequest {
            system: None,
            messages: vec![ChatMessage {
                role: Role::User,
                content: vec![
                    ContentBlock::text(OCR_INSTRUCTION),
                    ContentBlock::base64_image(image.mime.as_str(), STANDARD.encode(&image.bytes)),
                ],
            }],
            temperature: 0.0,
        };

        let text = self.llm.complete(&request).await.map_err(|e| {
            if e.is_rejection() {
                AppError::Upstream(format!("OCR error: {e}"))
            } else {
                AppError::Llm(format!("OCR failed: {e}"))
            }
        })?;

        info!(
            "OCR read {} bytes of {} into {} chars",
            image.bytes.len(),
            image.mime.as_str(),
            text.len()
        );
        Ok(text.trim().to_string())
    }
}
