//! Axum route handlers for the matching API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::orchestrator::{MatchResult, Threshold};
use crate::matching::ranker::{rank_images, rank_texts, BatchResult};
use crate::ocr::{ImageMime, ImageUpload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchTextRequest {
    pub resume_text: String,
    pub job_text: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MatchTextMultipleRequest {
    pub resume_texts: Vec<String>,
    pub job_text: String,
    pub threshold: Option<f64>,
}

/// Fields of the image routes, gathered from a multipart body.
#[derive(Debug, Default)]
struct ImageForm {
    resume_file: Option<ImageUpload>,
    resume_files: Vec<ImageUpload>,
    job_file: Option<ImageUpload>,
    threshold: Option<f64>,
}

impl ImageForm {
    /// Reads the whole body. Every file's MIME type is validated here, before any OCR call.
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "resume_file" | "resume_files" | "job_file" => {
                    let mime = ImageMime::from_content_type(field.content_type())?;
                    let bytes = field.bytes().await?;
                    let upload = ImageUpload { mime, bytes };
                    match name.as_str() {
                        "resume_file" => form.resume_file = Some(upload),
                        "resume_files" => form.resume_files.push(upload),
                        _ => form.job_file = Some(upload),
                    }
                }
                "threshold" => {
                    let raw = field.text().await?;
                    let value = raw.trim().parse::<f64>().map_err(|_| {
                        AppError::UnprocessableEntity(format!(
                            "threshold must be a number, got '{raw}'"
                        ))
                    })?;
                    form.threshold = Some(value);
                }
                other => {
                    tracing::debug!("Ignoring unexpected multipart field '{other}'");
                }
            }
        }

        Ok(form)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::UnprocessableEntity(format!("Missing required multipart field '{field}'"))
    })
}

fn require_job_text(job_text: &str) -> Result<(), AppError> {
    if job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /match-text
pub async fn handle_match_text(
    State(state): State<AppState>,
    Json(request): Json<MatchTextRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let threshold = Threshold::from_request(request.threshold)?;
    require_job_text(&request.job_text)?;

    let result = state
        .matcher
        .match_resume(&request.resume_text, &request.job_text, threshold)
        .await?;

    Ok(Json(result))
}

/// POST /match-image
///
/// multipart: resume_file, job_file (image/jpeg or image/png), threshold?
pub async fn handle_match_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let form = ImageForm::read(multipart).await?;
    let threshold = Threshold::from_request(form.threshold)?;
    let resume = required(form.resume_file, "resume_file")?;
    let job = required(form.job_file, "job_file")?;

    let resume_text = state.recognizer.recognize(&resume).await?;
    let job_text = state.recognizer.recognize(&job).await?;

    let result = state
        .matcher
        .match_resume(&resume_text, &job_text, threshold)
        .await?;

    Ok(Json(result))
}

/// POST /match-text-multiple
pub async fn handle_match_text_multiple(
    State(state): State<AppState>,
    Json(request): Json<MatchTextMultipleRequest>,
) -> Result<Json<BatchResult>, AppError> {
    let threshold = Threshold::from_request(request.threshold)?;
    require_job_text(&request.job_text)?;
    info!("Ranking {} text resumes", request.resume_texts.len());

    let batch = rank_texts(
        &state.matcher,
        &request.resume_texts,
        &request.job_text,
        threshold,
    )
    .await?;

    Ok(Json(batch))
}

/// POST /match-image-multiple
///
/// multipart: resume_files (repeated, ≥1), job_file, threshold?
pub async fn handle_match_image_multiple(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResult>, AppError> {
    let form = ImageForm::read(multipart).await?;
    let threshold = Threshold::from_request(form.threshold)?;
    let job = required(form.job_file, "job_file")?;
    if form.resume_files.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Missing required multipart field 'resume_files'".to_string(),
        ));
    }
    info!("Ranking {} resume images", form.resume_files.len());

    let batch = rank_images(
        &state.matcher,
        state.recognizer.as_ref(),
        &form.resume_files,
        &job,
        threshold,
    )
    .await?;

    Ok(Json(batch))
}
