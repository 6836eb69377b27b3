//! Batch Ranker: many resumes against one job description.
//!
//! Candidates are processed sequentially in input order. Any candidate failure
//! fails the whole batch; no partial results are returned.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::orchestrator::{MatchResult, Matcher, Threshold};
use crate::ocr::{ImageUpload, TextRecognizer};

pub const UNKNOWN_CANDIDATE: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Index-aligned with the input resumes.
    pub results: Vec<MatchResult>,
    pub best_match_index: usize,
    pub best_match_name: String,
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// First non-blank line of the resume, trimmed. Any Unicode line break ends a line,
/// including a lone `\r`.
pub fn candidate_name(resume_text: &str) -> String {
    resume_text
        .split(is_line_break)
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(UNKNOWN_CANDIDATE)
        .to_string()
}

/// Index of the highest score; the lowest index wins ties. `None` for an empty slice.
pub fn best_match_index(results: &[MatchResult]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, result) in results.iter().enumerate() {
        match best {
            Some((_, best_score)) if result.score <= best_score => {}
            _ => best = Some((index, result.score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Collects per-candidate results in order and picks the winner at the end.
#[derive(Default)]
struct Ranking {
    names: Vec<String>,
    results: Vec<MatchResult>,
}

impl Ranking {
    fn push(&mut self, name: String, result: MatchResult) {
        self.names.push(name);
        self.results.push(result);
    }

    fn finish(self) -> Result<BatchResult, AppError> {
        let best = best_match_index(&self.results)
            .ok_or_else(|| AppError::Validation("At least one resume is required.".to_string()))?;
        let best_match_name = self.names[best].clone();

        info!(
            "Ranked {} candidates; best is #{} ({}) with score {:.3}",
            self.results.len(),
            best,
            best_match_name,
            self.results[best].score
        );

        Ok(BatchResult {
            results: self.results,
            best_match_index: best,
            best_match_name,
        })
    }
}

pub async fn rank_texts(
    matcher: &Matcher,
    resume_texts: &[String],
    job_text: &str,
    threshold: Threshold,
) -> Result<BatchResult, AppError> {
    if resume_texts.is_empty() {
        return Err(AppError::Validation(
            "At least one resume is required.".to_string(),
        ));
    }

    let mut ranking = Ranking::default();
    for resume_text in resume_texts {
        let result = matcher.match_resume(resume_text, job_text, threshold).await?;
        ranking.push(candidate_name(resume_text), result);
    }
    ranking.finish()
}

/// OCRs the job image once, then each resume image in turn.
pub async fn rank_images(
    matcher: &Matcher,
    recognizer: &dyn TextRecognizer,
    resumes: &[ImageUpload],
    job: &ImageUpload,
    threshold: Threshold,
) -> Result<BatchResult, AppError> {
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "At least one resume image is required.".to_string(),
        ));
    }

    let job_text = recognizer.recognize(job).await?;

    let mut ranking = Ranking::default();
    for resume in resumes {
        let resume_text = recognizer.recognize(resume).await?;
        let result = matcher
            .match_resume(&resume_text, &job_text, threshold)
            .await?;
        ranking.push(candidate_name(&resume_text), result);
    }
    ranking.finish()
}
