//! Match Orchestrator: one resume against one job description.
//!
//! extract (resume) → extract (job) → reject empty job → normalize → align → reasoning.
//! Single pass, no retries. The threshold only annotates the reasoning text.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::aligner::{Alignment, SkillAligner};
use crate::matching::extractor::SkillExtractor;
use crate::matching::skills::SkillList;

pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Caller-supplied qualification threshold in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Threshold(value))
        } else {
            Err(AppError::UnprocessableEntity(format!(
                "threshold must be between 0.0 and 1.0, got {value}"
            )))
        }
    }

    /// `None` means the caller omitted it.
    pub fn from_request(value: Option<f64>) -> Result<Self, AppError> {
        value.map_or(Ok(Threshold::default()), Threshold::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(DEFAULT_THRESHOLD)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// In [0, 1], rounded to 3 decimals.
    pub score: f64,
    pub resume_skills: SkillList,
    pub job_skills: SkillList,
    pub matched_skills: SkillList,
    pub missing_skills: SkillList,
    pub reasoning: String,
}

/// Extractor + aligner pair. Cheap to clone; shared through `AppState`.
#[derive(Clone)]
pub struct Matcher {
    extractor: Arc<dyn SkillExtractor>,
    aligner: Arc<dyn SkillAligner>,
}

impl Matcher {
    pub fn new(extractor: Arc<dyn SkillExtractor>, aligner: Arc<dyn SkillAligner>) -> Self {
        Self { extractor, aligner }
    }

    pub async fn match_resume(
        &self,
        resume_text: &str,
        job_text: &str,
        threshold: Threshold,
    ) -> Result<MatchResult, AppError> {
        let resume_skills = self.extractor.extract_skills(resume_text).await;
        let job_skills = self.extractor.extract_skills(job_text).await;

        if job_skills.is_empty() {
            return Err(AppError::Validation(
                "No skills extracted from job description.".to_string(),
            ));
        }

        let resume_skills = SkillList::normalized(&resume_skills);
        let job_skills = SkillList::normalized(&job_skills);

        let alignment = self.aligner.align(&resume_skills, &job_skills).await;
        let reasoning = build_reasoning(&alignment, job_skills.len(), threshold);

        info!(
            "Matched {} / {} job skills (score {:.3})",
            alignment.matched.len(),
            job_skills.len(),
            alignment.score
        );

        Ok(MatchResult {
            score: round_score(alignment.score),
            resume_skills,
            job_skills,
            matched_skills: alignment.matched,
            missing_skills: alignment.missing,
            reasoning,
        })
    }
}

/// e.g. "1 / 2 skills matched (50.0%). Matched: python. Missing: java. Below threshold 0.80."
pub fn build_reasoning(alignment: &Alignment, job_skill_count: usize, threshold: Threshold) -> String {
    let mut reasoning = format!(
        "{} / {} skills matched ({:.1}%). Matched: {}. Missing: {}.",
        alignment.matched.len(),
        job_skill_count,
        alignment.score * 100.0,
        alignment.matched.display_joined(),
        alignment.missing.display_joined(),
    );

    if alignment.score < threshold.value() {
        reasoning.push_str(&format!(" Below threshold {:.2}.", threshold.value()));
    }

    reasoning
}

/// Rounds half to even on the decimal value, so 0.0625 becomes 0.062 and agrees
/// with the `{:.1}` percentage in the reasoning text.
fn round_score(score: f64) -> f64 {
    format!("{score:.3}").parse().unwrap_or(score)
}
