//! Alignment Engine: pairs resume skills with job skills and scores coverage.
//!
//! `LlmSkillAligner` asks the reasoning service for a semantic alignment (synonyms and
//! abbreviations count as matches) and falls back to `literal_alignment` on any failure.
//! Only the literal path guarantees that `matched` and `missing` partition the job skills;
//! the semantic path may paraphrase skill names and is passed through as-is.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::{strip_json_fences, ChatMessage, ChatModel, ChatRequest};
use crate::matching::prompts::ALIGN_SKILLS_SYSTEM;
use crate::matching::skills::SkillList;
use crate::matching::ReplyError;

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub matched: SkillList,
    pub missing: SkillList,
    /// In [0, 1], unrounded.
    pub score: f64,
}

#[async_trait]
pub trait SkillAligner: Send + Sync {
    async fn align(&self, resume_skills: &SkillList, job_skills: &SkillList) -> Alignment;
}

// ────────────────────────────────────────────────────────────────────────────
// LiteralSkillAligner
// ────────────────────────────────────────────────────────────────────────────

pub struct LiteralSkillAligner;

#[async_trait]
impl SkillAligner for LiteralSkillAligner {
    async fn align(&self, resume_skills: &SkillList, job_skills: &SkillList) -> Alignment {
        literal_alignment(resume_skills, job_skills)
    }
}

/// Exact string intersection, in job-skill order. Score is 0.0 for an empty job list.
pub fn literal_alignment(resume_skills: &SkillList, job_skills: &SkillList) -> Alignment {
    let (matched, missing): (Vec<&String>, Vec<&String>) = job_skills
        .iter()
        .partition(|skill| resume_skills.contains(skill));

    let score = if job_skills.is_empty() {
        0.0
    } else {
        matched.len() as f64 / job_skills.len() as f64
    };

    Alignment {
        matched: SkillList::normalized(matched),
        missing: SkillList::normalized(missing),
        score,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSkillAligner
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmSkillAligner {
    llm: Arc<dyn ChatModel>,
}

impl LlmSkillAligner {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillAligner for LlmSkillAligner {
    async fn align(&self, resume_skills: &SkillList, job_skills: &SkillList) -> Alignment {
        let request = alignment_request(resume_skills, job_skills);
        let outcome = match self.llm.complete(&request).await {
            Ok(reply) => parse_alignment(&reply),
            Err(e) => Err(ReplyError::from(e)),
        };

        match outcome {
            Ok(alignment) => alignment,
            Err(e) => {
                warn!("Skill alignment fell back to literal intersection: {e}");
                literal_alignment(resume_skills, job_skills)
            }
        }
    }
}

fn alignment_request(resume_skills: &SkillList, job_skills: &SkillList) -> ChatRequest {
    let payload = json!({
        "resume_skills": resume_skills,
        "job_skills": job_skills,
    });

    ChatRequest {
        system: Some(ALIGN_SKILLS_SYSTEM.to_string()),
        messages: vec![ChatMessage::user(payload.to_string())],
        temperature: 0.0,
    }
}

fn parse_alignment(reply: &str) -> Result<Alignment, ReplyError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))?;
    if !value.is_object() {
        return Err(ReplyError::Shape("expected a JSON object".to_string()));
    }

    Ok(Alignment {
        matched: string_list(&value, "matched")?,
        missing: string_list(&value, "missing")?,
        score: coerce_score(&value)?,
    })
}

fn string_list(value: &Value, key: &str) -> Result<SkillList, ReplyError> {
    let items = value
        .get(key)
        .ok_or_else(|| ReplyError::Shape(format!("missing key '{key}'")))?
        .as_array()
        .ok_or_else(|| ReplyError::Shape(format!("'{key}' is not an array")))?;

    let strings = items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| ReplyError::Shape(format!("'{key}' contains a non-string item")))
        })
        .collect::<Result<Vec<&str>, _>>()?;

    Ok(SkillList::normalized(strings))
}

/// Accepts a number or a numeric string. Finite values are clamped into [0, 1].
fn coerce_score(value: &Value) -> Result<f64, ReplyError> {
    let raw = value
        .get("score")
        .ok_or_else(|| ReplyError::Shape("missing key 'score'".to_string()))?;

    let score = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(|| ReplyError::Shape(format!("'score' is not a number: {raw}")))?;

    Ok(score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::ContentBlock;

    fn skills(items: &[&str]) -> SkillList {
        SkillList::normalized(items)
    }

    async fn align_with(reply: &str, resume: &SkillList, job: &SkillList) -> Alignment {
        let model = Arc::new(ScriptedModel::replying(&[reply]));
        LlmSkillAligner::new(model).align(resume, job).await
    }

    #[test]
    fn test_literal_disjoint_lists_score_zero() {
        let job = skills(&["java", "spring boot"]);
        let alignment = literal_alignment(&skills(&["python", "django"]), &job);
        assert_eq!(alignment.score, 0.0);
        assert!(alignment.matched.is_empty());
        assert_eq!(alignment.missing, job);
    }

    #[test]
    fn test_literal_same_set_scores_one() {
        let alignment = literal_alignment(
            &skills(&["docker", "rust", "sql"]),
            &skills(&["sql", "rust", "docker"]),
        );
        assert_eq!(alignment.score, 1.0);
        assert!(alignment.missing.is_empty());
        assert_eq!(alignment.matched.as_slice(), ["sql", "rust", "docker"]);
    }

    #[test]
    fn test_literal_empty_job_scores_zero() {
        let alignment = literal_alignment(&skills(&["rust"]), &SkillList::default());
        assert_eq!(alignment.score, 0.0);
        assert!(alignment.matched.is_empty());
        assert!(alignment.missing.is_empty());
    }

    #[test]
    fn test_literal_partitions_job_skills_in_order() {
        let job = skills(&["python", "java", "sql", "aws"]);
        let alignment = literal_alignment(&skills(&["aws", "python"]), &job);
        assert_eq!(alignment.matched.as_slice(), ["python", "aws"]);
        assert_eq!(alignment.missing.as_slice(), ["java", "sql"]);
        assert_eq!(alignment.score, 0.5);
    }

    #[tokio::test]
    async fn test_semantic_reply_is_used_as_is() {
        let alignment = align_with(
            r#"{"matched": ["kubernetes"], "missing": ["terraform"], "score": 0.5}"#,
            &skills(&["k8s"]),
            &skills(&["kubernetes", "terraform"]),
        )
        .await;
        assert_eq!(alignment.matched.as_slice(), ["kubernetes"]);
        assert_eq!(alignment.missing.as_slice(), ["terraform"]);
        assert_eq!(alignment.score, 0.5);
    }

    #[tokio::test]
    async fn test_semantic_reply_need_not_partition_job_skills() {
        let alignment = align_with(
            r#"{"matched": ["Container Orchestration"], "missing": [], "score": 1}"#,
            &skills(&["k8s"]),
            &skills(&["kubernetes", "helm"]),
        )
        .await;
        assert_eq!(alignment.matched.as_slice(), ["container orchestration"]);
        assert!(alignment.missing.is_empty());
        assert_eq!(alignment.score, 1.0);
    }

    #[tokio::test]
    async fn test_string_score_is_coerced() {
        let alignment = align_with(
            r#"{"matched": [], "missing": ["go"], "score": "0.25"}"#,
            &skills(&["rust"]),
            &skills(&["go"]),
        )
        .await;
        assert_eq!(alignment.score, 0.25);
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_clamped() {
        let alignment = align_with(
            r#"{"matched": ["go"], "missing": [], "score": 1.7}"#,
            &skills(&["go"]),
            &skills(&["go"]),
        )
        .await;
        assert_eq!(alignment.score, 1.0);
    }

    #[tokio::test]
    async fn test_malformed_replies_fall_back_to_literal() {
        let resume = skills(&["python", "sql"]);
        let job = skills(&["python", "java"]);
        let expected = literal_alignment(&resume, &job);

        for reply in [
            "not json at all",
            r#"["python"]"#,
            r#"{"matched": ["python"], "score": 0.9}"#,
            r#"{"matched": "python", "missing": [], "score": 0.9}"#,
            r#"{"matched": ["python", 3], "missing": [], "score": 0.9}"#,
            r#"{"matched": [], "missing": [], "score": "high"}"#,
            r#"{"matched": [], "missing": [], "score": null}"#,
        ] {
            let alignment = align_with(reply, &resume, &job).await;
            assert_eq!(alignment, expected, "reply {reply:?} should fall back");
        }
    }

    #[tokio::test]
    async fn test_service_error_falls_back_to_literal() {
        let model = Arc::new(ScriptedModel::failing(500, "boom"));
        let alignment = LlmSkillAligner::new(model.clone())
            .align(&skills(&["go"]), &skills(&["go", "c++"]))
            .await;
        assert_eq!(alignment.matched.as_slice(), ["go"]);
        assert_eq!(alignment.missing.as_slice(), ["c++"]);
        assert_eq!(alignment.score, 0.5);
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_request_sends_both_lists_as_one_payload() {
        let model = Arc::new(ScriptedModel::replying(&[
            r#"{"matched": [], "missing": [], "score": 0}"#,
        ]));
        LlmSkillAligner::new(model.clone())
            .align(&skills(&["python"]), &skills(&["java", "sql"]))
            .await;

        let requests = model.requests();
        assert_eq!(requests[0].temperature, 0.0);
        assert_eq!(requests[0].system.as_deref(), Some(ALIGN_SKILLS_SYSTEM));
        let ContentBlock::Text { text } = &requests[0].messages[0].content[0] else {
            panic!("expected a text block");
        };
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(
            payload,
            json!({"resume_skills": ["python"], "job_skills": ["java", "sql"]})
        );
    }
}
