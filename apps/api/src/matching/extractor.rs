//! Skill Extractor: turns free-form resume or job text into a `SkillList`.
//!
//! Default: `LlmSkillExtractor` (few-shot prompt, one call, keyword fallback).
//! `KeywordSkillExtractor` is the fallback on its own: deterministic, no external calls.
//!
//! `Matcher` holds an `Arc<dyn SkillExtractor>`, swapped at startup via config.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, ChatMessage, ChatModel, ChatRequest};
use crate::matching::prompts::{
    EXTRACT_SKILLS_EXAMPLES, EXTRACT_SKILLS_PREFIX, EXTRACT_SKILLS_SYSTEM,
};
use crate::matching::skills::SkillList;
use crate::matching::ReplyError;

/// Letter first, then at least two more of `[A-Za-z0-9.+/#-]`.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z][a-zA-Z0-9.+/#\-]{2,}").unwrap());

/// Boilerplate that survives tokenization but is never a skill.
const NOISE_WORDS: &[&str] = &[
    "professional",
    "experience",
    "resume",
    "worded",
    "linkedin",
    "com",
    "first",
    "last",
    "new",
    "york",
];

const MAX_TOKEN_LEN: usize = 30;
const MAX_FALLBACK_SKILLS: usize = 20;

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Never fails: implementations absorb service problems into a fallback.
    async fn extract_skills(&self, text: &str) -> SkillList;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSkillExtractor
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordSkillExtractor;

#[async_trait]
impl SkillExtractor for KeywordSkillExtractor {
    async fn extract_skills(&self, text: &str) -> SkillList {
        keyword_skills(text)
    }
}

/// Deterministic tokenizer fallback.
///
/// 1. Take every regex token (`TOKEN_PATTERN`), lowercased
/// 2. Drop noise words and tokens of `MAX_TOKEN_LEN` characters or more
/// 3. Deduplicate in first-seen order, keep the first `MAX_FALLBACK_SKILLS`
pub fn keyword_skills(text: &str) -> SkillList {
    let mut seen = HashSet::new();
    let tokens: Vec<String> = TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| token.len() < MAX_TOKEN_LEN && !NOISE_WORDS.contains(&token.as_str()))
        .filter(|token| seen.insert(token.clone()))
        .take(MAX_FALLBACK_SKILLS)
        .collect();

    debug!("Keyword fallback produced {} skill tokens", tokens.len());
    SkillList::normalized(tokens)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSkillExtractor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmSkillExtractor {
    llm: Arc<dyn ChatModel>,
}

impl LlmSkillExtractor {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract_skills(&self, text: &str) -> SkillList {
        let request = extraction_request(text);
        let outcome = match self.llm.complete(&request).await {
            Ok(reply) => parse_skill_array(&reply),
            Err(e) => Err(ReplyError::from(e)),
        };

        match outcome {
            Ok(skills) => skills,
            Err(e) => {
                warn!("Skill extraction fell back to keyword heuristic: {e}");
                keyword_skills(text)
            }
        }
    }
}

/// System instruction, both few-shot exchanges, then the real text. Temperature 0.
fn extraction_request(text: &str) -> ChatRequest {
    let mut messages = Vec::with_capacity(EXTRACT_SKILLS_EXAMPLES.len() * 2 + 1);
    for (example, expected) in EXTRACT_SKILLS_EXAMPLES {
        messages.push(ChatMessage::user(format!("{EXTRACT_SKILLS_PREFIX}{example}")));
        messages.push(ChatMessage::assistant(*expected));
    }
    messages.push(ChatMessage::user(format!("{EXTRACT_SKILLS_PREFIX}{text}")));

    ChatRequest {
        system: Some(EXTRACT_SKILLS_SYSTEM.to_string()),
        messages,
        temperature: 0.0,
    }
}

/// Accepts a bare JSON array; non-string elements are skipped.
fn parse_skill_array(reply: &str) -> Result<SkillList, ReplyError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))?;
    let items = value
        .as_array()
        .ok_or_else(|| ReplyError::Shape("expected a JSON array of skills".to_string()))?;
    Ok(SkillList::normalized(items.iter().filter_map(Value::as_str)))
}
