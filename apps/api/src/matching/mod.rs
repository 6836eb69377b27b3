// Skill matching: extraction, alignment, single-match orchestration and batch ranking.
// All LLM calls go through llm_client::ChatModel; every LLM path has a deterministic fallback.

pub mod aligner;
pub mod extractor;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod ranker;
pub mod skills;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Why a reasoning-service reply could not be used. Never surfaced to clients:
/// every variant is absorbed by a local fallback and logged.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("service call failed: {0}")]
    Service(#[from] LlmError),

    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply has the wrong shape: {0}")]
    Shape(String),
}
