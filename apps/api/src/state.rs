use std::sync::Arc;

use crate::config::Config;
use crate::matching::orchestrator::Matcher;
use crate::ocr::TextRecognizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor + aligner backends. LLM-backed by default; keyword/literal via ENABLE_LLM_MATCHING.
    pub matcher: Matcher,
    pub recognizer: Arc<dyn TextRecognizer>,
}
