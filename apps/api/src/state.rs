use std::sync::Arc;

use crate::history::HistoryRepository;
use crate::questions::generator::QuestionGenerator;
use crate::questions::source::QuestionSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Direct model transport backing `POST /api/generate-questions`.
    pub llm_source: Arc<dyn QuestionSource>,
    /// Full pipeline; its transport is chosen by `QUESTION_TRANSPORT`.
    pub generator: Arc<QuestionGenerator>,
    pub history: HistoryRepository,
}
