//! Question sources: the transport port the generator calls through.
//!
//! The implementation is picked from configuration at startup:
//! `LlmQuestionSource` talks to the model directly, `RouteQuestionSource`
//! goes through a deployed instance's `/api/generate-questions` route.
//! Neither ever fails: transport and parse errors become the fallback set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::LlmClient;
use crate::models::question::{GenerationRequest, Question};
use crate::questions::fallback::fallback_for;
use crate::questions::normalizer::normalize_questions;
use crate::questions::prompts::{build_question_prompt, QUESTION_SYSTEM};

#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate_questions(&self, request: &GenerationRequest) -> Vec<Question>;
}

/// Calls the generative-text endpoint and normalizes its reply.
pub struct LlmQuestionSource {
    llm: LlmClient,
}

impl LlmQuestionSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionSource for LlmQuestionSource {
    async fn generate_questions(&self, request: &GenerationRequest) -> Vec<Question> {
        let prompt = build_question_prompt(request);
        info!(
            "Requesting {} questions from {}",
            request.question_count,
            self.llm.model()
        );

        match self.llm.call_text(QUESTION_SYSTEM, &prompt).await {
            Ok(content) => normalize_questions(&content, request.question_count),
            Err(e) => {
                warn!("Question generation failed, using fallback set: {e}");
                fallback_for(request.question_count)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct RouteErrorBody {
    error: Option<String>,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Route returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// Posts the request to a remote `/api/generate-questions` route.
pub struct RouteQuestionSource {
    client: Client,
    endpoint: String,
}

impl RouteQuestionSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/api/generate-questions", base_url.trim_end_matches('/')),
        })
    }

    async fn request(&self, request: &GenerationRequest) -> Result<Vec<Question>, RouteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<RouteErrorBody>()
                .await
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| "Question generation failed".to_string());
            return Err(RouteError::Status { status, message });
        }

        Ok(response.json::<RouteResponse>().await?.questions)
    }
}

#[async_trait]
impl QuestionSource for RouteQuestionSource {
    async fn generate_questions(&self, request: &GenerationRequest) -> Vec<Question> {
        info!("Requesting questions from {}", self.endpoint);
        match self.request(request).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Question route call failed, using fallback set: {e}");
                fallback_for(request.question_count)
            }
        }
    }
}
