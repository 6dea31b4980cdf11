use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::history::store::DEFAULT_HISTORY_KEY;
use crate::llm_client::{LlmSettings, DEFAULT_API_URL, DEFAULT_MODEL};

/// How the generation pipeline reaches the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionTransport {
    /// Call the model endpoint in-process.
    Direct,
    /// POST to a deployed `/api/generate-questions` route.
    Internal { base_url: String },
}

impl QuestionTransport {
    fn parse(mode: Option<&str>, internal_url: Option<String>) -> Result<Self> {
        match mode.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("direct") => Ok(Self::Direct),
            Some("internal") => {
                let base_url = internal_url
                    .filter(|url| !url.trim().is_empty())
                    .context("INTERNAL_API_URL must be set when QUESTION_TRANSPORT=internal")?;
                Ok(Self::Internal {
                    base_url: base_url.trim_end_matches('/').to_string(),
                })
            }
            Some(other) => bail!("QUESTION_TRANSPORT must be 'direct' or 'internal', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub transport: QuestionTransport,
    /// Unset keeps history in process memory.
    pub redis_url: Option<String>,
    pub history_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_api_url: env_or("LLM_API_URL", DEFAULT_API_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_MODEL),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            transport: QuestionTransport::parse(
                std::env::var("QUESTION_TRANSPORT").ok().as_deref(),
                std::env::var("INTERNAL_API_URL").ok(),
            )?,
            redis_url: std::env::var("REDIS_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            history_key: env_or("HISTORY_KEY", DEFAULT_HISTORY_KEY),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.llm_api_key.clone(),
            api_url: self.llm_api_url.clone(),
            model: self.llm_model.clone(),
            timeout: self.llm_timeout(),
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
