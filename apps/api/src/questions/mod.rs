// Interview question generation.
// Implements: response normalization, fallback set, transports, orchestration.
// All model calls go through llm_client via LlmQuestionSource.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod source;
