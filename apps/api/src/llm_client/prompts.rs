// Shared prompt fragments. Each caller keeps its own prompts.rs alongside it.

/// Output-format instruction demanding a bare JSON array of question records.
pub const QUESTION_ARRAY_FORMAT: &str = r#"Return a JSON array in exactly this format:
[
  {
    "id": "unique identifier",
    "text": "question text",
    "category": "technical | behavioral | position-related"
  }
]"#;
