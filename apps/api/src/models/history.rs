use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// A persisted record of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_preview: Option<String>,
}

/// Everything a history entry carries except the id and timestamp,
/// which the repository assigns on append.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub job_title: String,
    pub company_name: String,
    pub questions: Vec<Question>,
    pub resume_preview: Option<String>,
}
