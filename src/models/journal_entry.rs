use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt_id: Option<String>,
    /// Prompt text as shown when the entry was written
    pub prompt: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJournalEntry {
    pub(crate) prompt_code: String,
    pub(crate) content: String,
}

impl NewJournalEntry {
    pub fn prompt_code(&self) -> &str {
        &self.prompt_code
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// POST /api/journal and /api/external/journal
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSubmission {
    pub user_id: Option<String>,
    pub prompt_id: Option<String>,
    pub answer: Option<String>,
}

/// POST /api/me/journal
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalRequest {
    #[validate(length(min = 1, message = "Prompt code is required"))]
    pub prompt_code: String,

    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,
}
