use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::display::Period;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_level: i32,
    pub stress_level: i32,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A mood observation that already passed range validation.
///
/// Only `validation` constructs it, so every value reaching a gateway holds
/// `mood_level` in 1..=5 and `stress_level` in 1..=10.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub(crate) mood_level: i32,
    pub(crate) stress_level: i32,
    pub(crate) memo: Option<String>,
}

impl NewMoodEntry {
    pub fn mood_level(&self) -> i32 {
        self.mood_level
    }

    pub fn stress_level(&self) -> i32 {
        self.stress_level
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}

/// Level as submitted by a client: `3`, `3.0` or `"3"` are all accepted on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LevelInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// POST /api/mood and /api/external/mood
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSubmission {
    pub user_id: Option<String>,
    pub mood_id: Option<LevelInput>,
    pub stress_level: Option<LevelInput>,
    pub memo: Option<String>,
}

/// POST /api/me/mood
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodRequest {
    #[validate(range(min = 1, max = 5, message = "Mood level must be between 1 and 5"))]
    pub mood_level: i32,

    #[validate(range(min = 1, max = 10, message = "Stress level must be between 1 and 10"))]
    pub stress_level: i32,

    #[validate(length(max = 200, message = "Memo must be at most 200 characters"))]
    pub memo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoodHistoryQuery {
    pub period: Option<Period>,
}
