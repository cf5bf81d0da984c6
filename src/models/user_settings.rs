use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub record_frequency: RecordFrequency,
    pub reminder_enabled: bool,
    pub reminder_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "record_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordFrequency {
    Once,
    Multiple,
}

impl Default for RecordFrequency {
    fn default() -> Self {
        Self::Once
    }
}

/// PUT /api/me/settings. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettingsRequest {
    pub record_frequency: Option<RecordFrequency>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<NaiveTime>,
}
