//! Gateway that sends writes through the upstream record API.
//!
//! The upstream service only accepts new records. Each record it returns is
//! copied into the wrapped gateway, which serves reads and settings, so a
//! write is visible to the reads that follow it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::models::journal_entry::{JournalEntry, NewJournalEntry};
use crate::models::mood_entry::{MoodEntry, NewMoodEntry};
use crate::models::prompt::Prompt;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};
use crate::relay::{RelayClient, RelayError, RelayJournalBody, RelayMoodBody};

use super::{GatewayResult, PersistenceGateway, Session, SharedGateway};

pub struct RelayGateway {
    relay: RelayClient,
    local: SharedGateway,
}

impl RelayGateway {
    pub fn new(relay: RelayClient, local: SharedGateway) -> Self {
        Self { relay, local }
    }
}

/// Pull the stored record out of the upstream `{status, message, data}` envelope
fn record_from<T: DeserializeOwned>(mut body: Value) -> Result<T, RelayError> {
    let data = body
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| RelayError::UnexpectedPayload("missing `data`".into()))?;

    serde_json::from_value(data).map_err(|e| RelayError::UnexpectedPayload(e.to_string()))
}

fn check_owner(record_owner: Uuid, user_id: Uuid) -> Result<(), RelayError> {
    if record_owner == user_id {
        Ok(())
    } else {
        Err(RelayError::UnexpectedPayload(
            "upstream returned a record for another user".into(),
        ))
    }
}

#[async_trait]
impl PersistenceGateway for RelayGateway {
    async fn create_mood_entry(
        &self,
        session: &Session,
        entry: NewMoodEntry,
    ) -> GatewayResult<MoodEntry> {
        let user_id = session.user_id()?;

        let body = RelayMoodBody {
            user_id: user_id.to_string(),
            mood_id: entry.mood_level,
            stress_level: entry.stress_level,
            memo: entry.memo,
        };
        let response = self.relay.save_mood_entry(&body).await?;

        let stored: MoodEntry = record_from(response)?;
        check_owner(stored.user_id, user_id)?;
        self.local.import_mood_entry(session, stored).await
    }

    async fn create_journal_entry(
        &self,
        session: &Session,
        entry: NewJournalEntry,
    ) -> GatewayResult<JournalEntry> {
        let user_id = session.user_id()?;

        let body = RelayJournalBody {
            user_id: user_id.to_string(),
            prompt_id: entry.prompt_code,
            answer: entry.content,
        };
        let response = self.relay.save_journal_entry(&body).await?;

        let stored: JournalEntry = record_from(response)?;
        check_owner(stored.user_id, user_id)?;
        self.local.import_journal_entry(session, stored).await
    }

    async fn import_mood_entry(
        &self,
        session: &Session,
        entry: MoodEntry,
    ) -> GatewayResult<MoodEntry> {
        self.local.import_mood_entry(session, entry).await
    }

    async fn import_journal_entry(
        &self,
        session: &Session,
        entry: JournalEntry,
    ) -> GatewayResult<JournalEntry> {
        self.local.import_journal_entry(session, entry).await
    }

    async fn latest_mood_entry(&self, session: &Session) -> GatewayResult<Option<MoodEntry>> {
        self.local.latest_mood_entry(session).await
    }

    async fn mood_entries_between(
        &self,
        session: &Session,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> GatewayResult<Vec<MoodEntry>> {
        self.local.mood_entries_between(session, from, to).await
    }

    async fn journal_entries(&self, session: &Session) -> GatewayResult<Vec<JournalEntry>> {
        self.local.journal_entries(session).await
    }

    async fn find_prompt(&self, code: &str) -> GatewayResult<Option<Prompt>> {
        self.local.find_prompt(code).await
    }

    async fn user_settings(&self, session: &Session) -> GatewayResult<Option<UserSettings>> {
        self.local.user_settings(session).await
    }

    async fn upsert_user_settings(
        &self,
        session: &Session,
        patch: UpsertSettingsRequest,
    ) -> GatewayResult<UserSettings> {
        self.local.upsert_user_settings(session, patch).await
    }
}
