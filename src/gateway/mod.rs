//! User-scoped persistence of mood, journal and settings records.
//!
//! Every operation receives the caller's [`Session`] explicitly and rejects
//! anonymous sessions before touching the backing store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::dashboard::day_bounds;
use crate::models::journal_entry::{JournalEntry, NewJournalEntry};
use crate::models::mood_entry::{MoodEntry, NewMoodEntry};
use crate::models::prompt::Prompt;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};
use crate::relay::RelayError;

pub mod memory;
pub mod postgres;
pub mod relay;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;
pub use relay::RelayGateway;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Prompt lookup failed: {0}")]
    PromptLookup(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Identity under which a gateway call runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<Uuid>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The acting user, or `Unauthenticated` for an anonymous session
    pub fn user_id(&self) -> GatewayResult<Uuid> {
        self.user_id.ok_or(GatewayError::Unauthenticated)
    }

    /// The acting user, provided it is `owner`
    pub fn owner(&self, owner: Uuid) -> GatewayResult<Uuid> {
        match self.user_id()? {
            user_id if user_id == owner => Ok(user_id),
            _ => Err(GatewayError::Unauthenticated),
        }
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Insert a mood entry owned by the session user
    async fn create_mood_entry(
        &self,
        session: &Session,
        entry: NewMoodEntry,
    ) -> GatewayResult<MoodEntry>;

    /// Resolve the prompt text by code and insert a journal entry.
    ///
    /// Unknown codes fail with `PromptLookup`.
    async fn create_journal_entry(
        &self,
        session: &Session,
        entry: NewJournalEntry,
    ) -> GatewayResult<JournalEntry>;

    /// Keep a mood entry that another service already created, keyed by its
    /// id. A stored row with the same id is left as is.
    async fn import_mood_entry(
        &self,
        session: &Session,
        entry: MoodEntry,
    ) -> GatewayResult<MoodEntry>;

    async fn import_journal_entry(
        &self,
        session: &Session,
        entry: JournalEntry,
    ) -> GatewayResult<JournalEntry>;

    /// Most recent mood entry by `created_at`
    async fn latest_mood_entry(&self, session: &Session) -> GatewayResult<Option<MoodEntry>>;

    /// Mood entries with `from <= created_at < to`, newest first. Open bounds
    /// are unrestricted.
    async fn mood_entries_between(
        &self,
        session: &Session,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> GatewayResult<Vec<MoodEntry>>;

    /// Journal entries, newest first
    async fn journal_entries(&self, session: &Session) -> GatewayResult<Vec<JournalEntry>>;

    /// Reference data, readable without a session
    async fn find_prompt(&self, code: &str) -> GatewayResult<Option<Prompt>>;

    async fn user_settings(&self, session: &Session) -> GatewayResult<Option<UserSettings>>;

    /// Create or merge the session user's settings row
    async fn upsert_user_settings(
        &self,
        session: &Session,
        patch: UpsertSettingsRequest,
    ) -> GatewayResult<UserSettings>;

    /// Entries created during the current local calendar day.
    ///
    /// The day boundary comes from the server's wall clock and time zone,
    /// not UTC.
    async fn today_mood_entries(&self, session: &Session) -> GatewayResult<Vec<MoodEntry>> {
        session.user_id()?;
        let (start, end) = day_bounds(&Local, Local::now().date_naive());
        self.mood_entries_between(session, Some(start), Some(end))
            .await
    }
}

pub type SharedGateway = Arc<dyn PersistenceGateway>;
