//! Process-local store, used without a configured database and by the tests.
//!
//! Contents are lost on shutdown.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::journal_entry::{JournalEntry, NewJournalEntry};
use crate::models::mood_entry::{MoodEntry, NewMoodEntry};
use crate::models::prompt::{Prompt, JOURNAL_PROMPTS};
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};

use super::{GatewayError, GatewayResult, PersistenceGateway, Session};

#[derive(Default)]
struct Tables {
    mood_entries: Vec<MoodEntry>,
    journal_entries: Vec<JournalEntry>,
    prompts: HashMap<String, Prompt>,
    settings: HashMap<Uuid, UserSettings>,
}

#[derive(Clone)]
pub struct MemoryGateway {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryGateway {
    /// Empty store with the static prompt list loaded
    pub fn new() -> Self {
        let prompts = JOURNAL_PROMPTS
            .iter()
            .map(|seed| (seed.code.to_string(), Prompt::from(seed)))
            .collect();

        Self {
            tables: Arc::new(Mutex::new(Tables {
                prompts,
                ..Tables::default()
            })),
        }
    }

    #[cfg(test)]
    pub async fn mood_entry_count(&self) -> usize {
        self.tables.lock().await.mood_entries.len()
    }

    #[cfg(test)]
    pub async fn journal_entry_count(&self) -> usize {
        self.tables.lock().await.journal_entries.len()
    }

    /// Insert with an explicit timestamp, bypassing the clock
    #[cfg(test)]
    pub async fn insert_mood_entry_at(
        &self,
        user_id: Uuid,
        entry: NewMoodEntry,
        created_at: DateTime<Utc>,
    ) -> MoodEntry {
        let row = MoodEntry {
            id: Uuid::new_v4(),
            user_id,
            mood_level: entry.mood_level,
            stress_level: entry.stress_level,
            memo: entry.memo,
            created_at,
        };
        self.tables.lock().await.mood_entries.push(row.clone());
        row
    }
}

/// Newest first; on equal timestamps the later insert wins
fn newest_first<T>(
    rows: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
    rows
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn create_mood_entry(
        &self,
        session: &Session,
        entry: NewMoodEntry,
    ) -> GatewayResult<MoodEntry> {
        let user_id = session.user_id()?;

        let row = MoodEntry {
            id: Uuid::new_v4(),
            user_id,
            mood_level: entry.mood_level,
            stress_level: entry.stress_level,
            memo: entry.memo,
            created_at: Utc::now(),
        };

        self.tables.lock().await.mood_entries.push(row.clone());

        Ok(row)
    }

    async fn create_journal_entry(
        &self,
        session: &Session,
        entry: NewJournalEntry,
    ) -> GatewayResult<JournalEntry> {
        let user_id = session.user_id()?;

        let mut tables = self.tables.lock().await;

        let prompt = tables
            .prompts
            .get(&entry.prompt_code)
            .map(|p| p.prompt.clone())
            .ok_or_else(|| {
                GatewayError::PromptLookup(format!("Unknown prompt code: {}", entry.prompt_code))
            })?;

        let row = JournalEntry {
            id: Uuid::new_v4(),
            user_id,
            prompt_id: Some(entry.prompt_code),
            prompt,
            content: entry.content,
            created_at: Utc::now(),
        };
        tables.journal_entries.push(row.clone());

        Ok(row)
    }

    async fn import_mood_entry(
        &self,
        session: &Session,
        entry: MoodEntry,
    ) -> GatewayResult<MoodEntry> {
        session.owner(entry.user_id)?;

        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.mood_entries.iter().find(|e| e.id == entry.id) {
            return Ok(existing.clone());
        }
        tables.mood_entries.push(entry.clone());

        Ok(entry)
    }

    async fn import_journal_entry(
        &self,
        session: &Session,
        entry: JournalEntry,
    ) -> GatewayResult<JournalEntry> {
        session.owner(entry.user_id)?;

        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.journal_entries.iter().find(|e| e.id == entry.id) {
            return Ok(existing.clone());
        }
        tables.journal_entries.push(entry.clone());

        Ok(entry)
    }

    async fn latest_mood_entry(&self, session: &Session) -> GatewayResult<Option<MoodEntry>> {
        Ok(self
            .mood_entries_between(session, None, None)
            .await?
            .into_iter()
            .next())
    }

    async fn mood_entries_between(
        &self,
        session: &Session,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> GatewayResult<Vec<MoodEntry>> {
        let user_id = session.user_id()?;

        let tables = self.tables.lock().await;
        let rows = tables.mood_entries.iter().filter(|e| {
            e.user_id == user_id
                && from.map_or(true, |from| e.created_at >= from)
                && to.map_or(true, |to| e.created_at < to)
        });

        Ok(newest_first(rows.cloned(), |e| e.created_at))
    }

    async fn journal_entries(&self, session: &Session) -> GatewayResult<Vec<JournalEntry>> {
        let user_id = session.user_id()?;

        let tables = self.tables.lock().await;
        let rows = tables
            .journal_entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned();

        Ok(newest_first(rows, |e| e.created_at))
    }

    async fn find_prompt(&self, code: &str) -> GatewayResult<Option<Prompt>> {
        Ok(self.tables.lock().await.prompts.get(code).cloned())
    }

    async fn user_settings(&self, session: &Session) -> GatewayResult<Option<UserSettings>> {
        let user_id = session.user_id()?;
        Ok(self.tables.lock().await.settings.get(&user_id).cloned())
    }

    async fn upsert_user_settings(
        &self,
        session: &Session,
        patch: UpsertSettingsRequest,
    ) -> GatewayResult<UserSettings> {
        let user_id = session.user_id()?;
        let now = Utc::now();

        let mut tables = self.tables.lock().await;
        let settings = tables.settings.entry(user_id).or_insert_with(|| UserSettings {
            id: Uuid::new_v4(),
            user_id,
            record_frequency: Default::default(),
            reminder_enabled: false,
            reminder_time: None,
            created_at: now,
            updated_at: now,
        });

        if let Some(frequency) = patch.record_frequency {
            settings.record_frequency = frequency;
        }
        if let Some(enabled) = patch.reminder_enabled {
            settings.reminder_enabled = enabled;
        }
        if let Some(time) = patch.reminder_time {
            settings.reminder_time = Some(time);
        }
        settings.updated_at = now;

        Ok(settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::day_bounds;
    use crate::models::user_settings::RecordFrequency;
    use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

    fn entry(mood: i64, stress: i64, memo: Option<&str>) -> NewMoodEntry {
        NewMoodEntry::new(mood, stress, memo.map(String::from)).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_latest_round_trip() {
        let gateway = MemoryGateway::new();
        let session = Session::for_user(Uuid::new_v4());

        let created = gateway
            .create_mood_entry(&session, entry(4, 7, Some("walked outside")))
            .await
            .unwrap();
        assert_eq!(created.mood_level, 4);
        assert_eq!(created.stress_level, 7);

        let latest = gateway.latest_mood_entry(&session).await.unwrap().unwrap();
        assert_eq!(latest, created);
        assert_eq!(latest.memo.as_deref(), Some("walked outside"));
    }

    #[tokio::test]
    async fn test_latest_is_none_without_entries() {
        let gateway = MemoryGateway::new();
        let session = Session::for_user(Uuid::new_v4());
        assert!(gateway.latest_mood_entry(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_anonymous_session_writes_nothing() {
        let gateway = MemoryGateway::new();
        let anonymous = Session::anonymous();

        let err = gateway
            .create_mood_entry(&anonymous, entry(3, 3, None))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated));

        let journal = NewJournalEntry::new("smile", "text").unwrap();
        let err = gateway
            .create_journal_entry(&anonymous, journal)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated));

        assert!(matches!(
            gateway.upsert_user_settings(&anonymous, Default::default()).await,
            Err(GatewayError::Unauthenticated)
        ));
        assert!(matches!(
            gateway.latest_mood_entry(&anonymous).await,
            Err(GatewayError::Unauthenticated)
        ));
        assert!(matches!(
            gateway.today_mood_entries(&anonymous).await,
            Err(GatewayError::Unauthenticated)
        ));

        assert_eq!(gateway.mood_entry_count().await, 0);
        assert_eq!(gateway.journal_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_entries_are_scoped_to_user() {
        let gateway = MemoryGateway::new();
        let alice = Session::for_user(Uuid::new_v4());
        let bob = Session::for_user(Uuid::new_v4());

        gateway.create_mood_entry(&alice, entry(2, 8, None)).await.unwrap();

        assert!(gateway.latest_mood_entry(&bob).await.unwrap().is_none());
        assert_eq!(
            gateway
                .mood_entries_between(&alice, None, None)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_day_window_boundaries() {
        let gateway = MemoryGateway::new();
        let user = Uuid::new_v4();
        let session = Session::for_user(user);

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let (start, end) = day_bounds(&tokyo, today);

        let at = |h, m, s| {
            tokyo
                .with_ymd_and_hms(2026, 10, 18, h, m, s)
                .unwrap()
                .with_timezone(&Utc)
        };
        let last_second_yesterday = at(0, 0, 0) - Duration::seconds(1);

        gateway
            .insert_mood_entry_at(user, entry(1, 1, Some("yesterday")), last_second_yesterday)
            .await;
        gateway
            .insert_mood_entry_at(user, entry(2, 2, Some("midnight")), at(0, 0, 0))
            .await;
        gateway
            .insert_mood_entry_at(user, entry(3, 3, Some("evening")), at(23, 59, 59))
            .await;
        gateway
            .insert_mood_entry_at(user, entry(4, 4, Some("tomorrow")), end)
            .await;

        let today_entries = gateway
            .mood_entries_between(&session, Some(start), Some(end))
            .await
            .unwrap();
        let memos: Vec<_> = today_entries
            .iter()
            .map(|e| e.memo.as_deref().unwrap())
            .collect();
        assert_eq!(memos, vec!["evening", "midnight"]);
    }

    #[tokio::test]
    async fn test_today_entries_exclude_other_days() {
        let gateway = MemoryGateway::new();
        let user = Uuid::new_v4();
        let session = Session::for_user(user);

        gateway
            .insert_mood_entry_at(user, entry(1, 1, None), Utc::now() - Duration::days(3))
            .await;
        let fresh = gateway.create_mood_entry(&session, entry(5, 2, None)).await.unwrap();

        let today = gateway.today_mood_entries(&session).await.unwrap();
        assert_eq!(today, vec![fresh]);
    }

    #[tokio::test]
    async fn test_journal_entry_resolves_prompt_text() {
        let gateway = MemoryGateway::new();
        let session = Session::for_user(Uuid::new_v4());

        let created = gateway
            .create_journal_entry(&session, NewJournalEntry::new("gratitude", "coffee").unwrap())
            .await
            .unwrap();
        assert_eq!(created.prompt, "今日感謝したいことは何ですか？");
        assert_eq!(created.prompt_id.as_deref(), Some("gratitude"));

        let listed = gateway.journal_entries(&session).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_unknown_prompt_code_rejected() {
        let gateway = MemoryGateway::new();
        let session = Session::for_user(Uuid::new_v4());

        let err = gateway
            .create_journal_entry(&session, NewJournalEntry::new("weather", "rain").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PromptLookup(_)));
        assert_eq!(gateway.journal_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_settings_upsert_merges() {
        let gateway = MemoryGateway::new();
        let session = Session::for_user(Uuid::new_v4());

        assert!(gateway.user_settings(&session).await.unwrap().is_none());

        let created = gateway
            .upsert_user_settings(
                &session,
                UpsertSettingsRequest {
                    reminder_enabled: Some(true),
                    reminder_time: NaiveTime::from_hms_opt(21, 0, 0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.record_frequency, RecordFrequency::Once);
        assert!(created.reminder_enabled);

        let updated = gateway
            .upsert_user_settings(
                &session,
                UpsertSettingsRequest {
                    record_frequency: Some(RecordFrequency::Multiple),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.record_frequency, RecordFrequency::Multiple);
        assert!(updated.reminder_enabled);
        assert_eq!(updated.reminder_time, NaiveTime::from_hms_opt(21, 0, 0));
    }
}
