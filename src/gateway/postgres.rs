use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::journal_entry::{JournalEntry, NewJournalEntry};
use crate::models::mood_entry::{MoodEntry, NewMoodEntry};
use crate::models::prompt::Prompt;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};

use super::{GatewayError, GatewayResult, PersistenceGateway, Session};

#[derive(Clone)]
pub struct PgGateway {
    db: PgPool,
}

impl PgGateway {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn create_mood_entry(
        &self,
        session: &Session,
        entry: NewMoodEntry,
    ) -> GatewayResult<MoodEntry> {
        let user_id = session.user_id()?;

        let row = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (id, user_id, mood_level, stress_level, memo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.mood_level)
        .bind(entry.stress_level)
        .bind(&entry.memo)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn create_journal_entry(
        &self,
        session: &Session,
        entry: NewJournalEntry,
    ) -> GatewayResult<JournalEntry> {
        let user_id = session.user_id()?;

        let prompt = self
            .find_prompt(&entry.prompt_code)
            .await
            .map_err(|e| GatewayError::PromptLookup(e.to_string()))?
            .ok_or_else(|| {
                GatewayError::PromptLookup(format!("Unknown prompt code: {}", entry.prompt_code))
            })?;

        let row = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (id, user_id, prompt_id, prompt, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&prompt.code)
        .bind(&prompt.prompt)
        .bind(&entry.content)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn import_mood_entry(
        &self,
        session: &Session,
        entry: MoodEntry,
    ) -> GatewayResult<MoodEntry> {
        session.owner(entry.user_id)?;

        sqlx::query(
            r#"
            INSERT INTO mood_entries (id, user_id, mood_level, stress_level, memo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.mood_level)
        .bind(entry.stress_level)
        .bind(&entry.memo)
        .bind(entry.created_at)
        .execute(&self.db)
        .await?;

        Ok(entry)
    }

    async fn import_journal_entry(
        &self,
        session: &Session,
        entry: JournalEntry,
    ) -> GatewayResult<JournalEntry> {
        session.owner(entry.user_id)?;

        sqlx::query(
            r#"
            INSERT INTO journal_entries (id, user_id, prompt_id, prompt, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.prompt_id)
        .bind(&entry.prompt)
        .bind(&entry.content)
        .bind(entry.created_at)
        .execute(&self.db)
        .await?;

        Ok(entry)
    }

    async fn latest_mood_entry(&self, session: &Session) -> GatewayResult<Option<MoodEntry>> {
        let user_id = session.user_id()?;

        let row = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn mood_entries_between(
        &self,
        session: &Session,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> GatewayResult<Vec<MoodEntry>> {
        let user_id = session.user_id()?;

        let rows = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at < $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn journal_entries(&self, session: &Session) -> GatewayResult<Vec<JournalEntry>> {
        let user_id = session.user_id()?;

        let rows = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_prompt(&self, code: &str) -> GatewayResult<Option<Prompt>> {
        let row = sqlx::query_as::<_, Prompt>("SELECT code, prompt FROM prompts WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    async fn user_settings(&self, session: &Session) -> GatewayResult<Option<UserSettings>> {
        let user_id = session.user_id()?;

        let row = sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    async fn upsert_user_settings(
        &self,
        session: &Session,
        patch: UpsertSettingsRequest,
    ) -> GatewayResult<UserSettings> {
        let user_id = session.user_id()?;

        let row = sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings (id, user_id, record_frequency, reminder_enabled, reminder_time)
            VALUES ($1, $2, COALESCE($3, 'once'::record_frequency), COALESCE($4, false), $5)
            ON CONFLICT (user_id) DO UPDATE SET
                record_frequency = COALESCE($3, user_settings.record_frequency),
                reminder_enabled = COALESCE($4, user_settings.reminder_enabled),
                reminder_time = COALESCE($5, user_settings.reminder_time),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(patch.record_frequency)
        .bind(patch.reminder_enabled)
        .bind(patch.reminder_time)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }
}

/// Run against the database in `DATABASE_URL`; skipped when it is unset.
/// Each test works under a fresh user id, so a shared database is fine.
#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime};

    use super::*;
    use crate::dashboard::day_bounds;
    use crate::models::user_settings::RecordFrequency;

    async fn test_gateway() -> Option<PgGateway> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        };

        let db = crate::db::create_pool(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&db).await.unwrap();

        Some(PgGateway::new(db))
    }

    fn mood_at(user_id: Uuid, stress: i32, created_at: DateTime<Utc>) -> MoodEntry {
        MoodEntry {
            id: Uuid::new_v4(),
            user_id,
            mood_level: 3,
            stress_level: stress,
            memo: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_create_then_latest_round_trip() {
        let Some(gateway) = test_gateway().await else {
            return;
        };
        let session = Session::for_user(Uuid::new_v4());

        let entry = NewMoodEntry::new(5, 1, Some("holiday".into())).unwrap();
        let created = gateway.create_mood_entry(&session, entry).await.unwrap();

        let latest = gateway.latest_mood_entry(&session).await.unwrap().unwrap();
        assert_eq!(latest.id, created.id);
        assert_eq!(latest.mood_level, 5);
        assert_eq!(latest.stress_level, 1);
        assert_eq!(latest.memo.as_deref(), Some("holiday"));
    }

    #[tokio::test]
    async fn test_day_window_bounds() {
        let Some(gateway) = test_gateway().await else {
            return;
        };
        let user = Uuid::new_v4();
        let session = Session::for_user(user);

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let (start, end) = day_bounds(&tokyo, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        let yesterday = mood_at(user, 9, start - Duration::seconds(1));
        let midnight = mood_at(user, 2, start);
        let tomorrow = mood_at(user, 7, end);
        for entry in [&yesterday, &midnight, &tomorrow] {
            gateway.import_mood_entry(&session, entry.clone()).await.unwrap();
        }

        let today = gateway
            .mood_entries_between(&session, Some(start), Some(end))
            .await
            .unwrap();
        assert_eq!(
            today.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![midnight.id]
        );

        let open_ended = gateway
            .mood_entries_between(&session, Some(start), None)
            .await
            .unwrap();
        assert_eq!(
            open_ended.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![tomorrow.id, midnight.id]
        );
    }

    #[tokio::test]
    async fn test_import_ignores_known_id() {
        let Some(gateway) = test_gateway().await else {
            return;
        };
        let user = Uuid::new_v4();
        let session = Session::for_user(user);

        let entry = mood_at(user, 4, Utc::now());
        gateway.import_mood_entry(&session, entry.clone()).await.unwrap();
        gateway.import_mood_entry(&session, entry).await.unwrap();

        let all = gateway.mood_entries_between(&session, None, None).await.unwrap();
        assert_eq!(1, all.len());
    }

    #[tokio::test]
    async fn test_journal_prompt_resolution() {
        let Some(gateway) = test_gateway().await else {
            return;
        };
        let session = Session::for_user(Uuid::new_v4());

        let created = gateway
            .create_journal_entry(&session, NewJournalEntry::new("strength", "patience").unwrap())
            .await
            .unwrap();
        assert_eq!(created.prompt, "あなたの強みを一つ教えてください");

        let err = gateway
            .create_journal_entry(&session, NewJournalEntry::new("weather", "rain").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PromptLookup(_)));

        let listed = gateway.journal_entries(&session).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_settings_upsert_merges() {
        let Some(gateway) = test_gateway().await else {
            return;
        };
        let session = Session::for_user(Uuid::new_v4());
        assert!(gateway.user_settings(&session).await.unwrap().is_none());

        let first = gateway
            .upsert_user_settings(
                &session,
                UpsertSettingsRequest {
                    record_frequency: Some(RecordFrequency::Multiple),
                    reminder_enabled: Some(true),
                    reminder_time: NaiveTime::from_hms_opt(21, 0, 0),
                },
            )
            .await
            .unwrap();
        assert_eq!(first.record_frequency, RecordFrequency::Multiple);

        let second = gateway
            .upsert_user_settings(
                &session,
                UpsertSettingsRequest {
                    reminder_enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.record_frequency, RecordFrequency::Multiple);
        assert!(!second.reminder_enabled);
        assert_eq!(second.reminder_time, NaiveTime::from_hms_opt(21, 0, 0));
    }

    #[tokio::test]
    async fn test_anonymous_session_rejected_before_query() {
        let Some(gateway) = test_gateway().await else {
            return;
        };

        let err = gateway
            .create_mood_entry(&Session::anonymous(), NewMoodEntry::new(3, 3, None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthenticated));
    }
}
