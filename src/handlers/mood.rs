use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use chrono::{Local, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::dashboard::day_bounds;
use crate::display::{period_start, Period};
use crate::dto::{MessageResponse, SuccessResponse};
use crate::error::{AppError, AppResult};
use crate::gateway::Session;
use crate::models::mood_entry::{
    CreateMoodRequest, MoodEntry, MoodHistoryQuery, MoodSubmission, NewMoodEntry,
};
use crate::validation::validate_mood_submission;
use crate::AppState;

/// Session for a service submission that names its user in the body
pub(crate) fn session_for(user_id: &str) -> AppResult<Session> {
    Uuid::parse_str(user_id)
        .map(Session::for_user)
        .map_err(|_| AppError::Validation("userId must be a valid UUID".into()))
}

pub async fn describe() -> Json<MessageResponse> {
    Json(MessageResponse::new("Mood entry API. POST {userId, moodId, stressLevel, memo?}"))
}

/// POST /api/mood
pub async fn submit_mood(
    State(state): State<AppState>,
    body: Result<Json<MoodSubmission>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<MoodEntry>>> {
    let Json(body) = body?;
    let valid = validate_mood_submission(&body)?;
    let session = session_for(&valid.user_id)?;

    let entry = state.gateway.create_mood_entry(&session, valid.entry).await?;

    tracing::info!(entry_id = %entry.id, "Mood entry saved");
    Ok(Json(SuccessResponse::new(entry)))
}

/// POST /api/me/mood
pub async fn create_my_mood(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateMoodRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<MoodEntry>>> {
    session.user_id()?;
    let Json(body) = body?;
    body.validate()?;

    let entry = NewMoodEntry::new(
        i64::from(body.mood_level),
        i64::from(body.stress_level),
        body.memo,
    )?;
    let entry = state.gateway.create_mood_entry(&session, entry).await?;

    Ok(Json(SuccessResponse::new(entry)))
}

pub async fn latest_mood(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<SuccessResponse<Option<MoodEntry>>>> {
    let entry = state.gateway.latest_mood_entry(&session).await?;
    Ok(Json(SuccessResponse::new(entry)))
}

/// GET /api/me/mood?period=day|week|month
pub async fn mood_history(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    query: Result<Query<MoodHistoryQuery>, QueryRejection>,
) -> AppResult<Json<SuccessResponse<Vec<MoodEntry>>>> {
    let Query(query) = query?;

    // `day` means since local midnight rather than since this instant
    let now = Local::now();
    let from = match query.period.unwrap_or_default() {
        Period::Day => day_bounds(&Local, now.date_naive()).0,
        period => period_start(period, now).with_timezone(&Utc),
    };

    let entries = state
        .gateway
        .mood_entries_between(&session, Some(from), None)
        .await?;

    Ok(Json(SuccessResponse::new(entries)))
}
