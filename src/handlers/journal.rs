use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use validator::Validate;

use crate::dto::{MessageResponse, SuccessResponse};
use crate::error::AppResult;
use crate::gateway::Session;
use crate::handlers::mood::session_for;
use crate::models::journal_entry::{
    CreateJournalRequest, JournalEntry, JournalSubmission, NewJournalEntry,
};
use crate::validation::validate_journal_submission;
use crate::AppState;

pub async fn describe() -> Json<MessageResponse> {
    Json(MessageResponse::new("Journal entry API. POST {userId, promptId, answer}"))
}

/// POST /api/journal
pub async fn submit_journal(
    State(state): State<AppState>,
    body: Result<Json<JournalSubmission>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<JournalEntry>>> {
    let Json(body) = body?;
    let valid = validate_journal_submission(&body)?;
    let session = session_for(&valid.user_id)?;

    let entry = state
        .gateway
        .create_journal_entry(&session, valid.entry)
        .await?;

    tracing::info!(entry_id = %entry.id, prompt = ?entry.prompt_id, "Journal entry saved");
    Ok(Json(SuccessResponse::new(entry)))
}

/// POST /api/me/journal
pub async fn create_my_journal(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateJournalRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<JournalEntry>>> {
    session.user_id()?;
    let Json(body) = body?;
    body.validate()?;

    let entry = NewJournalEntry::new(&body.prompt_code, &body.content)?;
    let entry = state.gateway.create_journal_entry(&session, entry).await?;

    Ok(Json(SuccessResponse::new(entry)))
}

pub async fn list_my_journal(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<SuccessResponse<Vec<JournalEntry>>>> {
    let entries = state.gateway.journal_entries(&session).await?;
    Ok(Json(SuccessResponse::new(entries)))
}
