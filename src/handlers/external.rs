//! Relay routes: validate, forward to the upstream record API, pass its
//! answer back.
//!
//! Errors here use the upstream's `{status, message, data?}` envelope rather
//! than the `{error}` shape of the direct routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::dto::MessageResponse;
use crate::models::journal_entry::JournalSubmission;
use crate::models::mood_entry::MoodSubmission;
use crate::relay::{RelayError, RelayJournalBody, RelayMoodBody};
use crate::validation::{validate_journal_submission, validate_mood_submission, ValidationError};
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ExternalError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl From<ValidationError> for ExternalError {
    fn from(e: ValidationError) -> Self {
        ExternalError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for ExternalError {
    fn from(e: JsonRejection) -> Self {
        ExternalError::Validation(e.body_text())
    }
}

impl IntoResponse for ExternalError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ExternalError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "message": message }),
            ),
            ExternalError::Relay(RelayError::Upstream {
                status,
                message,
                data,
            }) => {
                tracing::warn!(status, error = %message, "Upstream rejected relayed record");
                let mut body = json!({ "status": "error", "message": message });
                if let Some(data) = data {
                    body["data"] = data;
                }
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    body,
                )
            }
            ExternalError::Relay(e) => {
                tracing::error!(error = %e, "Relay request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "status": "error",
                        "message": "Server error",
                        "data": { "details": e.to_string() },
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub async fn describe_mood() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Mood relay API. POST {userId, moodId, stressLevel} to forward to the record service",
    ))
}

pub async fn describe_journal() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Journal relay API. POST {userId, promptId, answer} to forward to the record service",
    ))
}

/// POST /api/external/mood
pub async fn relay_mood(
    State(state): State<AppState>,
    body: Result<Json<MoodSubmission>, JsonRejection>,
) -> Result<Json<Value>, ExternalError> {
    let Json(body) = body?;
    let valid = validate_mood_submission(&body)?;

    let body = RelayMoodBody {
        user_id: valid.user_id,
        mood_id: valid.entry.mood_level(),
        stress_level: valid.entry.stress_level(),
        // the upstream mood schema is exactly {userId, moodId, stressLevel}
        memo: None,
    };

    Ok(Json(state.relay.save_mood_entry(&body).await?))
}

/// POST /api/external/journal
pub async fn relay_journal(
    State(state): State<AppState>,
    body: Result<Json<JournalSubmission>, JsonRejection>,
) -> Result<Json<Value>, ExternalError> {
    let Json(body) = body?;
    let valid = validate_journal_submission(&body)?;

    let body = RelayJournalBody {
        user_id: valid.user_id,
        prompt_id: valid.entry.prompt_code().to_string(),
        answer: valid.entry.content().to_string(),
    };

    Ok(Json(state.relay.save_journal_entry(&body).await?))
}

/// GET /api/external/health. Diagnostics only.
pub async fn upstream_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.relay.is_reachable().await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "message": "Upstream record service is reachable",
            })),
        ),
        Ok(false) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "Upstream record service reported a failure",
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Upstream health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Upstream record service is unreachable",
                    "data": { "details": e.to_string() },
                })),
            )
        }
    }
}
