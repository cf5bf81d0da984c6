use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::gateway::GatewayError;
use crate::relay::RelayError;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch prompt: {0}")]
    PromptLookup(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Record relay failed: {0}")]
    Relay(String),

    #[error("{0}")]
    SignOut(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unauthenticated => AppError::Unauthorized,
            GatewayError::PromptLookup(msg) => AppError::PromptLookup(msg),
            GatewayError::Database(e) => AppError::Store(e.to_string()),
            GatewayError::Relay(RelayError::Upstream { status, message, .. }) => {
                AppError::Upstream { status, message }
            }
            GatewayError::Relay(e) => AppError::Relay(e.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::SignOut(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::PromptLookup(detail) => {
                tracing::error!(error = %detail, "Prompt lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch prompt".to_string(),
                    Some(detail.clone()),
                )
            }
            AppError::Store(detail) => {
                tracing::error!(error = %detail, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save or load records".to_string(),
                    Some(detail.clone()),
                )
            }
            AppError::Upstream { status, message } => {
                tracing::warn!(status = *status, error = %message, "Upstream rejected record");
                (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message.clone(),
                    None,
                )
            }
            AppError::Relay(detail) => {
                tracing::error!(error = %detail, "Record relay failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error while relaying the record".to_string(),
                    Some(detail.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
