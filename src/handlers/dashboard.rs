use axum::{extract::State, Extension, Json};

use crate::dashboard::{summarize, DashboardSummary};
use crate::dto::SuccessResponse;
use crate::error::{AppError, AppResult};
use crate::gateway::Session;
use crate::AppState;

/// Today's summary. A failed read shows as an empty day instead of an error.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<SuccessResponse<DashboardSummary>>> {
    if !session.is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    let entries = match state.gateway.today_mood_entries(&session).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load today's mood entries");
            Vec::new()
        }
    };

    Ok(Json(SuccessResponse::new(summarize(&entries))))
}
