use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::dto::SuccessResponse;
use crate::error::AppResult;
use crate::gateway::Session;
use crate::models::user_settings::{UpsertSettingsRequest, UserSettings};
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Json<SuccessResponse<Option<UserSettings>>>> {
    let settings = state.gateway.user_settings(&session).await?;
    Ok(Json(SuccessResponse::new(settings)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<UpsertSettingsRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse<Option<UserSettings>>>> {
    session.user_id()?;
    let Json(patch) = body?;

    let settings = state.gateway.upsert_user_settings(&session, patch).await?;
    Ok(Json(SuccessResponse::new(Some(settings))))
}
