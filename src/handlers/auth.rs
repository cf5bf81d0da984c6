use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};

use crate::auth::{session::extract_token, AuthProviderError};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// POST /api/auth/signout. Without a token there is nothing to revoke and the
/// call still succeeds.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<Value>)> {
    if let Some(token) = extract_token(&headers, &state.config.session_cookie) {
        match state.auth.sign_out(&token).await {
            Ok(()) => {}
            Err(AuthProviderError::Rejected { status, message }) => {
                tracing::warn!(status, error = %message, "Auth provider rejected sign-out");
                return Err(AppError::SignOut(message));
            }
            Err(e) => return Err(AppError::Internal(e.into())),
        }
    }

    let cookie = Cookie::build((state.config.session_cookie.clone(), "")).path("/");

    Ok((
        jar.remove(cookie),
        Json(json!({ "success": true, "message": "Signed out" })),
    ))
}
