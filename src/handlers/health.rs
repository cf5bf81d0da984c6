use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness only. Upstream reachability is reported by `/api/external/health`.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "moodlog-api",
        "version": env!("CARGO_PKG_VERSION"),
        "persistence": state.config.persistence_mode.as_str(),
    }))
}
