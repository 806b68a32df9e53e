use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::BackendKind;
use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let backend = match state.config.backend {
        BackendKind::Supabase => "supabase",
        BackendKind::Memory => "memory",
    };
    let body = json!({
        "status": "ok",
        "backend": backend,
    });
    (StatusCode::OK, Json(body))
}
