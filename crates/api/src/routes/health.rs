use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Health check endpoint — no auth required.
/// Used by ops probes to see that the process and loop are alive.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let loop_state = *state.loop_state.read().await;
    Json(json!({
        "status": "ok",
        "loop": loop_state.to_string(),
    }))
}
