use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use common::{Error, WatchSpec};

use crate::AppState;

pub fn watch_router() -> Router<AppState> {
    Router::new()
        .route("/api/watches", get(list_watches).post(add_watch))
        .route("/api/watches/:symbol", delete(remove_watch))
        .route("/api/watches/:symbol/deactivate", post(deactivate_watch))
        .route("/api/status", get(get_status))
}

/// Request body for `POST /api/watches` — the symbol plus the spec fields,
/// in the same names the registry file uses.
#[derive(Deserialize)]
struct AddWatchRequest {
    symbol: String,
    #[serde(flatten)]
    spec: WatchSpec,
}

// ─── Watches ──────────────────────────────────────────────────────────────────

async fn list_watches(State(state): State<AppState>) -> Json<Value> {
    let watches = state.registry.read().await.list();
    let entries: Vec<Value> = watches
        .iter()
        .map(|(symbol, spec)| {
            json!({
                "symbol": symbol,
                "interval": spec.interval,
                "calculation_method": spec.price_field,
                "period": spec.period,
                "check_condition": spec.condition,
                "webhook_url": spec.webhook_url,
                "active": spec.active,
            })
        })
        .collect();

    Json(json!({ "watches": entries, "total": entries.len() }))
}

async fn add_watch(
    State(state): State<AppState>,
    Json(req): Json<AddWatchRequest>,
) -> (StatusCode, Json<Value>) {
    let AddWatchRequest { symbol, spec } = req;
    match state.registry.write().await.add(symbol.as_str(), spec) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "status": "added", "symbol": symbol })),
        ),
        Err(e) => error_response(e),
    }
}

async fn remove_watch(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.registry.write().await.remove(&symbol) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "removed", "symbol": symbol })),
        ),
        Err(e) => error_response(e),
    }
}

async fn deactivate_watch(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.registry.write().await.deactivate(&symbol) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "deactivated", "symbol": symbol })),
        ),
        Err(e) => error_response(e),
    }
}

// ─── Status ───────────────────────────────────────────────────────────────────

async fn get_status(State(state): State<AppState>) -> Json<Value> {
    let loop_state = *state.loop_state.read().await;
    let registry = state.registry.read().await;

    Json(json!({
        "loop": loop_state.to_string(),
        "watches_total": registry.len(),
        "watches_active": registry.active().len(),
    }))
}

fn error_response(e: Error) -> (StatusCode, Json<Value>) {
    let status = match e {
        Error::InvalidSpec(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}
