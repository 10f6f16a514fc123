mod auth;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use common::LoopState;
use registry::WatchRegistry;

/// Shared application state injected into every route handler.
///
/// The registry handle is the same instance the scheduler evaluates from;
/// this API is the management surface the interactive editor calls instead
/// of touching the store directly.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<WatchRegistry>>,
    pub loop_state: Arc<RwLock<LoopState>>,
    pub api_token: String,
}

/// Build the full application router. Watch CRUD and status are
/// token-protected; the health probe stays open.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::watch_router().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        )))
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
}

/// Build and run the management API server.
pub async fn serve(state: AppState, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app(state);

    info!(%addr, "Management API listening");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
