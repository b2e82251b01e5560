use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::main_lib::AppState;

pub mod forecast;
pub mod issues;
pub mod shared;

async fn healthz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.snapshot().await;
    Json(json!({ "status": "ok", "issues": snapshot.len() }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(issues::router())
        .merge(forecast::router())
}
