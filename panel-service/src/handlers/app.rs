use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{services::metrics::get_metrics, AppState};

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": state.config.service_version,
    }))
}

pub async fn render_metrics() -> impl IntoResponse {
    get_metrics()
}
