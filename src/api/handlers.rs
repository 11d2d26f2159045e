use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::core::metrics;
use crate::core::state::AppState;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let response = RootResponse {
        message: state.settings().api().project_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(response)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();

    match state.questions().load().await {
        Ok(bank) => {
            components.insert("questions".to_string(), format!("healthy ({} categories)", bank.len()));
        }
        Err(err) => {
            components.insert("questions".to_string(), format!("unhealthy: {err}"));
            status = "degraded".to_string();
        }
    }

    match state.exam_config().load().await {
        Ok(_) => {
            components.insert("settings".to_string(), "healthy".to_string());
        }
        Err(err) => {
            components.insert("settings".to_string(), format!("unhealthy: {err}"));
            status = "unhealthy".to_string();
        }
    }

    components
        .insert("active_sessions".to_string(), state.sessions().active_count().await.to_string());

    Json(HealthResponse { service: "tracnghiem-api".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
