use axum::{extract::State, routing::get, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::schemas::settings::{SettingsPublic, SettingsUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsPublic>, ApiError> {
    let config = state
        .exam_config()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam settings"))?;

    Ok(Json(SettingsPublic {
        questions_per_exam: config.questions_per_exam,
        exam_duration_seconds: config.exam_duration_seconds,
    }))
}

/// Update the exam parameters. Sessions already in progress keep the values
/// they started with; only new sessions pick these up.
async fn update_settings(
    State(state): State<AppState>,
    CurrentAdmin(_username): CurrentAdmin,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<SettingsPublic>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let config = state
        .exam_config()
        .update_exam_params(payload.questions_per_exam, payload.exam_duration_seconds)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store exam settings"))?;

    tracing::info!(
        questions_per_exam = config.questions_per_exam,
        exam_duration_seconds = config.exam_duration_seconds,
        "Exam settings updated"
    );

    Ok(Json(SettingsPublic {
        questions_per_exam: config.questions_per_exam,
        exam_duration_seconds: config.exam_duration_seconds,
    }))
}
