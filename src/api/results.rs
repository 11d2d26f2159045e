use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    routing::delete,
    Json, Router,
};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::schemas::result::ExamResult;

#[derive(Debug, Serialize)]
struct ResultCreated {
    id: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_results).post(create_result).delete(delete_all))
        .route("/:id", delete(delete_one))
}

async fn list_results(
    State(state): State<AppState>,
    CurrentAdmin(_username): CurrentAdmin,
) -> Result<Json<Vec<ExamResult>>, ApiError> {
    let results = state
        .results()
        .list()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam results"))?;

    Ok(Json(results))
}

/// Record a finished exam directly. Kept open so results survive even when a
/// session could not be graded server-side.
async fn create_result(
    State(state): State<AppState>,
    Json(result): Json<ExamResult>,
) -> Result<(StatusCode, Json<ResultCreated>), ApiError> {
    let id = state
        .results()
        .append(result)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store exam result"))?;

    metrics::counter!("exam_results_recorded_total").increment(1);

    Ok((StatusCode::CREATED, Json(ResultCreated { id })))
}

async fn delete_one(
    State(state): State<AppState>,
    CurrentAdmin(_username): CurrentAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .results()
        .delete(&id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam result"))?;

    if !removed {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all(
    State(state): State<AppState>,
    CurrentAdmin(username): CurrentAdmin,
) -> Result<StatusCode, ApiError> {
    state
        .results()
        .delete_all()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear exam results"))?;

    tracing::info!(admin = %username, "Exam results archive cleared");

    Ok(StatusCode::NO_CONTENT)
}
