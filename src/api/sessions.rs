use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::schemas::session::{AnswerSelect, SessionSnapshot, SessionStart, SubmitRequest};
use crate::services;
use crate::session::machine::{ExamMode, ExamSession, StartParams};
use crate::session::SessionError;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/:id", get(get_session).delete(discard_session))
        .route("/:id/answers", post(select_answer))
        .route("/:id/submit", post(submit_session))
}

async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionStart>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    payload.identity.validate().map_err(ApiError::BadRequest)?;

    let config = state
        .exam_config()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam settings"))?;
    let bank = state
        .questions()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question bank"))?;

    let category = payload.identity.category.clone();
    let pool = bank.get(&category).cloned().unwrap_or_default();
    let mode = payload.mode;
    let now = now_utc();
    let id = Uuid::new_v4().to_string();

    // The rng lives in its own block so the handler future stays Send.
    let session = {
        let mut rng = rand::thread_rng();
        ExamSession::start(
            StartParams {
                id: id.clone(),
                identity: payload.identity,
                category,
                mode,
                question_count: config.questions_per_exam as usize,
                duration_seconds: config.exam_duration_seconds,
                now,
            },
            &pool,
            &mut rng,
        )
    }
    .map_err(map_session_error)?;

    let snapshot = SessionSnapshot::of(&session, now);
    state.sessions().insert(session).await;

    metrics::counter!("exam_sessions_started_total", "mode" => mode_label(mode)).increment(1);
    tracing::info!(session_id = %id, mode = ?mode, "Exam session started");

    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let now = now_utc();
    let snapshot = state
        .sessions()
        .with(&id, |session| SessionSnapshot::of(session, now))
        .await
        .map_err(map_session_error)?;

    Ok(Json(snapshot))
}

/// Record one answer pick. Picks that arrive after submission or the
/// deadline, or with out-of-range indexes, are dropped without an error; the
/// returned snapshot shows what actually stuck.
async fn select_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerSelect>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let now = now_utc();
    let snapshot = state
        .sessions()
        .with(&id, |session| {
            let accepted = session.select_answer(now, payload.question_index, payload.choice_index);
            if !accepted {
                tracing::debug!(
                    session_id = %id,
                    question_index = payload.question_index,
                    choice_index = payload.choice_index,
                    "Ignored answer pick"
                );
            }
            SessionSnapshot::of(session, now)
        })
        .await
        .map_err(map_session_error)?;

    Ok(Json(snapshot))
}

/// Submit the attempt. Real-mode submissions ahead of the deadline must
/// carry `confirmed: true`; the countdown hitting zero submits on its own
/// with no confirmation involved.
async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let now = now_utc();
    let outcome = state
        .sessions()
        .with(&id, |session| {
            let needs_confirmation = session.mode == ExamMode::Real
                && !session.is_submitted()
                && session.remaining_seconds(now) > 0
                && !payload.confirmed;
            if needs_confirmation {
                return Err(ApiError::BadRequest(
                    "Real exam submission must be confirmed".to_string(),
                ));
            }

            let submit = session.submit(now);
            let to_record = (submit.first && session.mode == ExamMode::Real)
                .then(|| session.to_result())
                .flatten();

            Ok((SessionSnapshot::of(session, now), submit.first, to_record))
        })
        .await
        .map_err(map_session_error)?;
    let (snapshot, first, to_record) = outcome?;

    if first {
        metrics::counter!("exam_sessions_submitted_total").increment(1);
        tracing::info!(session_id = %id, "Exam session submitted");
    }

    if let Some(result) = to_record {
        services::results::record_real_result(&state, result)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to record exam result"))?;
    }

    Ok(Json(snapshot))
}

async fn discard_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions().remove(&id).await {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }

    tracing::info!(session_id = %id, "Exam session discarded");
    Ok(StatusCode::NO_CONTENT)
}

fn map_session_error(err: SessionError) -> ApiError {
    match err {
        SessionError::NotFound => ApiError::NotFound("Session not found".to_string()),
        SessionError::EmptyCategory(category) => {
            ApiError::NotFound(format!("No questions available for category {category}"))
        }
    }
}

fn mode_label(mode: ExamMode) -> &'static str {
    match mode {
        ExamMode::Real => "real",
        ExamMode::Practice => "practice",
    }
}
