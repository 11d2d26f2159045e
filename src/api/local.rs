use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::schemas::result::ExamResult;
use crate::session::identity::ExamineeIdentity;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(get_login).put(set_login).delete(clear_login))
        .route("/history", get(get_history).delete(clear_history))
}

async fn get_login(
    State(state): State<AppState>,
) -> Result<Json<Option<ExamineeIdentity>>, ApiError> {
    let local = state
        .local()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load local state"))?;

    Ok(Json(local.login))
}

async fn set_login(
    State(state): State<AppState>,
    Json(identity): Json<ExamineeIdentity>,
) -> Result<Json<ExamineeIdentity>, ApiError> {
    identity.validate().map_err(ApiError::BadRequest)?;

    state
        .local()
        .set_login(identity.clone())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to persist login"))?;

    Ok(Json(identity))
}

async fn clear_login(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .local()
        .clear_login()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear login"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<ExamResult>>, ApiError> {
    let local = state
        .local()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load local state"))?;

    Ok(Json(local.history))
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .local()
        .clear_history()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear history"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    fn identity_payload() -> serde_json::Value {
        json!({
            "name": "Nguyễn Văn A",
            "category": "Chiensimoi",
            "rank": "Binh nhì",
            "role": "Chiến sĩ",
            "unit": "c2"
        })
    }

    #[tokio::test]
    async fn login_round_trips_through_the_api() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/local/login", None, None))
            .await
            .expect("response");
        let body = test_support::read_json(response).await;
        assert!(body.is_null());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/local/login",
                None,
                Some(identity_payload()),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/local/login", None, None))
            .await
            .expect("response");
        let body = test_support::read_json(response).await;
        assert_eq!(body["name"], "Nguyễn Văn A");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/local/login",
                None,
                None,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn login_accepts_legacy_field_names() {
        let ctx = test_support::setup_test_context().await;

        let payload = json!({
            "username": "Trần Văn B",
            "doituong": "Siquan-QNCN",
            "capbac": "Trung úy",
            "chucvu": "Trung đội trưởng",
            "donvi": "d1"
        });
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/local/login",
                None,
                Some(payload),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["name"], "Trần Văn B");
        assert_eq!(body["category"], "Siquan-QNCN");
    }

    #[tokio::test]
    async fn blank_login_is_rejected() {
        let ctx = test_support::setup_test_context().await;

        let mut payload = identity_payload();
        payload["unit"] = json!("");
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/local/login",
                None,
                Some(payload),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_is_readable_and_clearable() {
        let ctx = test_support::setup_test_context().await;

        let result = crate::schemas::result::ExamResult {
            id: None,
            name: "A".to_string(),
            category: "Chiensimoi".to_string(),
            rank: String::new(),
            role: String::new(),
            unit: String::new(),
            timestamp: "2025-03-10T08:20:00Z".to_string(),
            correct_count: 20,
            total_count: 25,
            score: "8.00".to_string(),
            answers: vec![],
            questions: vec![],
        };
        ctx.state.local().append_history(result).await.expect("append");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/local/history", None, None))
            .await
            .expect("response");
        let body = test_support::read_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["score"], "8.00");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/local/history",
                None,
                None,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        assert!(ctx.state.local().load().await.expect("local").history.is_empty());
    }
}
