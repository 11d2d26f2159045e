use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::schemas::question::{validate_bank, QuestionBank};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_bank).put(replace_bank))
}

async fn get_bank(State(state): State<AppState>) -> Result<Json<QuestionBank>, ApiError> {
    let bank = state
        .questions()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question bank"))?;

    Ok(Json(bank))
}

/// Replace the whole bank. Validation is all-or-nothing: one malformed
/// question rejects the upload and leaves the stored bank untouched.
async fn replace_bank(
    State(state): State<AppState>,
    CurrentAdmin(_username): CurrentAdmin,
    Json(bank): Json<QuestionBank>,
) -> Result<Json<QuestionBank>, ApiError> {
    validate_bank(&bank).map_err(ApiError::BadRequest)?;

    state
        .questions()
        .save(&bank)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store question bank"))?;

    let total: usize = bank.values().map(Vec::len).sum();
    tracing::info!(categories = bank.len(), questions = total, "Question bank replaced");

    Ok(Json(bank))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    fn bank_payload() -> serde_json::Value {
        json!({
            "Chiensimoi": [
                {
                    "text": "Ngày thành lập Quân đội nhân dân Việt Nam?",
                    "choices": ["22/12/1944", "19/08/1945", "02/09/1945", "07/05/1954"],
                    "answer_index": 0
                }
            ]
        })
    }

    #[tokio::test]
    async fn bank_replacement_requires_admin() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/questions",
                None,
                Some(bank_payload()),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_replaces_bank_and_anyone_reads_it() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx.state).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/questions",
                Some(&token),
                Some(bank_payload()),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, "/api/v1/questions", None, None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["Chiensimoi"][0]["answer_index"], 0);
    }

    #[tokio::test]
    async fn malformed_bank_is_rejected_wholesale() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx.state).await;

        let payload = json!({
            "Chiensimoi": [
                {"text": "Only two choices", "choices": ["a", "b"], "answer_index": 0}
            ]
        });
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/questions",
                Some(&token),
                Some(payload),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bank = ctx.state.questions().load().await.expect("load");
        assert!(bank.is_empty());
    }

    #[tokio::test]
    async fn legacy_field_names_are_accepted() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx.state).await;

        let payload = json!({
            "Siquan-QNCN": [
                {
                    "cauHoi": "Điều lệnh quản lý bộ đội?",
                    "luaChon": ["A", "B", "C", "D"],
                    "dapAn": 2
                }
            ]
        });
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/questions",
                Some(&token),
                Some(payload),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["Siquan-QNCN"][0]["answer_index"], 2);
    }
}
