use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{bootstrap, config::Settings, security, state::AppState};
use crate::schemas::question::{Question, QuestionBank};

pub(crate) const TEST_SECRET_KEY: &str = "test-secret";
pub(crate) const TEST_ADMIN_PASSWORD: &str = "test-admin-pass";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    data_dir: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.data_dir).ok();
    }
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn unique_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("tracnghiem-test-{}", Uuid::new_v4()))
}

pub(crate) fn set_test_env(data_dir: &Path) {
    dotenvy::dotenv().ok();

    std::env::set_var("TRACNGHIEM_ENV", "test");
    std::env::set_var("TRACNGHIEM_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("TRACNGHIEM_DATA_DIR", data_dir);
    std::env::set_var("DEFAULT_ADMIN_PASSWORD", TEST_ADMIN_PASSWORD);
    std::env::remove_var("DEFAULT_QUESTIONS_COUNT");
    std::env::remove_var("DEFAULT_EXAM_TIME_SECONDS");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    let data_dir = unique_data_dir();
    set_test_env(&data_dir);

    let settings = Settings::load().expect("settings");
    let state = AppState::from_settings(settings);
    bootstrap::run(&state).await.expect("bootstrap");

    let app = api::router::router(state.clone());

    TestContext { state, app, data_dir, _guard: guard }
}

/// Fill one category with `count` synthetic questions. The correct choice
/// for question `i` is `i % 4`.
pub(crate) async fn seed_questions(state: &AppState, category: &str, count: usize) {
    let questions: Vec<Question> = (0..count)
        .map(|i| Question {
            text: format!("Câu hỏi {i}?"),
            choices: (0..4).map(|c| format!("Phương án {c}")).collect(),
            answer_index: i % 4,
        })
        .collect();

    let mut bank: QuestionBank = state.questions().load().await.expect("load bank");
    bank.insert(category.to_string(), questions);
    state.questions().save(&bank).await.expect("save bank");
}

/// Mint an admin token directly, bypassing the login endpoint.
pub(crate) async fn admin_token(state: &AppState) -> String {
    let config = state.exam_config().load().await.expect("exam config");
    let (token, _expires_at) =
        security::create_admin_token(&config.admin_username, state.settings(), None)
            .expect("token");
    token
}

/// Log in through the API so the admin-session marker lands in local state.
pub(crate) async fn login_admin(ctx: &TestContext) -> String {
    use tower::ServiceExt;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(serde_json::json!({"username": "admin", "password": TEST_ADMIN_PASSWORD})),
        ))
        .await
        .expect("login response");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = read_json(response).await;
    body["access_token"].as_str().expect("access token").to_string()
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
