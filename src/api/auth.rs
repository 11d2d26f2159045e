use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::{format_offset, now_utc};
use crate::schemas::auth::{
    AdminLogin, AdminSessionResponse, AdminTokenResponse, CredentialsUpdate,
};
use crate::session::identity::AdminMarker;
use crate::store::settings::ExamConfig;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(session).delete(logout))
        .route("/credentials", put(update_credentials))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<AdminTokenResponse>, ApiError> {
    let config = load_config(&state).await?;
    verify_credentials(&config, &payload.username, &payload.password)?;

    let (token, expires_at) = security::create_admin_token(&config.admin_username, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create admin token"))?;

    let marker = AdminMarker {
        username: config.admin_username.clone(),
        expires_at: expires_at.unix_timestamp(),
    };
    state
        .local()
        .set_admin_marker(Some(marker))
        .await
        .map_err(|e| ApiError::internal(e, "Failed to persist admin session"))?;

    tracing::info!(username = %config.admin_username, "Admin logged in");

    Ok(Json(AdminTokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        username: config.admin_username,
        expires_at: format_offset(expires_at),
    }))
}

/// Restore the admin session persisted on this device. Expired or absent
/// markers report `valid: false` rather than an error, so the client can
/// fall back to the login form quietly.
async fn session(State(state): State<AppState>) -> Result<Json<AdminSessionResponse>, ApiError> {
    let local = state
        .local()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load local state"))?;

    let Some(marker) = local.admin_session else {
        return Ok(Json(AdminSessionResponse { valid: false, username: None, expires_at: None }));
    };

    if marker.expires_at <= now_utc().unix_timestamp() {
        return Ok(Json(AdminSessionResponse { valid: false, username: None, expires_at: None }));
    }

    let expires_at = OffsetDateTime::from_unix_timestamp(marker.expires_at)
        .map_err(|e| ApiError::internal(e, "Stored admin session has an invalid expiry"))?;

    Ok(Json(AdminSessionResponse {
        valid: true,
        username: Some(marker.username),
        expires_at: Some(format_offset(expires_at)),
    }))
}

async fn logout(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .local()
        .set_admin_marker(None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear admin session"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the admin username and/or password. The current credentials are
/// re-verified from the request body, and the stored session marker is
/// cleared so the admin has to log in again with the new pair.
async fn update_credentials(
    State(state): State<AppState>,
    CurrentAdmin(_username): CurrentAdmin,
    Json(payload): Json<CredentialsUpdate>,
) -> Result<Json<AdminSessionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if payload.new_username.is_none() && payload.new_password.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let config = load_config(&state).await?;
    verify_credentials(&config, &payload.current_username, &payload.current_password)?;

    let username = payload.new_username.unwrap_or_else(|| config.admin_username.clone());
    let password_hash = match payload.new_password {
        Some(password) => security::hash_password(&password)
            .map_err(|e| ApiError::internal(e, "Failed to hash admin password"))?,
        None => config.admin_password_hash.clone(),
    };

    state
        .exam_config()
        .update_credentials(&username, &password_hash)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store admin credentials"))?;

    state
        .local()
        .set_admin_marker(None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear admin session"))?;

    tracing::info!(username = %username, "Admin credentials updated");

    Ok(Json(AdminSessionResponse { valid: false, username: Some(username), expires_at: None }))
}

async fn load_config(state: &AppState) -> Result<ExamConfig, ApiError> {
    state
        .exam_config()
        .load()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load admin credentials"))
}

fn verify_credentials(
    config: &ExamConfig,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    if username != config.admin_username {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    let verified = security::verify_password(password, &config.admin_password_hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    Ok(())
}
