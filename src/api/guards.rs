use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};

/// The authenticated admin, extracted from a bearer token. The token subject
/// must still match the stored admin username, so a credentials change
/// invalidates every previously issued token.
pub(crate) struct CurrentAdmin(pub(crate) String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let config = app_state
            .exam_config()
            .load()
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load admin credentials"))?;

        if claims.sub != config.admin_username {
            return Err(ApiError::Unauthorized("Admin session is no longer valid"));
        }

        Ok(CurrentAdmin(claims.sub))
    }
}
