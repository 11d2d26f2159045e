use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLogin {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminTokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) username: String,
    pub(crate) expires_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminSessionResponse {
    pub(crate) valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expires_at: Option<String>,
}

/// Username/password limits carried over from the original deployment.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CredentialsUpdate {
    pub(crate) current_username: String,
    pub(crate) current_password: String,
    #[serde(default)]
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub(crate) new_username: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub(crate) new_password: Option<String>,
}
