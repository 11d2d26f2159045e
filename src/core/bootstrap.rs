use anyhow::Context;

use crate::core::security;
use crate::core::state::AppState;

const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

/// First-run initialization: make sure the data directory exists, seed the
/// settings file, and hash the admin password if no hash is stored yet.
pub(crate) async fn run(state: &AppState) -> anyhow::Result<()> {
    let data_dir = &state.settings().data().data_dir;
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let config = state.exam_config().load().await.context("failed to load settings file")?;
    if !config.admin_password_hash.is_empty() {
        return Ok(());
    }

    let configured = &state.settings().admin().default_admin_password;
    let password = if configured.is_empty() {
        tracing::warn!(
            "DEFAULT_ADMIN_PASSWORD is not set; falling back to the built-in default. \
             Change the admin credentials before exposing this server."
        );
        FALLBACK_ADMIN_PASSWORD
    } else {
        configured.as_str()
    };

    let hash = security::hash_password(password).context("failed to hash admin password")?;
    state
        .exam_config()
        .update_credentials(&config.admin_username, &hash)
        .await
        .context("failed to store admin credentials")?;

    tracing::info!(username = %config.admin_username, "Seeded admin credentials");
    Ok(())
}
