use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::store::{read_json, write_json, StoreError};

/// The settings document: exam parameters plus admin credentials. Aliases
/// accept the original deployment's file; the password field holds an argon2
/// hash, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExamConfig {
    #[serde(alias = "defaultQuestionsCount")]
    pub(crate) questions_per_exam: u64,
    #[serde(alias = "examTime")]
    pub(crate) exam_duration_seconds: u64,
    #[serde(alias = "adminUsername")]
    pub(crate) admin_username: String,
    #[serde(default, alias = "adminPassword")]
    pub(crate) admin_password_hash: String,
}

/// Settings file access. A missing file is seeded with the configured
/// defaults on first load.
#[derive(Clone)]
pub(crate) struct SettingsStore {
    path: PathBuf,
    seed: ExamConfig,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsStore {
    pub(crate) fn new(path: PathBuf, seed: ExamConfig) -> Self {
        Self { path, seed, write_lock: Arc::new(Mutex::new(())) }
    }

    pub(crate) async fn load(&self) -> Result<ExamConfig, StoreError> {
        if let Some(config) = read_json(&self.path).await? {
            return Ok(config);
        }

        let _guard = self.write_lock.lock().await;
        // Another writer may have seeded while we waited.
        if let Some(config) = read_json(&self.path).await? {
            return Ok(config);
        }

        write_json(&self.path, &self.seed).await?;
        tracing::info!(path = %self.path.display(), "Seeded settings file with defaults");
        Ok(self.seed.clone())
    }

    pub(crate) async fn update_exam_params(
        &self,
        questions_per_exam: u64,
        exam_duration_seconds: u64,
    ) -> Result<ExamConfig, StoreError> {
        let mut config = self.load().await?;
        let _guard = self.write_lock.lock().await;

        config.questions_per_exam = questions_per_exam;
        config.exam_duration_seconds = exam_duration_seconds;
        write_json(&self.path, &config).await?;

        Ok(config)
    }

    pub(crate) async fn update_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<ExamConfig, StoreError> {
        let mut config = self.load().await?;
        let _guard = self.write_lock.lock().await;

        config.admin_username = username.to_string();
        config.admin_password_hash = password_hash.to_string();
        write_json(&self.path, &config).await?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> ExamConfig {
        ExamConfig {
            questions_per_exam: 25,
            exam_duration_seconds: 1200,
            admin_username: "admin".to_string(),
            admin_password_hash: String::new(),
        }
    }

    fn store() -> SettingsStore {
        let path = std::env::temp_dir()
            .join(format!("tracnghiem-settings-{}.json", uuid::Uuid::new_v4()));
        SettingsStore::new(path, seed())
    }

    #[tokio::test]
    async fn first_load_seeds_defaults() {
        let store = store();

        let config = store.load().await.expect("load");

        assert_eq!(config.questions_per_exam, 25);
        assert_eq!(config.exam_duration_seconds, 1200);
        assert!(tokio::fs::try_exists(&store.path).await.unwrap());
        tokio::fs::remove_file(&store.path).await.ok();
    }

    #[tokio::test]
    async fn exam_params_update_persists() {
        let store = store();

        store.update_exam_params(30, 900).await.expect("update");
        let config = store.load().await.expect("load");

        assert_eq!(config.questions_per_exam, 30);
        assert_eq!(config.exam_duration_seconds, 900);
        assert_eq!(config.admin_username, "admin");
        tokio::fs::remove_file(&store.path).await.ok();
    }

    #[tokio::test]
    async fn accepts_legacy_settings_file() {
        let path = std::env::temp_dir()
            .join(format!("tracnghiem-settings-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            br#"{"defaultQuestionsCount": 25, "examTime": 1200, "adminUsername": "admin"}"#,
        )
        .await
        .expect("write legacy");

        let store = SettingsStore::new(path.clone(), seed());
        let config = store.load().await.expect("load");

        assert_eq!(config.exam_duration_seconds, 1200);
        assert!(config.admin_password_hash.is_empty());
        tokio::fs::remove_file(&path).await.ok();
    }
}
