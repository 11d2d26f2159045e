use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::schemas::result::ExamResult;
use crate::session::identity::{AdminMarker, ExamineeIdentity};
use crate::store::{read_json, write_json, StoreError};

/// Device-scoped state that survives restarts: the remembered examinee login,
/// the practice/real history shown on the device, and the restorable admin
/// session marker.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct LocalState {
    #[serde(default)]
    pub(crate) login: Option<ExamineeIdentity>,
    #[serde(default)]
    pub(crate) history: Vec<ExamResult>,
    #[serde(default)]
    pub(crate) admin_session: Option<AdminMarker>,
}

/// Local-state file access. Unlike the other stores, a malformed file here is
/// not fatal: it is discarded and replaced with defaults, the same as a
/// cleared browser profile would be.
#[derive(Clone)]
pub(crate) struct LocalStateStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStateStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Arc::new(Mutex::new(())) }
    }

    pub(crate) async fn load(&self) -> Result<LocalState, StoreError> {
        match read_json(&self.path).await {
            Ok(state) => Ok(state.unwrap_or_default()),
            Err(StoreError::Malformed { path, source }) => {
                tracing::warn!(%path, error = %source, "Discarding malformed local state");
                Ok(LocalState::default())
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn set_login(&self, identity: ExamineeIdentity) -> Result<(), StoreError> {
        self.mutate(|state| state.login = Some(identity)).await
    }

    pub(crate) async fn clear_login(&self) -> Result<(), StoreError> {
        self.mutate(|state| state.login = None).await
    }

    pub(crate) async fn append_history(&self, result: ExamResult) -> Result<(), StoreError> {
        self.mutate(|state| state.history.push(result)).await
    }

    pub(crate) async fn clear_history(&self) -> Result<(), StoreError> {
        self.mutate(|state| state.history.clear()).await
    }

    pub(crate) async fn set_admin_marker(
        &self,
        marker: Option<AdminMarker>,
    ) -> Result<(), StoreError> {
        self.mutate(|state| state.admin_session = marker).await
    }

    async fn mutate(&self, apply: impl FnOnce(&mut LocalState)) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.load().await?;
        apply(&mut state);
        write_json(&self.path, &state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LocalStateStore {
        let path =
            std::env::temp_dir().join(format!("tracnghiem-local-{}.json", uuid::Uuid::new_v4()));
        LocalStateStore::new(path)
    }

    fn identity() -> ExamineeIdentity {
        ExamineeIdentity {
            name: "Nguyễn Văn A".to_string(),
            category: "Chiensimoi".to_string(),
            rank: "Binh nhì".to_string(),
            role: "Chiến sĩ".to_string(),
            unit: "c2".to_string(),
        }
    }

    #[tokio::test]
    async fn login_round_trips_and_clears() {
        let store = store();

        store.set_login(identity()).await.expect("set");
        let state = store.load().await.expect("load");
        assert_eq!(state.login.as_ref().map(|l| l.name.as_str()), Some("Nguyễn Văn A"));

        store.clear_login().await.expect("clear");
        assert!(store.load().await.expect("load").login.is_none());
        tokio::fs::remove_file(&store.path).await.ok();
    }

    #[tokio::test]
    async fn malformed_state_resets_to_default() {
        let store = store();
        tokio::fs::write(&store.path, b"[not an object").await.expect("write");

        let state = store.load().await.expect("load");

        assert!(state.login.is_none());
        assert!(state.history.is_empty());
        tokio::fs::remove_file(&store.path).await.ok();
    }

    #[tokio::test]
    async fn history_appends_in_order() {
        let store = store();
        let mut result = ExamResult {
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

        store.append_history(result.clone()).await.expect("append");
        result.name = "B".to_string();
        store.append_history(result).await.expect("append");

        let state = store.load().await.expect("load");
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[1].name, "B");

        store.clear_history().await.expect("clear");
        assert!(store.load().await.expect("load").history.is_empty());
        tokio::fs::remove_file(&store.path).await.ok();
    }
}
