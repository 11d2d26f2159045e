use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::schemas::result::ExamResult;
use crate::store::{read_json, write_json, StoreError};

/// Append-only archive of completed real-mode exams. Read-modify-write runs
/// under one lock per store handle.
#[derive(Clone)]
pub(crate) struct ResultStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ResultStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Arc::new(Mutex::new(())) }
    }

    pub(crate) async fn list(&self) -> Result<Vec<ExamResult>, StoreError> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    /// Append a result and return the assigned id.
    pub(crate) async fn append(&self, mut result: ExamResult) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut results: Vec<ExamResult> = read_json(&self.path).await?.unwrap_or_default();
        let id = Uuid::new_v4().to_string();
        result.id = Some(id.clone());
        results.push(result);

        write_json(&self.path, &results).await?;
        Ok(id)
    }

    /// Delete one record. Returns whether it existed.
    pub(crate) async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut results: Vec<ExamResult> = read_json(&self.path).await?.unwrap_or_default();
        let before = results.len();
        results.retain(|result| result.id.as_deref() != Some(id));

        if results.len() == before {
            return Ok(false);
        }

        write_json(&self.path, &results).await?;
        Ok(true)
    }

    pub(crate) async fn delete_all(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        write_json(&self.path, &Vec::<ExamResult>::new()).await
    }
}
