use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::schemas::question::QuestionBank;
use crate::store::{read_json, write_json, StoreError};

/// Wholesale read/write access to the question bank file. A missing file is
/// an empty bank; a corrupt one is surfaced to the caller.
#[derive(Clone)]
pub(crate) struct QuestionBankStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl QuestionBankStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Arc::new(Mutex::new(())) }
    }

    pub(crate) async fn load(&self) -> Result<QuestionBank, StoreError> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    pub(crate) async fn save(&self, bank: &QuestionBank) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        write_json(&self.path, bank).await
    }
}
