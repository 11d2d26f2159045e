use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::schemas::result::ExamResult;
use crate::session::machine::{ExamMode, ExamSession};
use crate::session::SessionError;

/// In-memory home of every live exam attempt. All mutation goes through the
/// single lock, so session operations stay sequentially consistent.
#[derive(Clone, Default)]
pub(crate) struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, ExamSession>>>,
}

impl SessionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert(&self, session: ExamSession) {
        self.inner.lock().await.insert(session.id.clone(), session);
    }

    /// Run `f` against the named session under the registry lock.
    pub(crate) async fn with<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ExamSession) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.inner.lock().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        Ok(f(session))
    }

    /// Discard a session (navigation away / logout). Returns whether it
    /// existed; in-flight persistence is left to finish on its own.
    pub(crate) async fn remove(&self, id: &str) -> bool {
        self.inner.lock().await.remove(id).is_some()
    }

    pub(crate) async fn active_count(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// One sweep of the 1 Hz countdown: tick every in-progress session,
    /// collect the result records of real-mode attempts that just hit their
    /// deadline, and drop submitted sessions past the retention window.
    pub(crate) async fn tick_all(
        &self,
        now: OffsetDateTime,
        retention_seconds: u64,
    ) -> Vec<ExamResult> {
        let mut sessions = self.inner.lock().await;
        let mut completed = Vec::new();
        let mut expired = Vec::new();

        for (id, session) in sessions.iter_mut() {
            if session.is_submitted() {
                if let Some(submitted_at) = session.submitted_at() {
                    let age = crate::core::time::elapsed_seconds(submitted_at, now);
                    if age >= retention_seconds {
                        expired.push(id.clone());
                    }
                }
                continue;
            }

            let outcome = session.tick(now);
            if outcome.low_time_warning {
                tracing::info!(session_id = %id, "Low-time warning: one minute remaining");
            }
            if outcome.auto_submitted {
                tracing::info!(session_id = %id, mode = ?session.mode, "Exam auto-submitted at deadline");
                metrics::counter!("exam_sessions_auto_submitted_total").increment(1);
                if session.mode == ExamMode::Real {
                    if let Some(result) = session.to_result() {
                        completed.push(result);
                    }
                }
            }
        }

        for id in expired {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Dropped submitted session past retention");
        }

        completed
    }
}
