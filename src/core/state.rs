use std::sync::Arc;

use crate::core::config::Settings;
use crate::session::registry::SessionRegistry;
use crate::store::local::LocalStateStore;
use crate::store::questions::QuestionBankStore;
use crate::store::results::ResultStore;
use crate::store::settings::{ExamConfig, SettingsStore};

/// Shared application state handed to every handler. Cloning is cheap; all
/// fields live behind one `Arc`.
#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    questions: QuestionBankStore,
    exam_config: SettingsStore,
    results: ResultStore,
    local: LocalStateStore,
    sessions: SessionRegistry,
}

impl AppState {
    pub(crate) fn from_settings(settings: Settings) -> Self {
        let data = settings.data();
        let seed = ExamConfig {
            questions_per_exam: settings.exam().questions_per_exam,
            exam_duration_seconds: settings.exam().exam_duration_seconds,
            admin_username: settings.admin().default_admin_username.clone(),
            admin_password_hash: String::new(),
        };

        let inner = InnerState {
            questions: QuestionBankStore::new(data.questions_path()),
            exam_config: SettingsStore::new(data.settings_path(), seed),
            results: ResultStore::new(data.results_path()),
            local: LocalStateStore::new(data.local_state_path()),
            sessions: SessionRegistry::new(),
            settings,
        };

        Self { inner: Arc::new(inner) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn questions(&self) -> &QuestionBankStore {
        &self.inner.questions
    }

    pub(crate) fn exam_config(&self) -> &SettingsStore {
        &self.inner.exam_config
    }

    pub(crate) fn results(&self) -> &ResultStore {
        &self.inner.results
    }

    pub(crate) fn local(&self) -> &LocalStateStore {
        &self.inner.local
    }

    pub(crate) fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
