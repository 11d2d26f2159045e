pub(crate) mod identity;
pub(crate) mod machine;
pub(crate) mod random;
pub(crate) mod registry;
pub(crate) mod scoring;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    /// No questions exist for the requested category; no session is created.
    #[error("no questions available for category '{0}'")]
    EmptyCategory(String),
    #[error("exam session not found")]
    NotFound,
}
