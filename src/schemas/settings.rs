use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public view of the exam settings; admin credentials are never exposed here.
#[derive(Debug, Serialize)]
pub(crate) struct SettingsPublic {
    pub(crate) questions_per_exam: u64,
    pub(crate) exam_duration_seconds: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SettingsUpdate {
    #[serde(alias = "defaultQuestionsCount")]
    #[validate(range(min = 1, message = "questions_per_exam must be at least 1"))]
    pub(crate) questions_per_exam: u64,
    #[serde(alias = "examTime")]
    #[validate(range(min = 1, message = "exam_duration_seconds must be at least 1"))]
    pub(crate) exam_duration_seconds: u64,
}
