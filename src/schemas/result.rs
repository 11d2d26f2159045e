use serde::{Deserialize, Serialize};

use crate::schemas::question::Question;

/// A completed real-mode exam attempt. Immutable once created; the result
/// store assigns `id` on append. Aliases accept records written by the
/// original deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExamResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(alias = "username")]
    pub(crate) name: String,
    #[serde(alias = "doituong")]
    pub(crate) category: String,
    #[serde(alias = "capbac")]
    pub(crate) rank: String,
    #[serde(alias = "chucvu")]
    pub(crate) role: String,
    #[serde(alias = "donvi")]
    pub(crate) unit: String,
    pub(crate) timestamp: String,
    #[serde(alias = "correct")]
    pub(crate) correct_count: usize,
    #[serde(alias = "total")]
    pub(crate) total_count: usize,
    pub(crate) score: String,
    pub(crate) answers: Vec<i32>,
    pub(crate) questions: Vec<Question>,
}
