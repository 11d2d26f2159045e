use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::time::format_offset;
use crate::schemas::question::Question;
use crate::session::identity::ExamineeIdentity;
use crate::session::machine::{ExamMode, ExamSession};
use crate::session::scoring::Grade;

/// Session start request; the exam category is the identity's own category.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionStart {
    #[serde(flatten)]
    pub(crate) identity: ExamineeIdentity,
    pub(crate) mode: ExamMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerSelect {
    pub(crate) question_index: usize,
    pub(crate) choice_index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmitRequest {
    /// Real-mode submissions must set this unless the deadline forced them.
    #[serde(default)]
    pub(crate) confirmed: bool,
}

/// A question as shown to the examinee. The correct choice is only revealed
/// once the session is submitted.
#[derive(Debug, Serialize)]
pub(crate) struct SnapshotQuestion {
    pub(crate) text: String,
    pub(crate) choices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) answer_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionSnapshot {
    pub(crate) id: String,
    pub(crate) category: String,
    pub(crate) mode: ExamMode,
    pub(crate) state: &'static str,
    pub(crate) questions: Vec<SnapshotQuestion>,
    pub(crate) answers: Vec<i32>,
    pub(crate) remaining_seconds: u64,
    pub(crate) duration_seconds: u64,
    pub(crate) started_at: String,
    pub(crate) insufficient_questions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) result: Option<Grade>,
}

impl SessionSnapshot {
    pub(crate) fn of(session: &ExamSession, now: OffsetDateTime) -> Self {
        let submitted = session.is_submitted();
        let questions = session
            .questions
            .iter()
            .map(|question: &Question| SnapshotQuestion {
                text: question.text.clone(),
                choices: question.choices.clone(),
                answer_index: submitted.then_some(question.answer_index),
            })
            .collect();

        Self {
            id: session.id.clone(),
            category: session.category.clone(),
            mode: session.mode,
            state: if submitted { "submitted" } else { "in_progress" },
            questions,
            answers: session.answers.clone(),
            remaining_seconds: session.remaining_seconds(now),
            duration_seconds: session.duration_seconds,
            started_at: format_offset(session.started_at),
            insufficient_questions: session.insufficient_questions,
            result: session.grade().cloned(),
        }
    }
}
