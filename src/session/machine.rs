use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::time::{elapsed_seconds, format_offset};
use crate::schemas::question::Question;
use crate::schemas::result::ExamResult;
use crate::session::identity::ExamineeIdentity;
use crate::session::random;
use crate::session::scoring::{self, Grade};
use crate::session::SessionError;

/// Answer sentinel for a question the examinee has not touched.
pub(crate) const UNANSWERED: i32 = -1;

/// Remaining-time threshold for the one-shot low-time warning.
pub(crate) const LOW_TIME_WARNING_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExamMode {
    /// Scored, timed, persisted.
    Real,
    /// Scored and timed, never persisted.
    Practice,
}

#[derive(Debug)]
pub(crate) struct StartParams {
    pub(crate) id: String,
    pub(crate) identity: ExamineeIdentity,
    pub(crate) category: String,
    pub(crate) mode: ExamMode,
    pub(crate) question_count: usize,
    pub(crate) duration_seconds: u64,
    pub(crate) now: OffsetDateTime,
}

/// What a 1 Hz tick observed.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TickOutcome {
    pub(crate) remaining_seconds: u64,
    pub(crate) low_time_warning: bool,
    pub(crate) auto_submitted: bool,
}

#[derive(Debug)]
pub(crate) struct SubmitOutcome {
    pub(crate) grade: Grade,
    /// False when the session was already submitted; the call was a no-op.
    pub(crate) first: bool,
}

/// One in-memory exam attempt: `start` is the only way in, `submit` the only
/// way out. A failed start leaves nothing behind, so every live value is
/// either in progress or submitted.
#[derive(Debug)]
pub(crate) struct ExamSession {
    pub(crate) id: String,
    pub(crate) identity: ExamineeIdentity,
    pub(crate) category: String,
    pub(crate) mode: ExamMode,
    pub(crate) questions: Vec<Question>,
    pub(crate) answers: Vec<i32>,
    pub(crate) started_at: OffsetDateTime,
    pub(crate) duration_seconds: u64,
    /// Set when the category held fewer questions than configured.
    pub(crate) insufficient_questions: bool,
    low_time_warned: bool,
    previous_remaining: u64,
    grade: Option<Grade>,
    submitted_at: Option<OffsetDateTime>,
}

impl ExamSession {
    /// Build a session from the category's question pool. An empty pool is
    /// `EmptyCategory`: no session is created and nothing changes.
    pub(crate) fn start<R: Rng>(
        params: StartParams,
        pool: &[Question],
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::EmptyCategory(params.category));
        }

        let selection = random::select_session_questions(pool, params.question_count, rng);
        let answers = vec![UNANSWERED; selection.questions.len()];

        Ok(Self {
            id: params.id,
            identity: params.identity,
            category: params.category,
            mode: params.mode,
            questions: selection.questions,
            answers,
            started_at: params.now,
            duration_seconds: params.duration_seconds,
            insufficient_questions: selection.clamped,
            low_time_warned: false,
            previous_remaining: params.duration_seconds,
            grade: None,
            submitted_at: None,
        })
    }

    pub(crate) fn is_submitted(&self) -> bool {
        self.grade.is_some()
    }

    pub(crate) fn grade(&self) -> Option<&Grade> {
        self.grade.as_ref()
    }

    pub(crate) fn submitted_at(&self) -> Option<OffsetDateTime> {
        self.submitted_at
    }

    /// Remaining time derived purely from wall clock against `started_at`,
    /// never from a decremented counter.
    pub(crate) fn remaining_seconds(&self, now: OffsetDateTime) -> u64 {
        if self.is_submitted() {
            return 0;
        }
        self.duration_seconds.saturating_sub(elapsed_seconds(self.started_at, now))
    }

    /// Record a single-choice answer, overwriting any prior pick. Silently
    /// ignored after submission, after time has run out, or for out-of-range
    /// indexes (caller preconditions, not errors).
    pub(crate) fn select_answer(
        &mut self,
        now: OffsetDateTime,
        question_index: usize,
        choice_index: usize,
    ) -> bool {
        if self.is_submitted() || self.remaining_seconds(now) == 0 {
            return false;
        }
        let Some(question) = self.questions.get(question_index) else {
            return false;
        };
        if choice_index >= question.choices.len() {
            return false;
        }

        self.answers[question_index] = choice_index as i32;
        true
    }

    /// Advance the countdown. Fires the low-time warning once when the
    /// remaining time crosses the threshold (a skipped tick still warns),
    /// and force-submits when time is up. Ticks after submission are no-ops.
    pub(crate) fn tick(&mut self, now: OffsetDateTime) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::default();
        }

        let remaining = self.remaining_seconds(now);

        let low_time_warning = !self.low_time_warned
            && remaining > 0
            && self.previous_remaining > LOW_TIME_WARNING_SECONDS
            && remaining <= LOW_TIME_WARNING_SECONDS;
        if low_time_warning {
            self.low_time_warned = true;
        }
        self.previous_remaining = remaining;

        let auto_submitted = remaining == 0;
        if auto_submitted {
            self.submit(now);
        }

        TickOutcome { remaining_seconds: remaining, low_time_warning, auto_submitted }
    }

    /// Grade the attempt. Idempotent: a second call returns the stored grade
    /// with no further effect. Confirmation of non-forced real-mode
    /// submissions is gated by the caller, not here.
    pub(crate) fn submit(&mut self, now: OffsetDateTime) -> SubmitOutcome {
        if let Some(grade) = &self.grade {
            return SubmitOutcome { grade: grade.clone(), first: false };
        }

        let grade = scoring::grade(&self.questions, &self.answers);
        self.grade = Some(grade.clone());
        self.submitted_at = Some(now);

        SubmitOutcome { grade, first: true }
    }

    /// Snapshot the submitted attempt as a persistable result record.
    pub(crate) fn to_result(&self) -> Option<ExamResult> {
        let grade = self.grade.as_ref()?;
        let submitted_at = self.submitted_at?;

        Some(ExamResult {
            id: None,
            name: self.identity.name.clone(),
            category: self.category.clone(),
            rank: self.identity.rank.clone(),
            role: self.identity.role.clone(),
            unit: self.identity.unit.clone(),
            timestamp: format_offset(submitted_at),
            correct_count: grade.correct_count,
            total_count: grade.total_count,
            score: grade.score.clone(),
            answers: self.answers.clone(),
            questions: self.questions.clone(),
        })
    }
}
