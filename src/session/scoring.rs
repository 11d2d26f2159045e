use serde::Serialize;

use crate::schemas::question::Question;

/// Computed exam grade on the 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Grade {
    pub(crate) correct_count: usize,
    pub(crate) total_count: usize,
    /// Two-decimal string, e.g. "8.00".
    pub(crate) score: String,
}

/// Pure scoring: an answer matches when it equals the question's
/// `answer_index`; the unanswered sentinel (-1) never matches. Callers
/// guarantee a non-empty question set.
pub(crate) fn grade(questions: &[Question], answers: &[i32]) -> Grade {
    debug_assert!(!questions.is_empty(), "grading requires at least one question");
    debug_assert_eq!(questions.len(), answers.len());

    let correct_count = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| **answer == question.answer_index as i32)
        .count();

    let total_count = questions.len();
    let score = format!("{:.2}", correct_count as f64 / total_count as f64 * 10.0);

    Grade { correct_count, total_count, score }
}
