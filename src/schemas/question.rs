use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of answer choices every question carries.
pub(crate) const CHOICES_PER_QUESTION: usize = 4;

/// Category key -> ordered question list. Insertion order within a category
/// is preserved but carries no meaning.
pub(crate) type QuestionBank = HashMap<String, Vec<Question>>;

/// A single multiple-choice question. The serde aliases accept the legacy
/// data files produced by the original deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Question {
    #[serde(alias = "cauHoi")]
    pub(crate) text: String,
    #[serde(alias = "luaChon")]
    pub(crate) choices: Vec<String>,
    #[serde(alias = "dapAn")]
    pub(crate) answer_index: usize,
}

impl Question {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text must not be empty".to_string());
        }
        if self.choices.len() != CHOICES_PER_QUESTION {
            return Err(format!(
                "question must have exactly {CHOICES_PER_QUESTION} choices, got {}",
                self.choices.len()
            ));
        }
        if self.choices.iter().any(|choice| choice.trim().is_empty()) {
            return Err("choices must not be empty".to_string());
        }
        if self.answer_index >= self.choices.len() {
            return Err(format!(
                "answer_index {} out of range for {} choices",
                self.answer_index,
                self.choices.len()
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_bank(bank: &QuestionBank) -> Result<(), String> {
    for (category, questions) in bank {
        if category.trim().is_empty() {
            return Err("category key must not be empty".to_string());
        }
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|reason| format!("{category}[{index}]: {reason}"))?;
        }
    }
    Ok(())
}
