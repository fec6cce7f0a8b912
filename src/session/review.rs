//! Read-only result projection.

use serde::Serialize;

use super::state::SessionState;

/// One reviewed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub question_index: usize,
    pub prompt: String,
    /// `None` when the question was never answered.
    pub chosen_option: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
}

impl ReviewEntry {
    /// 1-based question number for display.
    pub fn number(&self) -> usize {
        self.question_index + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub entries: Vec<ReviewEntry>,
}

impl ResultSummary {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Pair every question with its answer record. `None` until the session
/// is submitted.
pub fn derive_review(state: &SessionState) -> Option<ResultSummary> {
    let score = state.score()?;

    let entries = state
        .questions()
        .iter()
        .zip(state.answer_log())
        .enumerate()
        .map(|(index, (question, record))| ReviewEntry {
            question_index: index,
            prompt: question.prompt.clone(),
            chosen_option: record.as_ref().map(|r| r.chosen_option.clone()),
            correct_option: question.correct_option.clone(),
            is_correct: record.as_ref().is_some_and(|r| r.is_correct()),
        })
        .collect();

    Some(ResultSummary {
        score,
        total: state.question_count(),
        entries,
    })
}

impl SessionState {
    pub fn review(&self) -> Option<ResultSummary> {
        derive_review(self)
    }
}
