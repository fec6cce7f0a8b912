//! Session transition rules.
//!
//! All mutation goes through the methods on [`SessionState`]; the selection
//! and answer containers are only ever handed out as slices.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::{validate_questions, Question, QuestionError};

/// The chosen and correct option for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub chosen_option: String,
    pub correct_option: String,
}

impl AnswerRecord {
    pub fn is_correct(&self) -> bool {
        self.chosen_option == self.correct_option
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Answering questions.
    InProgress,
    /// Score computed, waiting for the result to be saved.
    Submitting { score: usize },
    /// Terminal.
    Submitted { score: usize },
}

/// Outcome of a requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    Applied,
    Rejected(Rejection),
}

impl Transition {
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Why a transition was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotInProgress,
    AtFirstQuestion,
    AtLastQuestion,
    UnknownOption,
}

pub struct SessionState {
    questions: Arc<[Question]>,
    current_index: usize,
    selections: Vec<Option<String>>,
    answer_log: Vec<Option<AnswerRecord>>,
    status: SessionStatus,
}

impl SessionState {
    /// Start a session over `questions`, failing fast on malformed input.
    pub fn new(questions: Arc<[Question]>) -> Result<Self, QuestionError> {
        validate_questions(&questions)?;
        let count = questions.len();

        Ok(Self {
            questions,
            current_index: 0,
            selections: vec![None; count],
            answer_log: vec![None; count],
            status: SessionStatus::InProgress,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn selections(&self) -> &[Option<String>] {
        &self.selections
    }

    /// The selection for the question currently shown.
    pub fn current_selection(&self) -> Option<&str> {
        self.selections[self.current_index].as_deref()
    }

    pub fn answer_log(&self) -> &[Option<AnswerRecord>] {
        &self.answer_log
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.status, SessionStatus::Submitted { .. })
    }

    /// Final score; only available once submitted.
    pub fn score(&self) -> Option<usize> {
        match self.status {
            SessionStatus::Submitted { score } => Some(score),
            _ => None,
        }
    }

    /// Record `option` for the current question. Re-selecting overwrites.
    pub fn select_option(&mut self, option: &str) -> Transition {
        if !self.is_in_progress() {
            return self.reject("select_option", Rejection::NotInProgress);
        }

        let index = self.current_index;
        let question = &self.questions[index];
        if question.option_index(option).is_none() {
            return self.reject("select_option", Rejection::UnknownOption);
        }

        self.selections[index] = Some(option.to_string());
        self.answer_log[index] = Some(AnswerRecord {
            question_index: index,
            chosen_option: option.to_string(),
            correct_option: question.correct_option.clone(),
        });

        debug!(question = index + 1, option, "selected option");
        Transition::Applied
    }

    pub fn go_next(&mut self) -> Transition {
        if !self.is_in_progress() {
            return self.reject("go_next", Rejection::NotInProgress);
        }
        if self.is_last_question() {
            return self.reject("go_next", Rejection::AtLastQuestion);
        }

        self.current_index += 1;
        Transition::Applied
    }

    pub fn go_back(&mut self) -> Transition {
        if !self.is_in_progress() {
            return self.reject("go_back", Rejection::NotInProgress);
        }
        if self.current_index == 0 {
            return self.reject("go_back", Rejection::AtFirstQuestion);
        }

        self.current_index -= 1;
        Transition::Applied
    }

    /// Enter `Submitting`, freezing the score from the selections present
    /// right now. Returns `None` if a submission already started.
    pub fn begin_submit(&mut self) -> Option<usize> {
        if !self.is_in_progress() {
            debug!(status = ?self.status, "ignoring duplicate submit");
            return None;
        }

        let score = self.calculate_score();
        self.status = SessionStatus::Submitting { score };
        Some(score)
    }

    /// Finish a submission started with [`Self::begin_submit`].
    pub fn complete_submit(&mut self) -> Transition {
        match self.status {
            SessionStatus::Submitting { score } => {
                self.status = SessionStatus::Submitted { score };
                Transition::Applied
            }
            _ => self.reject("complete_submit", Rejection::NotInProgress),
        }
    }

    /// Number of selections equal to their question's correct option.
    pub fn calculate_score(&self) -> usize {
        self.selections
            .iter()
            .zip(self.questions.iter())
            .filter(|(selection, question)| {
                selection
                    .as_deref()
                    .is_some_and(|chosen| question.is_correct(chosen))
            })
            .count()
    }

    fn reject(&self, operation: &'static str, reason: Rejection) -> Transition {
        debug!(operation, ?reason, index = self.current_index, "transition rejected");
        Transition::Rejected(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(correct: &[&str]) -> Arc<[Question]> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| Question::new(format!("Question {}", i + 1), ["A", "B", "C", "X"], *c))
            .collect()
    }

    #[test]
    fn test_new_session_starts_at_first_question() {
        let session = SessionState::new(questions(&["A", "B", "C"])).unwrap();

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.selections(), &[None, None, None]);
        assert!(session.answer_log().iter().all(Option::is_none));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.score(), None);
    }

    #[test]
    fn test_new_session_rejects_empty_questions() {
        let empty: Arc<[Question]> = Arc::from(Vec::new());
        assert_eq!(SessionState::new(empty).err(), Some(QuestionError::Empty));
    }

    #[test]
    fn test_select_overwrites_previous_answer() {
        let mut session = SessionState::new(questions(&["A"])).unwrap();

        assert!(session.select_option("B").is_applied());
        assert!(session.select_option("A").is_applied());
        assert!(session.select_option("A").is_applied());

        assert_eq!(session.selections(), &[Some("A".to_string())]);
        assert_eq!(
            session.answer_log()[0],
            Some(AnswerRecord {
                question_index: 0,
                chosen_option: "A".to_string(),
                correct_option: "A".to_string(),
            })
        );
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let mut session = SessionState::new(questions(&["A"])).unwrap();
        assert_eq!(
            session.select_option("Z"),
            Transition::Rejected(Rejection::UnknownOption)
        );
        assert_eq!(session.selections(), &[None]);
    }

    #[test]
    fn test_navigation_preserves_answers() {
        let mut session = SessionState::new(questions(&["A", "B", "C"])).unwrap();
        let _ = session.select_option("A");
        let selections = session.selections().to_vec();
        let log = session.answer_log().to_vec();

        assert!(session.go_next().is_applied());
        assert!(session.go_next().is_applied());
        assert_eq!(session.go_next(), Transition::Rejected(Rejection::AtLastQuestion));
        assert_eq!(session.current_index(), 2);
        assert!(session.go_back().is_applied());
        assert!(session.go_back().is_applied());
        assert_eq!(session.go_back(), Transition::Rejected(Rejection::AtFirstQuestion));

        assert_eq!(session.selections(), selections.as_slice());
        assert_eq!(session.answer_log(), log.as_slice());
        assert_eq!(session.current_selection(), Some("A"));
    }

    #[test]
    fn test_single_question_has_no_neighbours() {
        let mut session = SessionState::new(questions(&["A"])).unwrap();

        assert_eq!(session.go_next(), Transition::Rejected(Rejection::AtLastQuestion));
        assert_eq!(session.go_back(), Transition::Rejected(Rejection::AtFirstQuestion));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_score_counts_only_correct_selections() {
        let mut session = SessionState::new(questions(&["A", "B", "C", "A", "B"])).unwrap();
        // correct, correct, wrong, unanswered, correct
        for answer in [Some("A"), Some("B"), Some("X"), None, Some("B")] {
            if let Some(option) = answer {
                let _ = session.select_option(option);
            }
            let _ = session.go_next();
        }

        assert_eq!(session.begin_submit(), Some(3));
        assert!(session.complete_submit().is_applied());
        assert_eq!(session.score(), Some(3));
        assert_eq!(session.selections().len(), 5);
    }

    #[test]
    fn test_submit_is_single_shot() {
        let mut session = SessionState::new(questions(&["A", "B"])).unwrap();
        let _ = session.select_option("A");

        assert_eq!(session.begin_submit(), Some(1));
        assert_eq!(session.status(), SessionStatus::Submitting { score: 1 });
        assert_eq!(session.score(), None);
        // A second submit while the first is still saving is suppressed.
        assert_eq!(session.begin_submit(), None);

        assert!(session.complete_submit().is_applied());
        assert_eq!(session.begin_submit(), None);
        assert_eq!(
            session.complete_submit(),
            Transition::Rejected(Rejection::NotInProgress)
        );
        assert_eq!(session.score(), Some(1));
    }

    #[test]
    fn test_no_mutation_after_submission_starts() {
        let mut session = SessionState::new(questions(&["A", "B"])).unwrap();
        let _ = session.begin_submit();

        assert_eq!(session.select_option("A"), Transition::Rejected(Rejection::NotInProgress));
        assert_eq!(session.go_next(), Transition::Rejected(Rejection::NotInProgress));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.selections(), &[None, None]);
    }
}
