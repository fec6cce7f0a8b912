use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(alias = "question", alias = "text")]
    pub prompt: String,
    #[serde(default)]
    pub code: Option<String>,
    pub options: Vec<String>,
    #[serde(alias = "correct")]
    pub correct_option: String,
}

/// Why a question set cannot back a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("at least one question is required")]
    Empty,

    #[error("question {} has no options", .index + 1)]
    NoOptions { index: usize },

    #[error("question {}: correct option {correct:?} is not one of its options", .index + 1)]
    CorrectOptionMissing { index: usize, correct: String },
}

impl Question {
    pub fn new<I, S>(prompt: impl Into<String>, options: I, correct_option: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            code: None,
            options: options.into_iter().map(Into::into).collect(),
            correct_option: correct_option.into(),
        }
    }

    /// Position of `option` among this question's options.
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option == option
    }

    fn validate(&self, index: usize) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions { index });
        }
        if self.option_index(&self.correct_option).is_none() {
            return Err(QuestionError::CorrectOptionMissing {
                index,
                correct: self.correct_option.clone(),
            });
        }
        Ok(())
    }
}

/// Checks the preconditions a session relies on: a non-empty sequence where
/// every question offers its own correct option.
pub fn validate_questions(questions: &[Question]) -> Result<(), QuestionError> {
    if questions.is_empty() {
        return Err(QuestionError::Empty);
    }
    questions
        .iter()
        .enumerate()
        .try_for_each(|(index, question)| question.validate(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_questions() {
        let good = vec![Question::new("2 + 2?", ["3", "4"], "4")];
        assert!(validate_questions(&good).is_ok());

        assert_eq!(validate_questions(&[]), Err(QuestionError::Empty));

        let no_options = vec![good[0].clone(), Question::new("?", Vec::<String>::new(), "x")];
        assert_eq!(
            validate_questions(&no_options),
            Err(QuestionError::NoOptions { index: 1 })
        );

        let missing = vec![Question::new("Capital of France?", ["Paris", "Rome"], "paris")];
        assert_eq!(
            validate_questions(&missing),
            Err(QuestionError::CorrectOptionMissing {
                index: 0,
                correct: "paris".to_string(),
            })
        );
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"[
            {"question": "Pick A", "options": ["A", "B"], "correct": "A"},
            {"prompt": "Pick B", "code": "let x = 1;", "options": ["A", "B"], "correct_option": "B"}
        ]"#;
        let questions: Vec<Question> = serde_json::from_str(json).unwrap();

        assert_eq!(questions[0].prompt, "Pick A");
        assert_eq!(questions[0].code, None);
        assert_eq!(questions[0].correct_option, "A");
        assert_eq!(questions[1].code.as_deref(), Some("let x = 1;"));
        assert_eq!(questions[1].option_index("B"), Some(1));
    }
}
