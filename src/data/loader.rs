use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{validate_questions, Question, QuestionError};

/// Failure to turn a question file into a usable question set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid questions in {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: QuestionError,
    },
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<Question> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_questions(&questions).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), count = questions.len(), "loaded questions");
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("questions-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            r#"[{"question": "Pick A", "options": ["A", "B", "C", "D"], "correct": "A"}]"#,
        );
        let questions = load_questions_from_json(&path).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 4);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_rejects_empty_set() {
        let path = write_temp("[]");
        let err = load_questions_from_json(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid {
                source: QuestionError::Empty,
                ..
            }
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_reports_parse_and_read_errors() {
        let path = write_temp("{not json");
        assert!(matches!(
            load_questions_from_json(&path),
            Err(LoadError::Parse { .. })
        ));
        fs::remove_file(&path).unwrap();

        assert!(matches!(
            load_questions_from_json(&path),
            Err(LoadError::Read { .. })
        ));
    }
}
