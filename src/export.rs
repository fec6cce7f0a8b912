//! Result report download.
//!
//! The report widget is captured into an off-screen buffer and the captured
//! text is written out as a document. Nothing here touches session state.

use std::io;
use std::path::{Path, PathBuf};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::ui::ResultReport;

const MIN_CAPTURE_WIDTH: u16 = 40;
const MAX_CAPTURE_WIDTH: u16 = 160;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the captured report was blank")]
    BlankCapture,

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Render `report` into a buffer sized to its content.
pub fn capture(report: ResultReport<'_>) -> Buffer {
    let width = report.width().clamp(MIN_CAPTURE_WIDTH, MAX_CAPTURE_WIDTH);
    let area = Rect::new(0, 0, width, report.height());
    let mut buffer = Buffer::empty(area);
    report.render(area, &mut buffer);
    buffer
}

/// Plain-text contents of a captured buffer, one line per row.
pub fn snapshot_text(buffer: &Buffer) -> Result<String, ExportError> {
    let width = usize::from(buffer.area.width);
    if width == 0 {
        return Err(ExportError::BlankCapture);
    }

    let rows: Vec<String> = buffer
        .content()
        .chunks(width)
        .map(|row| {
            let text: String = row.iter().map(|cell| cell.symbol()).collect();
            text.trim_end().to_string()
        })
        .collect();

    if rows.iter().all(|row| row.trim().is_empty()) {
        return Err(ExportError::BlankCapture);
    }

    let mut text = rows.join("\n");
    text.push('\n');
    Ok(text)
}

/// `quiz-result-<user>.txt`, with anything unsafe in a file name replaced.
pub fn report_file_name(user: &str) -> String {
    let name: String = user
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.is_empty() { "player" } else { name.as_str() };
    format!("quiz-result-{}.txt", name)
}

/// Capture `report` and write it into `dir`, returning the document path.
pub async fn export_report(report: ResultReport<'_>, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(report_file_name(report.user()));
    let text = snapshot_text(&capture(report))?;

    let write_error = |source| ExportError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).await.map_err(write_error)?;
    fs::write(&path, text).await.map_err(write_error)?;

    info!(path = %path.display(), "exported result report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ResultSummary, ReviewEntry};

    fn summary() -> ResultSummary {
        ResultSummary {
            score: 0,
            total: 1,
            entries: vec![ReviewEntry {
                question_index: 0,
                prompt: "Which keyword declares an immutable binding?".to_string(),
                chosen_option: Some("mut".to_string()),
                correct_option: "let".to_string(),
                is_correct: false,
            }],
        }
    }

    #[test]
    fn test_capture_contains_review() {
        let summary = summary();
        let text = snapshot_text(&capture(ResultReport::new("bob", &summary))).unwrap();

        assert!(text.starts_with("bob\n"));
        assert!(text.contains("Total Score : 0/1  (0%)"));
        assert!(text.contains("Q1: Which keyword declares an immutable binding?"));
        assert!(text.contains("  Your Answer: mut"));
        assert!(text.contains("  Correct Answer: let"));
    }

    #[test]
    fn test_blank_capture_is_rejected() {
        let blank = Buffer::empty(Rect::new(0, 0, 20, 3));
        assert!(matches!(snapshot_text(&blank), Err(ExportError::BlankCapture)));

        let empty = Buffer::empty(Rect::new(0, 0, 0, 0));
        assert!(matches!(snapshot_text(&empty), Err(ExportError::BlankCapture)));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("alice"), "quiz-result-alice.txt");
        assert_eq!(report_file_name("a/b c"), "quiz-result-a_b_c.txt");
        assert_eq!(report_file_name("  "), "quiz-result-player.txt");
    }

    #[tokio::test]
    async fn test_export_writes_document() {
        let dir = std::env::temp_dir().join(format!("timed-quiz-export-{}", uuid::Uuid::new_v4()));
        let summary = summary();

        let path = export_report(ResultReport::new("bob", &summary), &dir)
            .await
            .unwrap();

        assert_eq!(path, dir.join("quiz-result-bob.txt"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Quiz Completed!"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
