//! The reviewable result report.
//!
//! Rendered both on the result screen and into an off-screen buffer when
//! the report is downloaded.

use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::session::{ResultSummary, ReviewEntry};

pub struct ResultReport<'a> {
    user: &'a str,
    summary: &'a ResultSummary,
    scroll: u16,
}

impl<'a> ResultReport<'a> {
    pub fn new(user: &'a str, summary: &'a ResultSummary) -> Self {
        Self {
            user,
            summary,
            scroll: 0,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn user(&self) -> &str {
        self.user
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let summary = self.summary;
        let grade_color = grade_color(summary.percentage());

        let mut lines = vec![
            Line::from(Span::styled(
                self.user.to_string(),
                Style::default().fg(Color::Cyan).bold(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Quiz Completed!",
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(Span::styled(
                format!(
                    "Total Score : {}/{}  ({:.0}%)",
                    summary.score,
                    summary.total,
                    summary.percentage()
                ),
                Style::default().fg(grade_color).bold(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Review Your Answers:",
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
        ];

        for entry in &summary.entries {
            lines.extend(entry_lines(entry));
        }

        lines
    }

    /// Columns needed to show every line without truncation.
    pub fn width(&self) -> u16 {
        let widest = self.lines().iter().map(Line::width).max().unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX)
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.lines().len()).unwrap_or(u16::MAX)
    }
}

impl Widget for ResultReport<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

fn entry_lines(entry: &ReviewEntry) -> [Line<'static>; 4] {
    let label = Style::default().fg(Color::DarkGray);
    let answer = match &entry.chosen_option {
        Some(chosen) => {
            let color = if entry.is_correct {
                Color::Green
            } else {
                Color::Red
            };
            Span::styled(chosen.clone(), Style::default().fg(color))
        }
        None => Span::styled("Not answered", Style::default().fg(Color::Red).italic()),
    };

    [
        Line::from(Span::styled(
            format!("Q{}: {}", entry.number(), entry.prompt),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(vec![Span::styled("  Your Answer: ", label), answer]),
        Line::from(vec![
            Span::styled("  Correct Answer: ", label),
            Span::styled(entry.correct_option.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ]
}

pub fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}
