use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;

/// Remaining time at which the clock turns red.
const LOW_TIME_SECS: u64 = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let question = app.session().current_question();
    let has_code = question.code.is_some();
    let chunks = create_layout(area, has_code);

    render_header(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.prompt);

    let options_chunk = match &question.code {
        Some(code) => {
            render_code_block(frame, chunks[2], code);
            chunks[3]
        }
        None => chunks[2],
    };

    render_options(
        frame,
        options_chunk,
        &question.options,
        app.highlighted_option(),
        app.session().current_selection(),
    );

    let footer = &chunks[chunks.len() - 2..];
    super::render_notice(frame, footer[0], app.notice());
    render_controls(frame, footer[1], app);
}

fn create_layout(area: Rect, has_code: bool) -> std::rc::Rc<[Rect]> {
    if has_code {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(2)
        .split(area)
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let [progress_area, clock_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]).areas(area);

    let progress = format!(
        "Question {}/{}  ·  {} answered",
        session.current_index() + 1,
        session.question_count(),
        session.answered_count()
    );
    frame.render_widget(Paragraph::new(progress).fg(Color::DarkGray), progress_area);

    let remaining = app.remaining_seconds();
    let clock_color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Green
    };
    let clock = Paragraph::new(format!("Time left {}", format_clock(remaining)))
        .alignment(Alignment::Right)
        .fg(clock_color)
        .bold();
    frame.render_widget(clock, clock_area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_code_block(frame: &mut Frame, area: Rect, code: &str) {
    let code_lines: Vec<Line> = code
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Yellow))))
        .collect();

    let widget = Paragraph::new(code_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String],
    highlighted: usize,
    selected: Option<&str>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_highlighted = index == highlighted;
        let is_selected = selected == Some(option.as_str());
        let style = match (is_highlighted, is_selected) {
            (true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_highlighted { ">" } else { " " };
        let check = if is_selected { "(*)" } else { "( )" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let mut controls = vec!["j/k move", "enter select"];
    if session.current_index() > 0 {
        controls.push("h back");
    }
    if session.is_last_question() {
        controls.push("s submit");
    } else {
        controls.push("l next");
    }
    controls.push("q quit");

    let widget = Paragraph::new(controls.join("  ·  "))
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

/// `mm:ss` rendering of a second count.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(26), '?');
    }
}
