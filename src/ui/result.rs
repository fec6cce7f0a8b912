use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

use super::report::ResultReport;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.summary() else {
        let waiting = Paragraph::new("Saving your result...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::horizontal(1));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let scroll = u16::try_from(app.result_scroll()).unwrap_or(u16::MAX);
    frame.render_widget(
        ResultReport::new(app.user_name(), &summary).scroll(scroll),
        inner,
    );

    super::render_notice(frame, chunks[1], app.notice());
    render_controls(frame, chunks[2]);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  d download report  ·  h back to home  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
