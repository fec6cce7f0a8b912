//! # timed-quiz
//!
//! A timed, single-session multiple-choice quiz for the terminal.
//!
//! Questions are shown one at a time; the user can move back and forth,
//! change answers, and submit on the last question. A countdown runs over
//! the whole session and submits it when time runs out. The final score is
//! handed to a [`ResultStore`] and a reviewable report can be downloaded.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use timed_quiz::{Config, Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::parse();
//!     let quiz = Quiz::from_config(&config)?;
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod config;
mod data;
mod export;
mod models;
pub mod session;
pub mod store;
pub mod terminal;
pub mod timer;
mod ui;

use std::io;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub use app::{App, Notice, NoticeLevel, QuizEvent};
pub use config::{Config, QuizSettings};
pub use data::{load_questions_from_json, LoadError};
pub use models::{AppState, Question, QuestionError};
pub use store::{JsonlResultStore, ResultRecord, ResultStore, StoreError};
pub use timer::TimerEvent;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("invalid questions: {0}")]
    InvalidQuestions(#[from] QuestionError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz session that can be run in the terminal.
pub struct Quiz {
    app: App,
    timer_events: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Quiz {
    /// Create a quiz over `questions`, saving the result to `store`.
    pub fn new(
        questions: Vec<Question>,
        store: Arc<dyn ResultStore>,
        settings: QuizSettings,
    ) -> Result<Self, QuizError> {
        let (tx, timer_events) = mpsc::unbounded_channel();
        let app = App::new(questions, store, settings, tx)?;
        Ok(Self { app, timer_events })
    }

    /// Load questions and wire up the JSON-lines result store from CLI
    /// configuration.
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(&config.questions)?;
        info!(count = questions.len(), path = %config.questions.display(), "loaded questions");
        let store = Arc::new(JsonlResultStore::new(config.results.clone()));
        Self::new(questions, store, config.settings())
    }

    /// Run the quiz in the terminal until the user quits or leaves after
    /// submitting.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        run_event_loop(guard.terminal(), &mut self.app, &mut self.timer_events).await
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

/// Serializes terminal input and countdown events into one handler.
async fn run_event_loop(
    terminal: &mut terminal::QuizTerminal,
    app: &mut App,
    timer_events: &mut mpsc::UnboundedReceiver<TimerEvent>,
) -> Result<(), QuizError> {
    let mut input = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if handle_input(app, key.code).await {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            Some(event) = timer_events.recv() => {
                app.on_timer(event).await;
            }
        }
    }

    if !app.session().is_submitted() {
        info!("quiz closed before submission");
    }
    Ok(())
}

/// Returns true if the app should exit.
async fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key).await,
        AppState::Result => handle_result_input(app, key).await,
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_quiz();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

async fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.highlight_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.highlight_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let _ = app.select_highlighted().await;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let _ = app.dispatch(QuizEvent::Back).await;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let _ = app.dispatch(QuizEvent::Next).await;
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if app.session().is_last_question() {
                let _ = app.dispatch(QuizEvent::Submit).await;
            } else {
                debug!(
                    question = app.session().current_index() + 1,
                    "submit key ignored before the last question"
                );
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

async fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('d') | KeyCode::Char('D') => {
            let _ = app.export_result().await;
        }
        KeyCode::Char('h') | KeyCode::Char('H') => return app.request_exit(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}
