//! Quiz application state.
//!
//! [`App`] is the single place user input and timer events are turned into
//! session transitions. It also carries the UI-only state (highlighted
//! option, result scroll, notices) the terminal front end renders.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::QuizSettings;
use crate::export::export_report;
use crate::models::{AppState, Question, QuestionError};
use crate::session::{Rejection, ResultSummary, SessionState, Transition};
use crate::store::{ResultRecord, ResultStore};
use crate::timer::{Countdown, TimerEvent};
use crate::ui::ResultReport;

/// An input to the session, from the user or the countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Select(String),
    Next,
    Back,
    Submit,
    /// The countdown ran out.
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A non-fatal message shown below the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

pub struct App {
    pub state: AppState,
    session: SessionState,
    session_id: Uuid,
    settings: QuizSettings,
    store: Arc<dyn ResultStore>,
    timer_events: mpsc::UnboundedSender<TimerEvent>,
    countdown: Option<Countdown>,
    remaining_seconds: u64,
    highlighted_option: usize,
    result_scroll: usize,
    notice: Option<Notice>,
}

impl App {
    /// Create the app for one session. Countdown events are sent to
    /// `timer_events` once the quiz starts.
    pub fn new(
        questions: Vec<Question>,
        store: Arc<dyn ResultStore>,
        settings: QuizSettings,
        timer_events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Result<Self, QuestionError> {
        let session = SessionState::new(Arc::from(questions))?;

        Ok(Self {
            state: AppState::Welcome,
            session,
            session_id: Uuid::new_v4(),
            remaining_seconds: settings.duration_seconds,
            settings,
            store,
            timer_events,
            countdown: None,
            highlighted_option: 0,
            result_scroll: 0,
            notice: None,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn user_name(&self) -> &str {
        &self.settings.user_name
    }

    pub fn duration_seconds(&self) -> u64 {
        self.settings.duration_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn highlighted_option(&self) -> usize {
        self.highlighted_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Review of the submitted session.
    pub fn summary(&self) -> Option<ResultSummary> {
        self.session.review()
    }

    /// Leave the welcome screen and start the countdown.
    pub fn start_quiz(&mut self) {
        if self.state != AppState::Welcome {
            return;
        }

        info!(
            session_id = %self.session_id,
            questions = self.session.question_count(),
            "quiz started"
        );
        self.state = AppState::Quiz;
        self.remaining_seconds = self.settings.duration_seconds;
        self.countdown = Some(Countdown::start(
            self.settings.duration_seconds,
            self.settings.tick_period,
            self.timer_events.clone(),
        ));
        self.sync_highlight();
    }

    /// Apply one event to the session. Events are only accepted while the
    /// quiz screen is up, i.e. once the countdown is running.
    pub async fn dispatch(&mut self, event: QuizEvent) -> Transition {
        if self.state != AppState::Quiz {
            debug!(?event, state = ?self.state, "ignoring event outside the quiz screen");
            return Transition::Rejected(Rejection::NotInProgress);
        }

        let navigating = matches!(event, QuizEvent::Next | QuizEvent::Back);

        let transition = match event {
            QuizEvent::Select(option) => self.session.select_option(&option),
            QuizEvent::Next => self.session.go_next(),
            QuizEvent::Back => self.session.go_back(),
            QuizEvent::Submit => self.submit().await,
            QuizEvent::Deadline => {
                if self.session.is_in_progress() {
                    warn!(
                        question = self.session.current_index() + 1,
                        answered = self.session.answered_count(),
                        "time limit reached, forcing submission"
                    );
                    self.notice = Some(Notice::new(NoticeLevel::Warning, "Time's up!"));
                }
                self.submit().await
            }
        };

        if navigating && transition.is_applied() {
            self.sync_highlight();
        }
        transition
    }

    /// Feed a countdown event in. Events that arrive outside the quiz
    /// screen or after the session left `InProgress` are stale and ignored.
    pub async fn on_timer(&mut self, event: TimerEvent) {
        if self.state != AppState::Quiz || !self.session.is_in_progress() {
            debug!(?event, state = ?self.state, "ignoring stale timer event");
            return;
        }

        match event {
            TimerEvent::Tick { remaining } => self.remaining_seconds = remaining,
            TimerEvent::Expired => {
                self.remaining_seconds = 0;
                let _ = self.dispatch(QuizEvent::Deadline).await;
            }
        }
    }

    async fn submit(&mut self) -> Transition {
        let Some(score) = self.session.begin_submit() else {
            return Transition::Rejected(Rejection::NotInProgress);
        };

        if let Some(countdown) = self.countdown.take() {
            countdown.stop();
        }

        let total = self.session.question_count();
        info!(session_id = %self.session_id, score, total, "quiz submitted");

        let record = ResultRecord {
            session_id: self.session_id,
            user: self.settings.user_name.clone(),
            score,
            total,
            submitted_at: Utc::now(),
        };
        if let Err(e) = self.store.save(&record).await {
            error!(error = %e, "failed to save result");
            self.notice = Some(Notice::new(
                NoticeLevel::Warning,
                format!("Your score could not be saved: {}", e),
            ));
        }

        let transition = self.session.complete_submit();
        self.state = AppState::Result;
        self.result_scroll = 0;
        transition
    }

    pub fn highlight_next_option(&mut self) {
        let count = self.session.current_question().options.len();
        self.highlighted_option = (self.highlighted_option + 1) % count;
    }

    pub fn highlight_previous_option(&mut self) {
        let count = self.session.current_question().options.len();
        self.highlighted_option = (self.highlighted_option + count - 1) % count;
    }

    /// Select the option under the cursor.
    pub async fn select_highlighted(&mut self) -> Transition {
        let question = self.session.current_question();
        let Some(option) = question.options.get(self.highlighted_option).cloned() else {
            return Transition::Rejected(Rejection::UnknownOption);
        };
        self.dispatch(QuizEvent::Select(option)).await
    }

    /// Put the cursor on the stored selection of the current question.
    fn sync_highlight(&mut self) {
        let question = self.session.current_question();
        self.highlighted_option = self
            .session
            .current_selection()
            .and_then(|selection| question.option_index(selection))
            .unwrap_or(0);
    }

    pub fn scroll_results_down(&mut self) {
        let Some(summary) = self.summary() else {
            return;
        };
        let report = ResultReport::new(&self.settings.user_name, &summary);
        let max_scroll = usize::from(report.height()).saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Download the result report. Failures become a notice; the session
    /// is never modified.
    pub async fn export_result(&mut self) -> Option<PathBuf> {
        let summary = self.summary()?;
        let report = ResultReport::new(&self.settings.user_name, &summary);

        match export_report(report, &self.settings.export_dir).await {
            Ok(path) => {
                self.notice = Some(Notice::new(
                    NoticeLevel::Info,
                    format!("Report saved to {}", path.display()),
                ));
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "report export failed");
                self.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    format!("Download failed: {}. Press [d] to try again.", e),
                ));
                None
            }
        }
    }

    /// Whether the host may leave the quiz. Only true once submitted.
    pub fn request_exit(&self) -> bool {
        if self.session.is_submitted() {
            info!(session_id = %self.session_id, "leaving quiz");
            true
        } else {
            false
        }
    }
}
