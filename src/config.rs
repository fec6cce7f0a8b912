//! Configuration and CLI argument handling.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::timer::{DEFAULT_DURATION_SECS, TICK_PERIOD};

#[derive(Parser, Debug, Clone)]
#[command(name = "timed-quiz", version, about = "A timed multiple-choice quiz in the terminal")]
pub struct Config {
    /// JSON file to load the questions from
    #[arg(short, long)]
    pub questions: PathBuf,

    /// Name shown on the result report
    #[arg(short, long, default_value = "player")]
    pub name: String,

    /// Time limit for the whole quiz, in seconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DURATION_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub duration: u64,

    /// File final scores are appended to, one JSON object per line
    #[arg(long, default_value = "quiz-results.jsonl")]
    pub results: PathBuf,

    /// Directory result reports are downloaded to
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Log file; the terminal itself is used by the quiz
    #[arg(long, default_value = "timed-quiz.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn settings(&self) -> QuizSettings {
        QuizSettings {
            user_name: self.name.clone(),
            duration_seconds: self.duration,
            tick_period: TICK_PERIOD,
            export_dir: self.export_dir.clone(),
        }
    }
}

/// Per-session settings, independent of how they were supplied.
#[derive(Debug, Clone)]
pub struct QuizSettings {
    pub user_name: String,
    pub duration_seconds: u64,
    pub tick_period: Duration,
    pub export_dir: PathBuf,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            user_name: "player".to_string(),
            duration_seconds: DEFAULT_DURATION_SECS,
            tick_period: TICK_PERIOD,
            export_dir: PathBuf::from("."),
        }
    }
}
