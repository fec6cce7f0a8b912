use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use timed_quiz::{Config, Quiz};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to open log file {}: {}", config.log_file.display(), e);
        return ExitCode::FAILURE;
    }

    let quiz = match Quiz::from_config(&config) {
        Ok(quiz) => quiz,
        Err(e) => {
            error!(error = %e, "failed to set up quiz");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = quiz.run().await {
        error!(error = %e, "quiz aborted");
        eprintln!("Error running quiz: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log to a file; stdout belongs to the quiz UI.
fn init_logging(config: &Config) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timed_quiz={}", config.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
