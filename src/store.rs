//! Final score persistence.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// What gets saved when a session is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub session_id: Uuid,
    pub user: String,
    pub score: usize,
    pub total: usize,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write results to {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to encode result record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination for submitted results. Called once per session.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, record: &ResultRecord) -> Result<(), StoreError>;
}

/// Appends each result as one JSON line.
pub struct JsonlResultStore {
    path: PathBuf,
}

impl JsonlResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ResultStore for JsonlResultStore {
    async fn save(&self, record: &ResultRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), score = record.score, "saved result");
        Ok(())
    }
}
