//! Error types for the core library

use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the store, the data sources and the repository.
///
/// Cloneable so one failed snapshot can reach every subscriber of an
/// observable query.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Database error: {0}")]
    Database(#[source] Arc<rusqlite::Error>),

    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Background job failed: {0}")]
    Background(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(Arc::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Self::Background("job was cancelled".to_string())
        } else {
            Self::Background(format!("job panicked: {}", err))
        }
    }
}

impl Error {
    /// True when the error reports a missing task rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}
