use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid YouTube URL or video ID")]
    InvalidInput,

    #[error(transparent)]
    Source(#[from] ApiError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Commit {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Message carried by a remote error event, if this is one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            AppError::Source(ApiError::Remote { message }) => message.as_deref(),
            _ => None,
        }
    }
}
