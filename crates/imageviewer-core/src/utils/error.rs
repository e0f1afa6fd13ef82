//! Error types shared by the coordinator, the leaf services and the frontends.

use serde::Serialize;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The target resource does not exist at execution time.
    #[error("file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Decode or encode failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The operation has no implementation on this OS.
    #[error("not supported on this platform: {0}")]
    UnsupportedOnPlatform(String),

    /// Clipboard access failure
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Path or URI could not be interpreted
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Settings could not be read or written
    #[error("config error: {0}")]
    Config(String),

    /// An internal coordinator invariant was violated.
    #[error("logic error: {0}")]
    Logic(String),

    #[error("{0}")]
    General(String),
}

impl AppError {
    /// Stable error code handed to frontends.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "E_FILE_NOT_FOUND",
            AppError::Io(_) => "E_IO_ERROR",
            AppError::Image(_) => "E_IMAGE_ERROR",
            AppError::UnsupportedOnPlatform(_) => "E_UNSUPPORTED_PLATFORM",
            AppError::Clipboard(_) => "E_CLIPBOARD",
            AppError::InvalidPath(_) => "E_PATH_INVALID",
            AppError::Config(_) => "E_CONFIG",
            AppError::Logic(_) => "E_LOGIC",
            AppError::General(_) => "E_GENERAL",
        }
    }
}

/// Error wrapper returned across the frontend boundary.
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        CommandError {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CommandError {
            code: self.code().to_string(),
            message: self.to_string(),
        }
        .serialize(serializer)
    }
}

/// Result alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;
