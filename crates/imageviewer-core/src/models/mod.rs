//! Data models

pub mod operation;
pub mod settings;

pub use operation::{OperationKind, OperationOutcome, OperationRequest, ResourceKey, WallpaperTarget};
pub use settings::{AppSettings, LoggingSettings, OperationSettings};
