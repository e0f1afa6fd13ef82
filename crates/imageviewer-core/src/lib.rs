//! ImageViewer Core Library
//!
//! Frontend-agnostic backend of the image viewer: it runs the mutating file
//! operations (rotation, wallpaper, trash) off the UI thread and tells the
//! frontend when they are done.
//!
//! # Architecture
//!
//! - `coordinator`: dispatches operations, coalesces rotations per file
//! - `pending`: in-flight counter and per-file rotation table
//! - `executor`: the blocking work behind each operation kind
//! - `services`: leaf file, image, wallpaper and clipboard helpers
//! - `events`: notification abstraction (EventSink / NotificationSink)
//! - `paths`: application paths and `file://` URL handling
//! - `utils`: error handling
//! - `build_info`: application name, version and build stamp
//!
//! # Example
//!
//! ```no_run
//! use imageviewer_core::{ImageViewerCore, paths::AppPathProvider, events::LoggingEventSink};
//! use std::sync::Arc;
//!
//! let core = ImageViewerCore::new(
//!     Arc::new(AppPathProvider::new()),
//!     Arc::new(LoggingEventSink),
//! ).unwrap();
//!
//! core.rotate_image("file:///tmp/photo.jpg", 90);
//! core.rotate_image("file:///tmp/photo.jpg", 90);
//! core.coordinator().wait_until_idle();
//! ```

pub mod build_info;
pub mod coordinator;
pub mod events;
pub mod executor;
pub mod models;
pub mod paths;
pub mod pending;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use coordinator::{Coordinator, Dispatch};
pub use events::{
    EventSink, EventSinkExt, EventSinkNotifier, LoggingEventSink, NoOpEventSink,
    NotificationSink, SharedEventSink, SharedNotificationSink,
};
pub use executor::{FileSystemExecutor, OperationExecutor, SharedExecutor};
pub use models::{
    AppSettings, OperationKind, OperationRequest, ResourceKey, WallpaperTarget,
};
pub use paths::{AppPathProvider, PathProvider, SharedPathProvider};
pub use pending::PendingState;
pub use services::SettingsManager;
pub use utils::{AppError, AppResult, CommandError};

use std::sync::Arc;

/// ImageViewer core application context.
///
/// Holds the shared resources a frontend needs: paths, settings, the event
/// sink and the operation coordinator.
pub struct ImageViewerCore {
    /// Path provider for resolving application paths
    pub path_provider: SharedPathProvider,
    /// Settings loaded at startup
    pub settings: AppSettings,
    /// Event sink for emitting events to the frontend
    pub event_sink: SharedEventSink,
    coordinator: Coordinator,
}

impl ImageViewerCore {
    /// Create a context, loading settings from the provider's settings file.
    pub fn new(path_provider: SharedPathProvider, event_sink: SharedEventSink) -> AppResult<Self> {
        let settings = SettingsManager::new(path_provider.as_ref())?.load()?;
        Ok(Self::with_settings(path_provider, event_sink, settings))
    }

    /// Create a context with explicit settings; nothing is read from disk.
    pub fn with_settings(
        path_provider: SharedPathProvider,
        event_sink: SharedEventSink,
        settings: AppSettings,
    ) -> Self {
        let executor: SharedExecutor =
            Arc::new(FileSystemExecutor::new(settings.operations.jpeg_quality));
        let notifier: SharedNotificationSink = Arc::new(EventSinkNotifier::new(event_sink.clone()));
        let coordinator = Coordinator::new(executor, notifier);

        tracing::info!(
            version = build_info::APP_VERSION,
            commit = build_info::COMMIT_HASH,
            jpeg_quality = settings.operations.jpeg_quality,
            "ImageViewer core initialized"
        );

        Self {
            path_provider,
            settings,
            event_sink,
            coordinator,
        }
    }

    /// Queue a rotation of the image at `uri` (URL or plain path).
    pub fn rotate_image(&self, uri: &str, degrees: i32) -> Dispatch {
        self.coordinator.rotate(ResourceKey::from_uri(uri), degrees)
    }

    /// Queue a wallpaper change to the image at `uri`.
    pub fn set_wallpaper(&self, uri: &str, target: WallpaperTarget) -> Dispatch {
        self.coordinator
            .submit(ResourceKey::from_uri(uri), OperationRequest::SetWallpaper { target })
    }

    /// Queue moving the image at `uri` to the trash.
    pub fn trash_image(&self, uri: &str) -> Dispatch {
        self.coordinator
            .submit(ResourceKey::from_uri(uri), OperationRequest::MoveToTrash)
    }

    /// Drop not yet started rotation of the image at `uri`.
    pub fn cancel_pending_rotations(&self, uri: &str) -> Option<i64> {
        self.coordinator.cancel(&ResourceKey::from_uri(uri))
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}
