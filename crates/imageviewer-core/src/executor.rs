//! Work item execution.
//!
//! An [`OperationExecutor`] performs one blocking file operation on a worker
//! thread. It holds no coordinator state and reports through its return value.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::models::{OperationKind, OperationOutcome, OperationRequest, ResourceKey, WallpaperTarget};
use crate::services::{files, rotation, wallpaper};
use crate::utils::error::{AppError, AppResult};

/// Performs the leaf I/O behind each operation kind.
pub trait OperationExecutor: Send + Sync {
    /// Rotate the image in place by `degrees` (any signed value).
    fn rotate(&self, key: &ResourceKey, degrees: i64) -> AppResult<()>;

    /// Set a single wallpaper slot. `Both` is split by the caller.
    fn set_wallpaper(&self, key: &ResourceKey, target: WallpaperTarget) -> AppResult<()>;

    fn move_to_trash(&self, key: &ResourceKey) -> AppResult<()>;
}

/// Shared reference to an OperationExecutor implementation.
pub type SharedExecutor = Arc<dyn OperationExecutor>;

/// Executor backed by the real filesystem and OS services.
#[derive(Debug, Clone)]
pub struct FileSystemExecutor {
    jpeg_quality: u8,
}

impl FileSystemExecutor {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

impl Default for FileSystemExecutor {
    fn default() -> Self {
        Self::new(rotation::DEFAULT_JPEG_QUALITY)
    }
}

impl OperationExecutor for FileSystemExecutor {
    fn rotate(&self, key: &ResourceKey, degrees: i64) -> AppResult<()> {
        rotation::rotate_image_file(key.path(), degrees, self.jpeg_quality)
    }

    fn set_wallpaper(&self, key: &ResourceKey, target: WallpaperTarget) -> AppResult<()> {
        match target {
            WallpaperTarget::Desktop => wallpaper::set_desktop_wallpaper(key.path()),
            WallpaperTarget::LockScreen => wallpaper::set_lock_screen_wallpaper(key.path()),
            WallpaperTarget::Both => {
                wallpaper::set_desktop_wallpaper(key.path())?;
                wallpaper::set_lock_screen_wallpaper(key.path())
            }
        }
    }

    fn move_to_trash(&self, key: &ResourceKey) -> AppResult<()> {
        files::move_to_trash(key.path())
    }
}

/// Run `f`, turning a panic into an error so nothing unwinds past the worker.
pub(crate) fn guarded<T>(what: &str, f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(AppError::General(format!("panic during {}", what)))
    })
}

fn report(kind: OperationKind, key: &ResourceKey, result: AppResult<()>) -> (OperationKind, bool) {
    match result {
        Ok(()) => (kind, true),
        Err(e) => {
            tracing::warn!(key = %key, kind = kind.name(), code = e.code(), "operation failed: {}", e);
            (kind, false)
        }
    }
}

/// Execute a one-shot request and collect per-kind results.
///
/// `Both` wallpapers runs both slots and reports desktop, lock screen and the
/// combined result.
pub fn execute_one_shot(
    executor: &dyn OperationExecutor,
    key: &ResourceKey,
    request: &OperationRequest,
) -> OperationOutcome {
    match *request {
        OperationRequest::Rotate { degrees } => {
            let result = guarded("rotation", || executor.rotate(key, i64::from(degrees)));
            OperationOutcome {
                results: vec![report(OperationKind::Rotation, key, result)],
            }
        }
        OperationRequest::MoveToTrash => {
            let result = guarded("trash", || executor.move_to_trash(key));
            OperationOutcome {
                results: vec![report(OperationKind::Trash, key, result)],
            }
        }
        OperationRequest::SetWallpaper {
            target: WallpaperTarget::Both,
        } => {
            let desktop = report(
                OperationKind::DesktopWallpaper,
                key,
                guarded("desktop wallpaper", || {
                    executor.set_wallpaper(key, WallpaperTarget::Desktop)
                }),
            );
            let lock_screen = report(
                OperationKind::LockScreenWallpaper,
                key,
                guarded("lock screen wallpaper", || {
                    executor.set_wallpaper(key, WallpaperTarget::LockScreen)
                }),
            );
            let both = (OperationKind::BothWallpapers, desktop.1 && lock_screen.1);
            OperationOutcome {
                results: vec![desktop, lock_screen, both],
            }
        }
        OperationRequest::SetWallpaper { target } => {
            let result = guarded("wallpaper", || executor.set_wallpaper(key, target));
            OperationOutcome {
                results: vec![report(target.kind(), key, result)],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HalfBroken;

    impl OperationExecutor for HalfBroken {
        fn rotate(&self, _key: &ResourceKey, _degrees: i64) -> AppResult<()> {
            panic!("decoder exploded");
        }

        fn set_wallpaper(&self, _key: &ResourceKey, target: WallpaperTarget) -> AppResult<()> {
            match target {
                WallpaperTarget::Desktop => Ok(()),
                _ => Err(AppError::UnsupportedOnPlatform("lock screen".to_string())),
            }
        }

        fn move_to_trash(&self, key: &ResourceKey) -> AppResult<()> {
            Err(AppError::NotFound(key.to_string()))
        }
    }

    #[test]
    fn test_panic_becomes_failure() {
        let key = ResourceKey::new("a.png");
        let outcome = execute_one_shot(&HalfBroken, &key, &OperationRequest::Rotate { degrees: 90 });
        assert_eq!(outcome.results, vec![(OperationKind::Rotation, false)]);
    }

    #[test]
    fn test_both_wallpapers_reports_each_slot() {
        let key = ResourceKey::new("a.png");
        let outcome = execute_one_shot(
            &HalfBroken,
            &key,
            &OperationRequest::SetWallpaper {
                target: WallpaperTarget::Both,
            },
        );
        assert_eq!(
            outcome.results,
            vec![
                (OperationKind::DesktopWallpaper, true),
                (OperationKind::LockScreenWallpaper, false),
                (OperationKind::BothWallpapers, false),
            ]
        );
    }

    #[test]
    fn test_trash_failure_is_reported() {
        let key = ResourceKey::new("missing.png");
        let outcome = execute_one_shot(&HalfBroken, &key, &OperationRequest::MoveToTrash);
        assert_eq!(outcome.results, vec![(OperationKind::Trash, false)]);
    }

    #[test]
    fn test_file_system_executor_clamps_quality() {
        assert_eq!(FileSystemExecutor::new(0).jpeg_quality, 1);
        assert_eq!(FileSystemExecutor::new(250).jpeg_quality, 100);
        assert_eq!(FileSystemExecutor::default().jpeg_quality, 85);
    }
}
