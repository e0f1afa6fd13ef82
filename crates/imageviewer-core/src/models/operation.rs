//! Operation requests and their identity.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Normalized identifier of the file a mutating operation targets.
///
/// Requests with equal keys touch the same file; rotation requests for the
/// same key are serialized into rounds by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(PathBuf);

impl ResourceKey {
    /// Wrap an already-resolved path without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Resolve a `file://` URL or plain path and canonicalize it when the file exists.
    pub fn from_uri(uri: &str) -> Self {
        let path = crate::paths::resolve_local_path(uri);
        let canonical = std::fs::canonicalize(&path).unwrap_or(path);
        Self(canonical)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ResourceKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PathBuf> for ResourceKey {
    fn from(value: PathBuf) -> Self {
        Self(value)
    }
}

/// Which wallpaper slot(s) to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WallpaperTarget {
    Desktop,
    LockScreen,
    Both,
}

impl WallpaperTarget {
    pub fn kind(self) -> OperationKind {
        match self {
            WallpaperTarget::Desktop => OperationKind::DesktopWallpaper,
            WallpaperTarget::LockScreen => OperationKind::LockScreenWallpaper,
            WallpaperTarget::Both => OperationKind::BothWallpapers,
        }
    }
}

/// Kind reported with every completion notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Rotation,
    DesktopWallpaper,
    LockScreenWallpaper,
    BothWallpapers,
    Trash,
}

impl OperationKind {
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Rotation => "rotation",
            OperationKind::DesktopWallpaper => "desktop",
            OperationKind::LockScreenWallpaper => "lockscreen",
            OperationKind::BothWallpapers => "both",
            OperationKind::Trash => "trash",
        }
    }
}

/// A mutating request submitted to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OperationRequest {
    /// Rotate clockwise by a signed angle in degrees. Coalesced per key.
    Rotate { degrees: i32 },
    /// Set the file as wallpaper. One-shot.
    SetWallpaper { target: WallpaperTarget },
    /// Move the file to the OS trash. One-shot.
    MoveToTrash,
}

/// Result of one one-shot execution, possibly covering several kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub results: Vec<(OperationKind, bool)>,
}

impl OperationOutcome {
    pub fn single(kind: OperationKind, success: bool) -> Self {
        Self {
            results: vec![(kind, success)],
        }
    }

    pub fn failed(request: &OperationRequest) -> Self {
        match request {
            OperationRequest::Rotate { .. } => Self::single(OperationKind::Rotation, false),
            OperationRequest::MoveToTrash => Self::single(OperationKind::Trash, false),
            OperationRequest::SetWallpaper {
                target: WallpaperTarget::Both,
            } => Self {
                results: vec![
                    (OperationKind::DesktopWallpaper, false),
                    (OperationKind::LockScreenWallpaper, false),
                    (OperationKind::BothWallpapers, false),
                ],
            },
            OperationRequest::SetWallpaper { target } => Self::single(target.kind(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = OperationRequest::SetWallpaper {
            target: WallpaperTarget::LockScreen,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"type":"setWallpaper","target":"lockScreen"}"#);

        let parsed: OperationRequest = serde_json::from_str(r#"{"type":"rotate","degrees":-90}"#).unwrap();
        assert_eq!(parsed, OperationRequest::Rotate { degrees: -90 });
    }

    #[test]
    fn test_failed_both_wallpapers_reports_three_kinds() {
        let outcome = OperationOutcome::failed(&OperationRequest::SetWallpaper {
            target: WallpaperTarget::Both,
        });
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.iter().all(|(_, ok)| !ok));
    }

    #[test]
    fn test_resource_key_display() {
        let key = ResourceKey::new("/tmp/a.png");
        assert_eq!(key.to_string(), "/tmp/a.png");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""/tmp/a.png""#);
    }
}
