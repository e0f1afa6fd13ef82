//! File-level helpers: size lookup and moving to the OS trash.

use std::fs;
use std::path::Path;

use crate::paths::resolve_local_path;
use crate::utils::error::{AppError, AppResult};

/// Size of the file behind a path or `file://` URL; 0 when it cannot be read.
pub fn file_size(uri: &str) -> u64 {
    fs::metadata(resolve_local_path(uri))
        .map(|m| m.len())
        .unwrap_or(0)
}

/// Move a regular file to the trash / recycle bin.
pub fn move_to_trash(path: &Path) -> AppResult<()> {
    if !path.is_file() {
        return Err(AppError::NotFound(path.display().to_string()));
    }

    trash::delete(path).map_err(|e| {
        AppError::Io(std::io::Error::other(format!(
            "failed to move {} to trash: {}",
            path.display(),
            e
        )))
    })?;

    tracing::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Resolve `uri` and move the file it names to the trash.
pub fn delete_image(uri: &str) -> AppResult<()> {
    move_to_trash(&resolve_local_path(uri))
}
