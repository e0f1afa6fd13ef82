//! Commands that queue work on the coordinator.

use imageviewer_core::{Dispatch, ImageViewerCore, WallpaperTarget};

use crate::cli::{FileArgs, RotateArgs, WallpaperArgs};

/// Submit every angle back to back so they coalesce.
pub fn rotate(core: &ImageViewerCore, args: &RotateArgs) {
    let mut merged = 0;
    for &degrees in &args.angles {
        if core.rotate_image(&args.file, degrees) == Dispatch::Coalesced {
            merged += 1;
        }
    }
    tracing::info!(
        file = %args.file,
        submitted = args.angles.len(),
        merged,
        "Rotation queued"
    );
}

pub fn wallpaper(core: &ImageViewerCore, args: &WallpaperArgs) {
    let target = WallpaperTarget::from(args.target);
    core.set_wallpaper(&args.file, target);
    tracing::info!(file = %args.file, ?target, "Wallpaper change queued");
}

pub fn trash(core: &ImageViewerCore, args: &FileArgs) {
    core.trash_image(&args.file);
    tracing::info!(file = %args.file, "Move to trash queued");
}
