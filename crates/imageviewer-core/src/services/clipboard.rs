//! Clipboard transfer of images and paths.
//!
//! Thin pass-through over `arboard`; every call opens its own clipboard handle.

use std::borrow::Cow;
use std::path::Path;

use arboard::{Clipboard, ImageData};
use image::RgbaImage;

use crate::utils::error::{AppError, AppResult};

fn open() -> AppResult<Clipboard> {
    Clipboard::new().map_err(|e| AppError::Clipboard(format!("cannot access clipboard: {}", e)))
}

/// Decode the image at `path` and put its pixels on the clipboard.
pub fn copy_image_file(path: &Path) -> AppResult<()> {
    if !path.is_file() {
        return Err(AppError::NotFound(path.display().to_string()));
    }

    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    open()?
        .set_image(ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        })
        .map_err(|e| AppError::Clipboard(format!("copy failed: {}", e)))?;

    tracing::debug!("Image copied to clipboard: {}", path.display());
    Ok(())
}

/// Put a plain text value (usually a file path) on the clipboard.
pub fn copy_text(text: &str) -> AppResult<()> {
    open()?
        .set_text(text.to_owned())
        .map_err(|e| AppError::Clipboard(format!("copy failed: {}", e)))
}

pub fn paste_text() -> AppResult<String> {
    open()?
        .get_text()
        .map_err(|e| AppError::Clipboard(format!("paste failed: {}", e)))
}

/// Save the clipboard image as a PNG at `dest`.
pub fn paste_image_to(dest: &Path) -> AppResult<()> {
    let data = open()?
        .get_image()
        .map_err(|e| AppError::Clipboard(format!("paste failed: {}", e)))?;

    let img = RgbaImage::from_raw(data.width as u32, data.height as u32, data.bytes.into_owned())
        .ok_or_else(|| AppError::Clipboard("clipboard image has inconsistent size".to_string()))?;
    img.save_with_format(dest, image::ImageFormat::Png)?;

    tracing::debug!("Clipboard image saved: {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_missing_image_fails_before_touching_clipboard() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = copy_image_file(&tmp.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
