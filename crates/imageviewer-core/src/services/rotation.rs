//! In-place image rotation
//!
//! Decodes, rotates clockwise and re-encodes in the original format. Right
//! angles use the exact pixel shuffles; any other angle is resampled onto a
//! canvas large enough to hold the whole rotated image, with transparent
//! corners. The new file is written to a temporary file next to the original
//! and persisted over it, so a failed encode or write leaves the original
//! untouched and no partial file behind.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{imageops, DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::utils::error::{AppError, AppResult};

/// JPEG quality used for re-encoding when not configured
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Map any signed angle into `0..360`.
pub fn normalize_angle(degrees: i64) -> i64 {
    degrees.rem_euclid(360)
}

/// Size of the smallest canvas holding a `width` x `height` image rotated by
/// `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: i64) -> (u32, u32) {
    let radians = (normalize_angle(degrees) as f64).to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (w, h) = (width as f64, height as f64);
    // Float noise near right angles must not add a pixel.
    let fit = |v: f64| (v - 1e-9).ceil().max(1.0) as u32;
    (fit(w * cos + h * sin), fit(w * sin + h * cos))
}

/// Rotate clockwise by a normalized angle.
fn rotate(img: DynamicImage, normalized: i64) -> DynamicImage {
    match normalized {
        0 => img,
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        other => rotate_free(&img, other),
    }
}

fn rotate_free(img: &DynamicImage, normalized: i64) -> DynamicImage {
    let (width, height) = rotated_bounds(img.width(), img.height(), normalized);
    let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
    let x = (i64::from(width) - i64::from(img.width())) / 2;
    let y = (i64::from(height) - i64::from(img.height())) / 2;
    imageops::overlay(&mut canvas, &img.to_rgba8(), x, y);

    let radians = (normalized as f32).to_radians();
    DynamicImage::ImageRgba8(rotate_about_center(
        &canvas,
        radians,
        Interpolation::Bilinear,
        TRANSPARENT,
    ))
}

/// Rotate the image at `path` by `degrees` and overwrite it.
///
/// A normalized angle of zero only checks that the file is a readable image.
pub fn rotate_image_file(path: &Path, degrees: i64, jpeg_quality: u8) -> AppResult<()> {
    if !path.is_file() {
        return Err(AppError::NotFound(path.display().to_string()));
    }

    let normalized = normalize_angle(degrees);
    let reader = ImageReader::open(path)?.with_guessed_format()?;

    if normalized == 0 {
        reader.into_dimensions()?;
        return Ok(());
    }

    let format = ImageFormat::from_path(path)
        .ok()
        .or(reader.format())
        .ok_or_else(|| AppError::General(format!("unknown image format: {}", path.display())))?;

    let img = reader.decode()?;
    let rotated = rotate(img, normalized);
    let encoded = encode(&rotated, format, jpeg_quality)?;

    replace_contents(path, &encoded)?;

    tracing::debug!(path = %path.display(), degrees = normalized, format = ?format, "image rotated");
    Ok(())
}

fn encode(img: &DynamicImage, format: ImageFormat, jpeg_quality: u8) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();

    if format == ImageFormat::Jpeg {
        let rgb = img.to_rgb8();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
        encoder.encode_image(&rgb)?;
    } else {
        img.write_to(&mut Cursor::new(&mut buf), format)?;
    }

    Ok(buf)
}

/// Write `bytes` to a temporary sibling of `path` and move it into place.
///
/// The temporary file is removed on every error path.
fn replace_contents(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".rotating")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_image() -> DynamicImage {
        let img = RgbImage::from_fn(60, 30, |x, y| {
            if x < 10 && y < 10 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0), 0);
        assert_eq!(normalize_angle(450), 90);
        assert_eq!(normalize_angle(-90), 270);
        assert_eq!(normalize_angle(-720), 0);
    }

    #[test]
    fn test_rotate_quarter_turn_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, 90, DEFAULT_JPEG_QUALITY).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (30, 60));
        // Top-left block moves to the top-right corner.
        assert_eq!(img.get_pixel(25, 5), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_negative_angle_rotates_counter_clockwise() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("b.png");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, -90, DEFAULT_JPEG_QUALITY).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (30, 60));
        // Top-left block moves to the bottom-left corner.
        assert_eq!(img.get_pixel(5, 55), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_rotate_jpeg_keeps_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.jpg");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, 270, DEFAULT_JPEG_QUALITY).unwrap();

        let reader = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
        assert_eq!(reader.into_dimensions().unwrap(), (30, 60));
    }

    #[test]
    fn test_full_turn_is_noop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("d.png");
        create_test_image().save(&path).unwrap();
        let before = fs::read(&path).unwrap();

        rotate_image_file(&path, 720, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = rotate_image_file(&tmp.path().join("nope.png"), 90, 85).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_garbage_file_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("e.png");
        fs::write(&path, b"not an image").unwrap();

        assert!(rotate_image_file(&path, 90, 85).is_err());
        assert!(rotate_image_file(&path, 0, 85).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"not an image");
    }

    #[test]
    fn test_rotated_bounds() {
        assert_eq!(rotated_bounds(60, 30, 0), (60, 30));
        assert_eq!(rotated_bounds(60, 30, 90), (30, 60));
        assert_eq!(rotated_bounds(60, 30, 180), (60, 30));
        assert_eq!(rotated_bounds(60, 30, 45), (64, 64));
        assert_eq!(rotated_bounds(60, 30, -45), (64, 64));
        assert_eq!(rotated_bounds(100, 100, 30), (137, 137));
    }

    #[test]
    fn test_rotate_45_degrees_expands_canvas() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f.png");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, 45, DEFAULT_JPEG_QUALITY).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (64, 64));
        // Corners lie outside the rotated image, the center inside it.
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(63, 63)[3], 0);
        assert_eq!(img.get_pixel(32, 32), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_rotate_30_degrees_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("g.jpg");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, 30, DEFAULT_JPEG_QUALITY).unwrap();

        let reader = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
        assert_eq!(reader.into_dimensions().unwrap(), rotated_bounds(60, 30, 30));
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_no_temporary_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("h.png");
        create_test_image().save(&path).unwrap();

        rotate_image_file(&path, 90, DEFAULT_JPEG_QUALITY).unwrap();
        rotate_image_file(&path, 45, DEFAULT_JPEG_QUALITY).unwrap();

        assert_eq!(dir_entries(tmp.path()), vec!["h.png".to_string()]);
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("i.png");
        fs::create_dir(&target).unwrap();

        // Persisting over a directory fails after the temporary file exists.
        let err = replace_contents(&target, b"bytes").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(dir_entries(tmp.path()), vec!["i.png".to_string()]);
    }
}
