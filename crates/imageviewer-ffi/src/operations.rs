//! Asynchronous operation API.
//!
//! Calls return as soon as the operation is queued; results arrive through
//! the event callback.

use crate::error::{set_last_error, str_arg};
use crate::handle::{with_handle, ViewerHandle};
use imageviewer_core::{Dispatch, WallpaperTarget};
use std::ffi::c_char;
use std::time::Duration;

pub const IMAGEVIEWER_WALLPAPER_DESKTOP: i32 = 0;
pub const IMAGEVIEWER_WALLPAPER_LOCK_SCREEN: i32 = 1;
pub const IMAGEVIEWER_WALLPAPER_BOTH: i32 = 2;

fn wallpaper_target(value: i32) -> Option<WallpaperTarget> {
    match value {
        IMAGEVIEWER_WALLPAPER_DESKTOP => Some(WallpaperTarget::Desktop),
        IMAGEVIEWER_WALLPAPER_LOCK_SCREEN => Some(WallpaperTarget::LockScreen),
        IMAGEVIEWER_WALLPAPER_BOTH => Some(WallpaperTarget::Both),
        _ => None,
    }
}

/// Rotate an image clockwise by `degrees` (any integer, may be negative).
///
/// Rapid calls for the same image are merged into as few file rewrites as
/// possible.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
/// - `uri` must be a `file://` URL or path, null-terminated UTF-8.
///
/// # Returns
/// - `1` if a new worker was started
/// - `0` if merged into the rotation already in flight
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_rotate_image_async(
    handle: *mut ViewerHandle,
    uri: *const c_char,
    degrees: i32,
) -> i32 {
    with_handle(handle, "imageviewer_rotate_image_async", |handle| {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };
        match handle.core.rotate_image(uri, degrees) {
            Dispatch::Started => 1,
            Dispatch::Coalesced => 0,
        }
    })
}

/// Set an image as wallpaper.
///
/// `target` is one of `IMAGEVIEWER_WALLPAPER_DESKTOP`,
/// `IMAGEVIEWER_WALLPAPER_LOCK_SCREEN` or `IMAGEVIEWER_WALLPAPER_BOTH`.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_set_wallpaper_async(
    handle: *mut ViewerHandle,
    uri: *const c_char,
    target: i32,
) -> i32 {
    with_handle(handle, "imageviewer_set_wallpaper_async", |handle| {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };
        let Some(target) = wallpaper_target(target) else {
            set_last_error(format!("unknown wallpaper target: {}", target));
            return -1;
        };
        handle.core.set_wallpaper(uri, target);
        0
    })
}

/// Move an image to the trash in the background.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_move_to_trash_async(
    handle: *mut ViewerHandle,
    uri: *const c_char,
) -> i32 {
    with_handle(handle, "imageviewer_move_to_trash_async", |handle| {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };
        handle.core.trash_image(uri);
        0
    })
}

/// Drop rotation requests for an image that no worker has picked up yet.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - `1` if a pending rotation was dropped
/// - `0` if there was nothing to drop
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_cancel_pending_rotations(
    handle: *mut ViewerHandle,
    uri: *const c_char,
) -> i32 {
    with_handle(handle, "imageviewer_cancel_pending_rotations", |handle| {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };
        i32::from(handle.core.cancel_pending_rotations(uri).is_some())
    })
}

/// Check whether any operation is still in flight.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
///
/// # Returns
/// - `1` if operations are pending
/// - `0` if idle
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_has_pending_operations(handle: *mut ViewerHandle) -> i32 {
    with_handle(handle, "imageviewer_has_pending_operations", |handle| {
        i32::from(handle.core.coordinator().has_pending_operations())
    })
}

/// Block until every in-flight operation has finished and the
/// all-complete notification has been delivered.
///
/// Must not be called from the event callback.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_wait_for_pending_operations(handle: *mut ViewerHandle) -> i32 {
    with_handle(handle, "imageviewer_wait_for_pending_operations", |handle| {
        handle.core.coordinator().wait_until_idle();
        0
    })
}

/// Block until idle or until `timeout_ms` elapses.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
///
/// # Returns
/// - `1` if idle
/// - `0` on timeout
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_wait_for_pending_operations_timeout(
    handle: *mut ViewerHandle,
    timeout_ms: u64,
) -> i32 {
    with_handle(handle, "imageviewer_wait_for_pending_operations_timeout", |handle| {
        let idle = handle
            .core
            .coordinator()
            .wait_until_idle_timeout(Duration::from_millis(timeout_ms));
        i32::from(idle)
    })
}
