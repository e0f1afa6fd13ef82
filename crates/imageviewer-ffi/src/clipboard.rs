//! Clipboard API.

use crate::error::{ffi_guard, set_last_error, str_arg, string_to_cstr};
use imageviewer_core::paths::resolve_local_path;
use imageviewer_core::services::clipboard;
use std::ffi::c_char;

/// Copy the pixels of an image to the clipboard.
///
/// # Safety
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_copy_image_to_clipboard(uri: *const c_char) -> i32 {
    ffi_guard("imageviewer_copy_image_to_clipboard", -1, || {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };

        match clipboard::copy_image_file(&resolve_local_path(uri)) {
            Ok(()) => 0,
            Err(e) => {
                set_last_error(format!("copy_image failed: {}", e));
                -1
            }
        }
    })
}

/// Copy the local path of an image to the clipboard as text.
///
/// # Safety
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_copy_path_to_clipboard(uri: *const c_char) -> i32 {
    ffi_guard("imageviewer_copy_path_to_clipboard", -1, || {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };

        let path = resolve_local_path(uri);
        match clipboard::copy_text(&path.to_string_lossy()) {
            Ok(()) => 0,
            Err(e) => {
                set_last_error(format!("copy_path failed: {}", e));
                -1
            }
        }
    })
}

/// Read text from the clipboard.
///
/// # Returns
/// - Text (must be freed with `imageviewer_free_string()`)
/// - `NULL` on error
#[no_mangle]
pub extern "C" fn imageviewer_paste_text() -> *mut c_char {
    ffi_guard("imageviewer_paste_text", std::ptr::null_mut(), || match clipboard::paste_text() {
        Ok(text) => string_to_cstr(&text),
        Err(e) => {
            set_last_error(format!("paste_text failed: {}", e));
            std::ptr::null_mut()
        }
    })
}

/// Save the clipboard image as a PNG file.
///
/// # Safety
/// - `dest` must be null-terminated UTF-8.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_paste_image_to(dest: *const c_char) -> i32 {
    ffi_guard("imageviewer_paste_image_to", -1, || {
        let Some(dest) = str_arg(dest, "dest") else {
            return -1;
        };

        match clipboard::paste_image_to(&resolve_local_path(dest)) {
            Ok(()) => 0,
            Err(e) => {
                set_last_error(format!("paste_image failed: {}", e));
                -1
            }
        }
    })
}
