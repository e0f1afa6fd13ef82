//! Synchronous file helpers.

use crate::error::{ffi_guard, set_last_error, str_arg, string_to_cstr};
use imageviewer_core::paths::initial_image_from_args;
use imageviewer_core::services::files;
use std::ffi::c_char;

/// Move an image to the OS trash and wait for the result.
///
/// # Safety
/// - `uri` must be a null-terminated UTF-8 `file://` URL or path.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_delete_image(uri: *const c_char) -> i32 {
    ffi_guard("imageviewer_delete_image", -1, || {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };

        match files::delete_image(uri) {
            Ok(()) => 0,
            Err(e) => {
                set_last_error(format!("delete_image failed: {}", e));
                -1
            }
        }
    })
}

/// Size of a file in bytes.
///
/// # Safety
/// - `uri` must be null-terminated UTF-8.
///
/// # Returns
/// - The size; `0` for missing files
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_get_file_size(uri: *const c_char) -> i64 {
    ffi_guard("imageviewer_get_file_size", -1, || {
        let Some(uri) = str_arg(uri, "uri") else {
            return -1;
        };
        i64::try_from(files::file_size(uri)).unwrap_or(i64::MAX)
    })
}

/// The image the process was launched with, as a `file://` URL.
///
/// # Returns
/// - URL string (must be freed with `imageviewer_free_string()`)
/// - `NULL` when no argument names an existing file
#[no_mangle]
pub extern "C" fn imageviewer_get_initial_image_path() -> *mut c_char {
    ffi_guard("imageviewer_get_initial_image_path", std::ptr::null_mut(), || {
        let args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
        match initial_image_from_args(args) {
            Some(url) => string_to_cstr(&url),
            None => std::ptr::null_mut(),
        }
    })
}
