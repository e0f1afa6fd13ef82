//! ImageViewer FFI - C ABI interface for a Qt frontend.
//!
//! This crate provides a C-compatible interface to the imageviewer-core
//! library, enabling integration with Qt or other non-Rust frontends.
//!
//! # Usage
//!
//! 1. Call `imageviewer_init()` to create a handle
//! 2. Register an event callback with `imageviewer_set_event_callback()`
//! 3. Queue operations (`imageviewer_rotate_image_async()`, ...)
//! 4. Call `imageviewer_shutdown()`; it waits for running operations
//!
//! # Error Handling
//!
//! Most functions return `0` on success, `-1` on error.
//! Call `imageviewer_last_error()` to get the error message.
//!
//! # Memory Management
//!
//! - Returned strings must be freed with `imageviewer_free_string()`
//! - The handle must be freed with `imageviewer_shutdown()`

mod clipboard;
mod error;
mod files;
mod handle;
mod operations;

use error::{
    clear_global_error, clear_last_error, get_last_error_ptr, set_global_error, set_last_error,
    string_to_cstr,
};
use handle::ViewerHandle;
use imageviewer_core::build_info;
use std::ffi::{c_char, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

// Re-export all public FFI functions
pub use clipboard::*;
pub use files::*;
pub use handle::{imageviewer_clear_event_callback, imageviewer_set_event_callback, EventCallback};
pub use operations::*;

/// Initialize the ImageViewer library.
///
/// # Returns
/// - Valid handle pointer on success
/// - `NULL` on error (call `imageviewer_last_error()` for details)
///
/// # Safety
/// The returned handle must be freed with `imageviewer_shutdown()`.
#[no_mangle]
pub extern "C" fn imageviewer_init() -> *mut ViewerHandle {
    clear_last_error();
    clear_global_error();

    let result = catch_unwind(AssertUnwindSafe(|| match ViewerHandle::new() {
        Ok(handle) => {
            tracing::info!("ImageViewer FFI initialized");
            Box::into_raw(Box::new(handle))
        }
        Err(e) => {
            set_global_error(format!("initialization failed: {}", e));
            std::ptr::null_mut()
        }
    }));

    result.unwrap_or_else(|_| {
        set_global_error("panic during initialization");
        std::ptr::null_mut()
    })
}

/// Shutdown the ImageViewer library and free resources.
///
/// The event callback is cleared first, then the call blocks until running
/// operations finish (bounded by the configured drain timeout).
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init()`
/// - After calling this function, the handle is invalid
#[no_mangle]
pub unsafe extern "C" fn imageviewer_shutdown(handle: *mut ViewerHandle) {
    clear_last_error();

    if handle.is_null() {
        return;
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = Box::from_raw(handle);
        tracing::info!("ImageViewer FFI shutdown");
    }));

    if result.is_err() {
        set_last_error("panic during shutdown");
    }
}

/// Get the last error message.
///
/// # Returns
/// - Pointer to error message (valid until next FFI call on this thread)
/// - `NULL` if no error
#[no_mangle]
pub extern "C" fn imageviewer_last_error() -> *const c_char {
    get_last_error_ptr()
}

/// Free a string allocated by the library.
///
/// # Safety
/// - `s` must be a pointer returned by an imageviewer function
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn imageviewer_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Get the library version.
///
/// # Returns
/// - Version string (must be freed with `imageviewer_free_string()`)
#[no_mangle]
pub extern "C" fn imageviewer_version() -> *mut c_char {
    string_to_cstr(build_info::APP_VERSION)
}

/// Get the application name shown in title bars and about boxes.
///
/// # Returns
/// - Name string (must be freed with `imageviewer_free_string()`)
#[no_mangle]
pub extern "C" fn imageviewer_app_name() -> *mut c_char {
    string_to_cstr(build_info::APP_NAME)
}

/// Get the commit the library was built from (`unknown` outside git).
///
/// # Returns
/// - Hash string (must be freed with `imageviewer_free_string()`)
#[no_mangle]
pub extern "C" fn imageviewer_commit_hash() -> *mut c_char {
    string_to_cstr(build_info::COMMIT_HASH)
}

/// Get the UTC build time in RFC 3339 form.
///
/// # Returns
/// - Timestamp string (must be freed with `imageviewer_free_string()`)
#[no_mangle]
pub extern "C" fn imageviewer_build_timestamp() -> *mut c_char {
    string_to_cstr(build_info::BUILD_TIMESTAMP)
}
