//! Thread-local error handling for FFI.
//!
//! Uses the "last error" pattern common in C APIs.

use parking_lot::RwLock;
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message for the current thread.
pub fn set_last_error(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::error!("FFI error: {}", msg);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error for the current thread.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Get a pointer to the last error message.
///
/// Falls back to the global error when this thread has none, so a failed
/// `imageviewer_init` can be inspected from any thread.
/// The pointer is valid until the next FFI call.
pub fn get_last_error_ptr() -> *const c_char {
    let local = LAST_ERROR.with(|e| e.borrow().as_ref().map(|s| s.as_ptr()));
    local
        .or_else(|| GLOBAL_ERROR.read().as_ref().map(|s| s.as_ptr()))
        .unwrap_or(std::ptr::null())
}

/// Global error for cross-thread scenarios (e.g., init failures).
static GLOBAL_ERROR: RwLock<Option<CString>> = RwLock::new(None);

pub fn set_global_error(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::error!("FFI global error: {}", msg);
    *GLOBAL_ERROR.write() = CString::new(msg).ok();
}

pub fn clear_global_error() {
    *GLOBAL_ERROR.write() = None;
}

/// Borrow a UTF-8 string argument, recording the failure when it is unusable.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub unsafe fn str_arg<'a>(ptr: *const c_char, name: &str) -> Option<&'a str> {
    if ptr.is_null() {
        set_last_error(format!("{} is null", name));
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error(format!("invalid UTF-8 in {}", name));
            None
        }
    }
}

/// Hand a string to the caller; it must be released with `imageviewer_free_string`.
pub fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Run the body of an exported function.
///
/// Clears the last error first. A panic is recorded as the last error and
/// turned into `on_panic`, so it never unwinds across the C boundary.
pub fn ffi_guard<T>(name: &str, on_panic: T, body: impl FnOnce() -> T) -> T {
    clear_last_error();
    catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|_| {
        set_last_error(format!("panic in {}", name));
        on_panic
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_is_thread_local() {
        clear_last_error();
        set_last_error("boom");
        let ptr = get_last_error_ptr();
        assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap(), "boom");

        std::thread::spawn(|| {
            clear_global_error();
            assert!(get_last_error_ptr().is_null());
        })
        .join()
        .unwrap();

        clear_last_error();
    }

    #[test]
    fn test_str_arg_rejects_null() {
        clear_last_error();
        assert!(unsafe { str_arg(std::ptr::null(), "uri") }.is_none());
        let msg = unsafe { CStr::from_ptr(get_last_error_ptr()) };
        assert_eq!(msg.to_str().unwrap(), "uri is null");
        clear_last_error();
    }

    #[test]
    fn test_ffi_guard_turns_panic_into_error() {
        let rc = ffi_guard("imageviewer_test", -1, || -> i32 { panic!("boom") });
        assert_eq!(rc, -1);
        let msg = unsafe { CStr::from_ptr(get_last_error_ptr()) };
        assert_eq!(msg.to_str().unwrap(), "panic in imageviewer_test");

        assert_eq!(ffi_guard("imageviewer_test", -1, || 7), 7);
        assert!(LAST_ERROR.with(|e| e.borrow().is_none()));
    }
}
