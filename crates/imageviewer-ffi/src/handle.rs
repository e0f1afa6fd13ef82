//! ViewerHandle - opaque handle wrapping ImageViewerCore, and the event
//! callback registration that feeds its sink.

use crate::error::{ffi_guard, set_last_error};
use imageviewer_core::{
    events::{EventSink, SharedEventSink},
    paths::{AppPathProvider, SharedPathProvider},
    AppResult, ImageViewerCore,
};
use parking_lot::RwLock;
use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::sync::Arc;
use std::time::Duration;

/// Callback function type for events.
/// - `name`: event name (null-terminated UTF-8)
/// - `payload`: JSON payload (null-terminated UTF-8)
/// - `user_data`: user-provided context pointer
///
/// Invoked on a worker thread, never on the thread that submitted the operation.
pub type EventCallback =
    extern "C" fn(name: *const c_char, payload: *const c_char, user_data: *mut c_void);

/// Stored callback with user data.
pub struct StoredCallback {
    pub callback: EventCallback,
    pub user_data: *mut c_void,
}

// SAFETY: user_data is managed by the caller and must be thread-safe
unsafe impl Send for StoredCallback {}
unsafe impl Sync for StoredCallback {}

/// FFI event sink that forwards events to a C callback.
pub struct FfiEventSink {
    callback: RwLock<Option<StoredCallback>>,
}

impl FfiEventSink {
    pub fn new() -> Self {
        Self {
            callback: RwLock::new(None),
        }
    }

    pub fn set_callback(&self, callback: EventCallback, user_data: *mut c_void) {
        *self.callback.write() = Some(StoredCallback { callback, user_data });
    }

    pub fn clear_callback(&self) {
        *self.callback.write() = None;
    }
}

impl Default for FfiEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for FfiEventSink {
    fn emit(&self, event_name: &str, payload_json: &str) {
        let guard = self.callback.read();
        if let Some(ref stored) = *guard {
            if let (Ok(name_cstr), Ok(payload_cstr)) =
                (CString::new(event_name), CString::new(payload_json))
            {
                (stored.callback)(name_cstr.as_ptr(), payload_cstr.as_ptr(), stored.user_data);
            }
        }
    }
}

/// Opaque handle exposed to C.
pub struct ViewerHandle {
    pub core: ImageViewerCore,
    pub event_sink: Arc<FfiEventSink>,
}

impl ViewerHandle {
    pub fn new() -> AppResult<Self> {
        Self::with_provider(Arc::new(AppPathProvider::new()))
    }

    pub fn with_provider(path_provider: SharedPathProvider) -> AppResult<Self> {
        let event_sink = Arc::new(FfiEventSink::new());
        let shared_sink: SharedEventSink = event_sink.clone();

        let core = ImageViewerCore::new(path_provider, shared_sink)?;

        Ok(Self { core, event_sink })
    }
}

impl Drop for ViewerHandle {
    fn drop(&mut self) {
        // Workers may outlive the handle; the caller's user_data may not.
        self.event_sink.clear_callback();

        let coordinator = self.core.coordinator();
        match self.core.settings.operations.drain_timeout_ms {
            0 => coordinator.wait_until_idle(),
            ms => {
                if !coordinator.wait_until_idle_timeout(Duration::from_millis(ms)) {
                    tracing::warn!(
                        in_flight = coordinator.in_flight(),
                        "Shutting down with operations still running"
                    );
                }
            }
        }
        tracing::info!("ViewerHandle dropped");
    }
}

/// Run `body` against a live handle inside [`ffi_guard`].
///
/// A null handle is reported as the last error and yields `-1`.
///
/// # Safety
/// `handle` must be null or a valid pointer from `imageviewer_init`.
pub(crate) unsafe fn with_handle(
    handle: *mut ViewerHandle,
    name: &str,
    body: impl FnOnce(&ViewerHandle) -> i32,
) -> i32 {
    ffi_guard(name, -1, || match handle.as_ref() {
        Some(handle) => body(handle),
        None => {
            set_last_error("handle is null");
            -1
        }
    })
}

/// Register an event callback, replacing any previous one.
///
/// Events: `operation-complete` with `{"key","kind","success"}` and
/// `all-operations-complete` with `{}`.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
/// - `callback` must be a valid function pointer.
/// - `user_data` must remain valid for the lifetime of the callback registration.
///
/// # Returns
/// - `0` on success
/// - `-1` on error (call `imageviewer_last_error` for details)
#[no_mangle]
pub unsafe extern "C" fn imageviewer_set_event_callback(
    handle: *mut ViewerHandle,
    callback: EventCallback,
    user_data: *mut c_void,
) -> i32 {
    with_handle(handle, "imageviewer_set_event_callback", |handle| {
        handle.event_sink.set_callback(callback, user_data);
        tracing::debug!("Event callback registered");
        0
    })
}

/// Stop delivering events. Operations keep running.
///
/// # Safety
/// - `handle` must be a valid pointer from `imageviewer_init`.
///
/// # Returns
/// - `0` on success
/// - `-1` on error
#[no_mangle]
pub unsafe extern "C" fn imageviewer_clear_event_callback(handle: *mut ViewerHandle) -> i32 {
    with_handle(handle, "imageviewer_clear_event_callback", |handle| {
        handle.event_sink.clear_callback();
        tracing::debug!("Event callback cleared");
        0
    })
}
