//! Event emission abstraction for decoupling from any GUI toolkit.
//!
//! The coordinator reports through [`NotificationSink`]. Frontends usually
//! only implement the lower-level [`EventSink`] (event name plus JSON payload)
//! and wrap it in an [`EventSinkNotifier`].

use std::sync::Arc;

use serde::Serialize;

use crate::models::{OperationKind, ResourceKey};

/// Event emitted after each finished operation.
pub const OPERATION_COMPLETE_EVENT: &str = "operation-complete";
/// Event emitted when the in-flight counter returns to zero.
pub const ALL_OPERATIONS_COMPLETE_EVENT: &str = "all-operations-complete";

/// Trait for emitting events to the frontend.
pub trait EventSink: Send + Sync {
    /// Emit an event with the given name and JSON payload.
    ///
    /// # Arguments
    /// * `event_name` - The name of the event (e.g., "operation-complete")
    /// * `payload_json` - JSON-serialized payload string
    fn emit(&self, event_name: &str, payload_json: &str);
}

/// Extension trait for EventSink that provides typed emit functionality.
pub trait EventSinkExt {
    /// Emit an event with a typed payload that will be serialized to JSON.
    fn emit_typed<T: Serialize>(&self, event_name: &str, payload: &T);
}

impl<S: EventSink + ?Sized> EventSinkExt for S {
    fn emit_typed<T: Serialize>(&self, event_name: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => self.emit(event_name, &json),
            Err(e) => {
                tracing::error!("Failed to serialize event payload: {}", e);
            }
        }
    }
}

/// Shared reference to an EventSink implementation.
pub type SharedEventSink = Arc<dyn EventSink>;

/// No-op event sink for testing or when events are not needed.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event_name: &str, _payload_json: &str) {}
}

/// Logging event sink for debugging purposes.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn emit(&self, event_name: &str, payload_json: &str) {
        tracing::debug!(event = event_name, payload = payload_json, "Event emitted");
    }
}

/// Observer the coordinator calls back into.
///
/// Called from worker threads, never while the coordinator holds its lock, so
/// implementations may re-enter the coordinator. Marshalling onto a UI thread
/// is the implementation's job.
pub trait NotificationSink: Send + Sync {
    fn on_operation_complete(&self, key: &ResourceKey, kind: OperationKind, success: bool);

    fn on_all_operations_complete(&self);
}

/// Shared reference to a NotificationSink implementation.
pub type SharedNotificationSink = Arc<dyn NotificationSink>;

/// Payload of [`OPERATION_COMPLETE_EVENT`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCompletePayload<'a> {
    pub key: &'a ResourceKey,
    pub kind: OperationKind,
    pub success: bool,
}

/// Forwards coordinator notifications to an [`EventSink`] as JSON events.
#[derive(Clone)]
pub struct EventSinkNotifier {
    sink: SharedEventSink,
}

impl EventSinkNotifier {
    pub fn new(sink: SharedEventSink) -> Self {
        Self { sink }
    }
}

impl NotificationSink for EventSinkNotifier {
    fn on_operation_complete(&self, key: &ResourceKey, kind: OperationKind, success: bool) {
        self.sink.emit_typed(
            OPERATION_COMPLETE_EVENT,
            &OperationCompletePayload { key, kind, success },
        );
    }

    fn on_all_operations_complete(&self) {
        self.sink.emit(ALL_OPERATIONS_COMPLETE_EVENT, "{}");
    }
}
