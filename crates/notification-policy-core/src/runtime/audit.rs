// crates/notification-policy-core/src/runtime/audit.rs
// ============================================================================
// Module: Lifecycle Audit Sinks
// Description: Reference audit sinks for lifecycle events.
// Purpose: Emit structured JSON lines for every lifecycle operation.
// Dependencies: serde_json, crate::interfaces
// ============================================================================

//! ## Overview
//! [`JsonlAuditSink`] writes one JSON object per line to any writer;
//! [`NoopAuditSink`] discards events. Write failures are swallowed so audit
//! output never changes the outcome of a lifecycle operation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use crate::interfaces::AuditSink;
use crate::interfaces::LifecycleEvent;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &LifecycleEvent) {}
}

/// Audit sink that writes JSON lines to a writer.
///
/// # Invariants
/// - Each event is written as a single line terminated by `\n`.
pub struct JsonlAuditSink<W> {
    /// Destination writer.
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonlAuditSink<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    ///
    /// Returns `None` when the writer lock was poisoned.
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

impl<W: Write + Send> AuditSink for JsonlAuditSink<W> {
    fn record(&self, event: &LifecycleEvent) {
        let Ok(mut line) = serde_json::to_vec(event) else {
            return;
        };
        line.push(b'\n');
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if writer.write_all(&line).is_ok() {
            let _ = writer.flush();
        }
    }
}
