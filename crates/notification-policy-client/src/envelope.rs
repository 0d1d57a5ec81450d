// crates/notification-policy-client/src/envelope.rs
// ============================================================================
// Module: API Response Envelope
// Description: Vendor response wrapper shared by every endpoint.
// Purpose: Decode success flags, error lists, and results uniformly.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every vendor response wraps its payload as
//! `{"success": bool, "errors": [...], "messages": [...], "result": ...}`.
//! Missing lists decode as empty; `result` may be absent or null.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Error or informational message reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    /// Vendor message code.
    #[serde(default)]
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the API considers the request successful.
    #[serde(default)]
    pub success: bool,
    /// Errors reported by the API.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Informational messages.
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Endpoint payload.
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

/// Joins API messages as `code: message` pairs separated by `; `.
#[must_use]
pub fn describe_messages(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(|entry| {
            if entry.code == 0 {
                entry.message.clone()
            } else {
                format!("{}: {}", entry.code, entry.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
