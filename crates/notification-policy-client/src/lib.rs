// crates/notification-policy-client/src/lib.rs
// ============================================================================
// Module: Notification Policy Client
// Description: HTTP client for the vendor notification policy API.
// Purpose: Provide the production implementation of the core API seam.
// Dependencies: notification-policy-core, reqwest, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate implements [`notification_policy_core::NotificationPolicyApi`]
//! over the vendor REST API using a blocking `reqwest` client.
//! Invariants:
//! - Requests carry credentials from [`Credentials`]; secrets never appear in
//!   `Debug` output or error messages.
//! - Response bodies are capped at [`ClientConfig::max_response_bytes`].
//! - Redirects are not followed and requests are never retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod envelope;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::Credentials;
pub use client::ClientConfig;
pub use client::ClientError;
pub use client::DEFAULT_BASE_URL;
pub use client::DEFAULT_MAX_RESPONSE_BYTES;
pub use client::DEFAULT_TIMEOUT_MS;
pub use client::HttpNotificationPolicyClient;
pub use client::default_user_agent;
