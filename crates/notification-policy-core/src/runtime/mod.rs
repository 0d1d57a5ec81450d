// crates/notification-policy-core/src/runtime/mod.rs
// ============================================================================
// Module: Notification Policy Runtime
// Description: Lifecycle engine, in-memory API, and audit sinks.
// Purpose: Execute resource lifecycle operations against a vendor API seam.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime components that drive [`crate::NotificationPolicyApi`]
//! implementations on behalf of the host.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod lifecycle;
pub mod memory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::JsonlAuditSink;
pub use audit::NoopAuditSink;
pub use lifecycle::NotificationPolicyResource;
pub use lifecycle::ResourceError;
pub use memory::InMemoryNotificationPolicyApi;
