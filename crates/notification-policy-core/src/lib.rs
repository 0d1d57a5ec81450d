// crates/notification-policy-core/src/lib.rs
// ============================================================================
// Module: Notification Policy Core
// Description: Data model, filter codec, and lifecycle for notification policies.
// Purpose: Provide the backend-agnostic core of the notification_policy resource.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate holds everything about the `notification_policy` resource that
//! does not depend on a transport: the filter codec ([`flatten`] / [`expand`]),
//! the vendor policy model, resource configuration and state, the schema
//! declaration, and the lifecycle runtime over the [`NotificationPolicyApi`]
//! seam.
//! Invariants:
//! - The filter codec is total and round-trips every filter set without
//!   empty value lists.
//! - Lifecycle operations never retry and emit one audit event each.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::AccountId;
pub use crate::core::FilterRecord;
pub use crate::core::FilterSet;
pub use crate::core::ImportId;
pub use crate::core::IntegrationBlock;
pub use crate::core::IntegrationBlocks;
pub use crate::core::MechanismIntegration;
pub use crate::core::MechanismKind;
pub use crate::core::Mechanisms;
pub use crate::core::NotificationPolicy;
pub use crate::core::PolicyConfig;
pub use crate::core::PolicyId;
pub use crate::core::PolicyState;
pub use crate::core::ResourceSchema;
pub use crate::core::filters::expand;
pub use crate::core::filters::flatten;
pub use crate::core::schema::notification_policy_schema;

pub use crate::interfaces::ApiError;
pub use crate::interfaces::AuditSink;
pub use crate::interfaces::LifecycleEvent;
pub use crate::interfaces::LifecycleOperation;
pub use crate::interfaces::LifecycleOutcome;
pub use crate::interfaces::NotificationPolicyApi;
pub use crate::runtime::InMemoryNotificationPolicyApi;
pub use crate::runtime::JsonlAuditSink;
pub use crate::runtime::NoopAuditSink;
pub use crate::runtime::NotificationPolicyResource;
pub use crate::runtime::ResourceError;
