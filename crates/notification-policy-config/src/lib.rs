// crates/notification-policy-config/src/lib.rs
// ============================================================================
// Module: Notification Policy Config Library
// Description: Provider configuration model and policy definition loading.
// Purpose: Single source of truth for notification-policy.toml semantics.
// Dependencies: notification-policy-client, notification-policy-core, serde, toml
// ============================================================================

//! ## Overview
//! `notification-policy-config` loads provider settings (API endpoint,
//! credentials, limits, audit output) and declarative policy definitions from
//! TOML. Loading is strict and fail-closed: oversized, non-UTF-8, or invalid
//! inputs are rejected before any API call is made.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod policy;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use policy::*;
