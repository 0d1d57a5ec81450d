// system-tests/src/lib.rs
// ============================================================================
// Module: Notification Policy System Tests Library
// Description: Shared configuration and helpers for live acceptance suites.
// Purpose: Provide common utilities for system-test binaries.
// Dependencies: notification-policy-client, notification-policy-config, rand
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration and helper utilities used by the
//! acceptance binaries in `system-tests/tests`. Acceptance suites talk to the
//! live vendor API and only run when explicitly enabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod naming;
