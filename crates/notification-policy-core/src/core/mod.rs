// crates/notification-policy-core/src/core/mod.rs
// ============================================================================
// Module: Notification Policy Core Types
// Description: Data model for notification policy resources.
// Purpose: Group identifiers, filters, policy objects, resource state, and schema.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types shared by the lifecycle runtime, the HTTP client, and the CLI.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod filters;
pub mod identifiers;
pub mod policy;
pub mod resource;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use filters::FilterRecord;
pub use filters::FilterSet;
pub use identifiers::AccountId;
pub use identifiers::PolicyId;
pub use policy::MechanismIntegration;
pub use policy::MechanismKind;
pub use policy::Mechanisms;
pub use policy::NotificationPolicy;
pub use resource::ImportId;
pub use resource::IntegrationBlock;
pub use resource::IntegrationBlocks;
pub use resource::PolicyConfig;
pub use resource::PolicyState;
pub use schema::ResourceSchema;
