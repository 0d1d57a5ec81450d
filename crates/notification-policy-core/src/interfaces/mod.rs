// crates/notification-policy-core/src/interfaces/mod.rs
// ============================================================================
// Module: Notification Policy Interfaces
// Description: Backend-agnostic interfaces for the vendor API and audit logging.
// Purpose: Define the contract surfaces used by the resource lifecycle.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! The lifecycle runtime talks to the vendor through [`NotificationPolicyApi`]
//! and reports every operation through an [`AuditSink`]. Implementations must
//! not retry; transient-failure handling belongs to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::AccountId;
use crate::core::NotificationPolicy;
use crate::core::PolicyId;

// ============================================================================
// SECTION: Vendor API
// ============================================================================

/// Errors returned by [`NotificationPolicyApi`] implementations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages may include untrusted server text but never credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The policy does not exist.
    #[error("notification policy not found")]
    NotFound,
    /// The API answered with a non-success status.
    #[error("api returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text reported by the API.
        message: String,
    },
    /// The API answered 2xx but reported failure in the response envelope.
    #[error("api rejected request: {0}")]
    Rejected(String),
    /// The response body could not be decoded.
    #[error("invalid api response: {0}")]
    Decode(String),
    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// Vendor API operations on notification policies.
pub trait NotificationPolicyApi {
    /// Creates a policy and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    fn create_policy(
        &self,
        account_id: &AccountId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError>;

    /// Fetches a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the policy does not exist, or
    /// another [`ApiError`] when the request fails.
    fn get_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
    ) -> Result<NotificationPolicy, ApiError>;

    /// Replaces a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    fn update_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError>;

    /// Deletes a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails.
    fn delete_policy(&self, account_id: &AccountId, policy_id: &PolicyId) -> Result<(), ApiError>;
}

impl<T: NotificationPolicyApi + ?Sized> NotificationPolicyApi for &T {
    fn create_policy(
        &self,
        account_id: &AccountId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        (**self).create_policy(account_id, policy)
    }

    fn get_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
    ) -> Result<NotificationPolicy, ApiError> {
        (**self).get_policy(account_id, policy_id)
    }

    fn update_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        (**self).update_policy(account_id, policy_id, policy)
    }

    fn delete_policy(&self, account_id: &AccountId, policy_id: &PolicyId) -> Result<(), ApiError> {
        (**self).delete_policy(account_id, policy_id)
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Lifecycle operation labels.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOperation {
    /// Resource creation.
    Create,
    /// Resource refresh.
    Read,
    /// Resource update.
    Update,
    /// Resource deletion.
    Delete,
    /// Resource import.
    Import,
}

impl LifecycleOperation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        }
    }

    /// Returns the present participle used in error messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Read => "reading",
            Self::Update => "updating",
            Self::Delete => "deleting",
            Self::Import => "importing",
        }
    }
}

/// Lifecycle outcome labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOutcome {
    /// Operation succeeded.
    Ok,
    /// Operation failed.
    Error,
}

/// Structured record of one lifecycle operation.
///
/// # Invariants
/// - `error` is set exactly when `outcome` is [`LifecycleOutcome::Error`].
/// - `policy_id` is `None` only when the operation failed before an id was known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleEvent {
    /// Operation performed.
    pub operation: LifecycleOperation,
    /// Owning account.
    pub account_id: AccountId,
    /// Policy identifier when known.
    pub policy_id: Option<PolicyId>,
    /// Operation outcome.
    pub outcome: LifecycleOutcome,
    /// Error message for failed operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Receives lifecycle events.
pub trait AuditSink: Send + Sync {
    /// Records a lifecycle event. Failures to persist must not affect the operation.
    fn record(&self, event: &LifecycleEvent);
}
