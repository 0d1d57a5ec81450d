// crates/notification-policy-core/src/runtime/lifecycle.rs
// ============================================================================
// Module: Notification Policy Lifecycle
// Description: Create, read, update, delete, and import callbacks for the resource.
// Purpose: Translate resource configuration and state into vendor API calls.
// Dependencies: thiserror, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`NotificationPolicyResource`] implements the resource lifecycle over any
//! [`NotificationPolicyApi`]. Writes are followed by a read so returned state
//! always reflects what the API stored. Every operation emits exactly one
//! [`LifecycleEvent`] to the configured [`AuditSink`].
//! Invariants:
//! - No operation retries; the first API failure is returned.
//! - Changing `account_id` replaces the remote policy: the replacement is
//!   created first, then the old policy is deleted.
//! - A write that succeeded before a later call failed is reported as
//!   [`ResourceError::Incomplete`] with the state the caller must keep.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::AccountId;
use crate::core::ImportId;
use crate::core::PolicyConfig;
use crate::core::PolicyId;
use crate::core::PolicyState;
use crate::interfaces::ApiError;
use crate::interfaces::AuditSink;
use crate::interfaces::LifecycleEvent;
use crate::interfaces::LifecycleOperation;
use crate::interfaces::LifecycleOutcome;
use crate::interfaces::NotificationPolicyApi;
use crate::runtime::audit::NoopAuditSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reported to the host for a lifecycle operation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `Api` carries the account and policy of the call that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A vendor API call failed.
    #[error("error {} notification policy {target}: {source}", .operation.verb())]
    Api {
        /// Operation that failed.
        operation: LifecycleOperation,
        /// Account the failing call targeted.
        account_id: AccountId,
        /// Policy the failing call targeted; `None` before the API assigned one.
        policy_id: Option<PolicyId>,
        /// Policy id, or the quoted policy name when no id exists yet.
        target: String,
        /// Underlying API failure.
        #[source]
        source: ApiError,
    },
    /// A write reached the API but a later call of the same operation failed.
    ///
    /// `state` describes the policy that now exists remotely and replaces
    /// whatever state the caller held before the operation.
    #[error("{error}")]
    Incomplete {
        /// State of the policy left behind by the partial operation.
        state: Box<PolicyState>,
        /// Failure that interrupted the operation.
        error: Box<Self>,
    },
    /// Import identifier did not have the `<account_id>/<policy_id>` form.
    #[error("invalid import id \"{0}\": expected <account_id>/<policy_id>")]
    InvalidImportId(String),
}

impl ResourceError {
    /// Returns the API failure behind this error, if any.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api {
                source, ..
            } => Some(source),
            Self::Incomplete {
                error, ..
            } => error.api_error(),
            Self::InvalidImportId(_) => None,
        }
    }

    /// Returns true when the remote policy no longer exists.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.api_error(), Some(ApiError::NotFound))
    }

    /// Returns the state callers must persist despite the failure.
    #[must_use]
    pub fn recovered_state(&self) -> Option<&PolicyState> {
        match self {
            Self::Incomplete {
                state, ..
            } => Some(state.as_ref()),
            Self::Api {
                ..
            }
            | Self::InvalidImportId(_) => None,
        }
    }

    /// Returns the account and policy targeted by the failing API call.
    fn failed_call(&self) -> Option<(&AccountId, Option<&PolicyId>)> {
        match self {
            Self::Api {
                account_id,
                policy_id,
                ..
            } => Some((account_id, policy_id.as_ref())),
            Self::Incomplete {
                error, ..
            } => error.failed_call(),
            Self::InvalidImportId(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Resource
// ============================================================================

/// Lifecycle callbacks for the `notification_policy` resource.
pub struct NotificationPolicyResource<A> {
    /// Vendor API client.
    api: A,
    /// Destination for lifecycle events.
    audit: Arc<dyn AuditSink>,
}

impl<A: NotificationPolicyApi> NotificationPolicyResource<A> {
    /// Creates a resource handler that discards audit events.
    pub fn new(api: A) -> Self {
        Self::with_audit(api, Arc::new(NoopAuditSink))
    }

    /// Creates a resource handler reporting to `audit`.
    pub fn with_audit(api: A, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            api,
            audit,
        }
    }

    /// Returns the underlying API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Creates the remote policy and returns the stored state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when creation or the read-back fails.
    pub fn create(&self, config: &PolicyConfig) -> Result<PolicyState, ResourceError> {
        let result = self.create_remote(config);
        self.finish(LifecycleOperation::Create, &config.account_id, result)
    }

    /// Refreshes state from the remote policy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the policy cannot be fetched, including
    /// when it no longer exists.
    pub fn read(&self, state: &PolicyState) -> Result<PolicyState, ResourceError> {
        let result = self.fetch(LifecycleOperation::Read, &state.account_id, &state.id);
        self.finish(LifecycleOperation::Read, &state.account_id, result)
    }

    /// Applies `config` to the policy described by `state`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the update or the read-back fails.
    pub fn update(
        &self,
        state: &PolicyState,
        config: &PolicyConfig,
    ) -> Result<PolicyState, ResourceError> {
        let result = if config.account_id == state.account_id {
            self.update_remote(state, config)
        } else {
            self.replace_remote(state, config)
        };
        self.finish(LifecycleOperation::Update, &config.account_id, result)
    }

    /// Deletes the remote policy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when deletion fails.
    pub fn delete(&self, state: &PolicyState) -> Result<(), ResourceError> {
        let result = self
            .api
            .delete_policy(&state.account_id, &state.id)
            .map(|()| state.id.clone())
            .map_err(|source| {
                policy_failure(LifecycleOperation::Delete, &state.account_id, &state.id, source)
            });
        self.finish(LifecycleOperation::Delete, &state.account_id, result.map(Deleted)).map(|_| ())
    }

    /// Imports an existing policy identified by `<account_id>/<policy_id>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidImportId`] for malformed identifiers, or
    /// [`ResourceError::Api`] when the policy cannot be fetched.
    pub fn import(&self, raw_id: &str) -> Result<PolicyState, ResourceError> {
        let Some(import_id) = ImportId::parse(raw_id) else {
            let account = AccountId::new(raw_id.split('/').next().unwrap_or_default());
            let error = ResourceError::InvalidImportId(raw_id.to_string());
            return self.finish(LifecycleOperation::Import, &account, Err(error));
        };
        let result =
            self.fetch(LifecycleOperation::Import, &import_id.account_id, &import_id.policy_id);
        self.finish(LifecycleOperation::Import, &import_id.account_id, result)
    }

    /// Creates the remote policy and reads it back.
    fn create_remote(&self, config: &PolicyConfig) -> Result<PolicyState, ResourceError> {
        let body = config.to_policy(None);
        let id = self.api.create_policy(&config.account_id, &body).map_err(|source| {
            named_failure(LifecycleOperation::Create, &config.account_id, &config.name, source)
        })?;
        self.fetch(LifecycleOperation::Create, &config.account_id, &id)
            .map_err(|error| incomplete(PolicyState::from_config(config, id), error))
    }

    /// Updates the remote policy in place and reads it back.
    fn update_remote(
        &self,
        state: &PolicyState,
        config: &PolicyConfig,
    ) -> Result<PolicyState, ResourceError> {
        let body = config.to_policy(Some(state.id.clone()));
        let id = self.api.update_policy(&state.account_id, &state.id, &body).map_err(|source| {
            policy_failure(LifecycleOperation::Update, &state.account_id, &state.id, source)
        })?;
        self.fetch(LifecycleOperation::Update, &state.account_id, &id)
    }

    /// Replaces the remote policy under a different account.
    ///
    /// The replacement is created before the old policy is removed, so a
    /// failed create leaves the old policy and the caller's state intact.
    fn replace_remote(
        &self,
        state: &PolicyState,
        config: &PolicyConfig,
    ) -> Result<PolicyState, ResourceError> {
        let body = config.to_policy(None);
        let id = self.api.create_policy(&config.account_id, &body).map_err(|source| {
            named_failure(LifecycleOperation::Update, &config.account_id, &config.name, source)
        })?;
        let fetched = self.fetch(LifecycleOperation::Update, &config.account_id, &id);
        let removed = self.api.delete_policy(&state.account_id, &state.id).map_err(|source| {
            policy_failure(LifecycleOperation::Update, &state.account_id, &state.id, source)
        });
        match (fetched, removed) {
            (Ok(replacement), Ok(())) => Ok(replacement),
            (Ok(replacement), Err(error)) => Err(incomplete(replacement, error)),
            (Err(error), _) => Err(incomplete(PolicyState::from_config(config, id), error)),
        }
    }

    /// Fetches the remote policy and converts it into state.
    fn fetch(
        &self,
        operation: LifecycleOperation,
        account_id: &AccountId,
        policy_id: &PolicyId,
    ) -> Result<PolicyState, ResourceError> {
        let policy = self
            .api
            .get_policy(account_id, policy_id)
            .map_err(|source| policy_failure(operation, account_id, policy_id, source))?;
        Ok(PolicyState::from_remote(account_id.clone(), policy_id, &policy))
    }

    /// Records the audit event for an operation and passes the result through.
    fn finish<T: AuditTarget>(
        &self,
        operation: LifecycleOperation,
        account_id: &AccountId,
        result: Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let event = match &result {
            Ok(value) => LifecycleEvent {
                operation,
                account_id: account_id.clone(),
                policy_id: Some(value.policy_id().clone()),
                outcome: LifecycleOutcome::Ok,
                error: None,
            },
            Err(error) => {
                let (failed_account, failed_policy) =
                    error.failed_call().unwrap_or((account_id, None));
                LifecycleEvent {
                    operation,
                    account_id: failed_account.clone(),
                    policy_id: failed_policy.cloned(),
                    outcome: LifecycleOutcome::Error,
                    error: Some(error.to_string()),
                }
            }
        };
        self.audit.record(&event);
        result
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Successful operation result that identifies a policy.
trait AuditTarget {
    /// Returns the policy the operation acted on.
    fn policy_id(&self) -> &PolicyId;
}

impl AuditTarget for PolicyState {
    fn policy_id(&self) -> &PolicyId {
        &self.id
    }
}

/// Marker result for a completed deletion.
struct Deleted(PolicyId);

impl AuditTarget for Deleted {
    fn policy_id(&self) -> &PolicyId {
        &self.0
    }
}

/// Wraps a failed call against an existing policy.
fn policy_failure(
    operation: LifecycleOperation,
    account_id: &AccountId,
    policy_id: &PolicyId,
    source: ApiError,
) -> ResourceError {
    ResourceError::Api {
        operation,
        account_id: account_id.clone(),
        policy_id: Some(policy_id.clone()),
        target: policy_id.to_string(),
        source,
    }
}

/// Wraps a failed call made before the API assigned an id.
fn named_failure(
    operation: LifecycleOperation,
    account_id: &AccountId,
    name: &str,
    source: ApiError,
) -> ResourceError {
    ResourceError::Api {
        operation,
        account_id: account_id.clone(),
        policy_id: None,
        target: format!("\"{name}\""),
        source,
    }
}

/// Attaches the state left behind by a partially applied write.
fn incomplete(state: PolicyState, error: ResourceError) -> ResourceError {
    ResourceError::Incomplete {
        state: Box::new(state),
        error: Box::new(error),
    }
}
