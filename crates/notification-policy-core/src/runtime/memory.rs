// crates/notification-policy-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Notification Policy API
// Description: Deterministic in-process stand-in for the vendor policy API.
// Purpose: Support offline lifecycle runs and tests without network access.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryNotificationPolicyApi`] stores policies per account in a
//! mutex-guarded map and assigns sequential identifiers. Timestamps are
//! logical revision labels so results are reproducible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::AccountId;
use crate::core::NotificationPolicy;
use crate::core::PolicyId;
use crate::interfaces::ApiError;
use crate::interfaces::NotificationPolicyApi;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Mutable store contents.
#[derive(Debug, Default)]
struct MemoryState {
    /// Policies keyed by account and policy id.
    policies: BTreeMap<(AccountId, PolicyId), NotificationPolicy>,
    /// Last assigned sequence number.
    sequence: u64,
    /// Armed error and the number of calls that still succeed before it.
    pending_failure: Option<(usize, ApiError)>,
}

impl MemoryState {
    /// Advances the sequence and returns the new value.
    const fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Counts down the armed failure and returns it once it is due.
    fn take_failure(&mut self) -> Result<(), ApiError> {
        match self.pending_failure.take() {
            Some((0, error)) => Err(error),
            Some((remaining, error)) => {
                self.pending_failure = Some((remaining - 1, error));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// In-memory implementation of [`NotificationPolicyApi`].
#[derive(Debug, Default)]
pub struct InMemoryNotificationPolicyApi {
    /// Guarded store contents.
    state: Mutex<MemoryState>,
}

impl InMemoryNotificationPolicyApi {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms an error to be returned by the next API call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the store lock is poisoned.
    pub fn fail_next(&self, error: ApiError) -> Result<(), ApiError> {
        self.fail_after(0, error)
    }

    /// Arms an error for the call that follows `calls` successful calls.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the store lock is poisoned.
    pub fn fail_after(&self, calls: usize, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.pending_failure = Some((calls, error));
        Ok(())
    }

    /// Returns the number of stored policies across all accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the store lock is poisoned.
    pub fn len(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.policies.len())
    }

    /// Returns true when no policies are stored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.lock()?.policies.is_empty())
    }

    /// Locks the store.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|_| ApiError::Transport("in-memory policy store lock poisoned".to_string()))
    }
}

impl NotificationPolicyApi for InMemoryNotificationPolicyApi {
    fn create_policy(
        &self,
        account_id: &AccountId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        let mut state = self.lock()?;
        state.take_failure()?;
        let sequence = state.next_sequence();
        let id = PolicyId::new(format!("{sequence:032x}"));
        let revision = format!("rev-{sequence}");
        let stored = NotificationPolicy {
            id: Some(id.clone()),
            created: Some(revision.clone()),
            modified: Some(revision),
            ..policy.clone()
        };
        state.policies.insert((account_id.clone(), id.clone()), stored);
        Ok(id)
    }

    fn get_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
    ) -> Result<NotificationPolicy, ApiError> {
        let mut state = self.lock()?;
        state.take_failure()?;
        state
            .policies
            .get(&(account_id.clone(), policy_id.clone()))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn update_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        let mut state = self.lock()?;
        state.take_failure()?;
        let sequence = state.next_sequence();
        let key = (account_id.clone(), policy_id.clone());
        let existing = state.policies.get_mut(&key).ok_or(ApiError::NotFound)?;
        *existing = NotificationPolicy {
            id: Some(policy_id.clone()),
            created: existing.created.clone(),
            modified: Some(format!("rev-{sequence}")),
            ..policy.clone()
        };
        Ok(policy_id.clone())
    }

    fn delete_policy(&self, account_id: &AccountId, policy_id: &PolicyId) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        state.take_failure()?;
        state
            .policies
            .remove(&(account_id.clone(), policy_id.clone()))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}
