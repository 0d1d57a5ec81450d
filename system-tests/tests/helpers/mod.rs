// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for acceptance suites.
// Purpose: Build live resources and guarantee cleanup of created policies.
// Dependencies: system-tests, notification-policy-client, notification-policy-core
// ============================================================================

//! ## Overview
//! [`live_resource`] resolves the acceptance target from the environment and
//! returns `None` when acceptance is disabled. [`PolicyCleanup`] deletes the
//! tracked policy when dropped so failed assertions do not leak policies.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]
#![allow(
    clippy::expect_used,
    clippy::print_stderr,
    reason = "Helpers fail fast on misconfiguration and report skips."
)]

use std::io::Write;

use notification_policy_client::HttpNotificationPolicyClient;
use notification_policy_core::NotificationPolicyResource;
use notification_policy_core::PolicyConfig;
use notification_policy_core::PolicyState;
use notification_policy_core::ResourceError;
use system_tests::config::AcceptanceTarget;
use system_tests::config::SystemTestConfig;

/// Live resource handler plus the target it was built for.
pub struct LiveResource {
    /// Resource lifecycle handler.
    pub resource: NotificationPolicyResource<HttpNotificationPolicyClient>,
    /// Account, credentials, and integration target.
    pub target: AcceptanceTarget,
}

/// Builds a live resource, or returns `None` to skip the calling test.
pub fn live_resource(test: &str) -> Option<LiveResource> {
    let config = SystemTestConfig::load().expect("system test environment");
    let Some(target) = config.acceptance_target().expect("acceptance target") else {
        let _ = writeln!(std::io::stderr(), "skipping {test}: acceptance disabled");
        return None;
    };
    let client = HttpNotificationPolicyClient::new(&target.client).expect("http client");
    Some(LiveResource {
        resource: NotificationPolicyResource::new(client),
        target,
    })
}

/// Deletes the tracked policy on drop.
pub struct PolicyCleanup<'a> {
    /// Resource used for deletion.
    resource: &'a NotificationPolicyResource<HttpNotificationPolicyClient>,
    /// Last known state of the policy, if one exists.
    state: Option<PolicyState>,
}

impl<'a> PolicyCleanup<'a> {
    /// Creates a guard with nothing tracked.
    pub const fn new(resource: &'a NotificationPolicyResource<HttpNotificationPolicyClient>) -> Self {
        Self {
            resource,
            state: None,
        }
    }

    /// Creates a policy and tracks it, including one left behind by a failed
    /// read-back.
    pub fn create(&mut self, config: &PolicyConfig) -> Result<PolicyState, ResourceError> {
        let result = self.resource.create(config);
        match &result {
            Ok(state) => self.track(state),
            Err(error) => {
                if let Some(state) = error.recovered_state() {
                    self.track(state);
                }
            }
        }
        result
    }

    /// Tracks the latest state of the policy.
    pub fn track(&mut self, state: &PolicyState) {
        self.state = Some(state.clone());
    }

    /// Deletes the tracked policy now.
    pub fn delete(&mut self) -> Result<(), String> {
        match self.state.take() {
            Some(state) => self.resource.delete(&state).map_err(|err| err.to_string()),
            None => Ok(()),
        }
    }
}

impl Drop for PolicyCleanup<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.delete() {
            let _ = writeln!(std::io::stderr(), "cleanup failed: {err}");
        }
    }
}
