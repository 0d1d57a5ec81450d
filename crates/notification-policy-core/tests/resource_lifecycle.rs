// crates/notification-policy-core/tests/resource_lifecycle.rs
// ============================================================================
// Module: Resource Lifecycle Tests
// Description: Create/read/update/delete/import against the in-memory API.
// Purpose: Validate read-back state, update semantics, and audit emission.
// Dependencies: notification-policy-core
// ============================================================================

//! ## Overview
//! Drives [`NotificationPolicyResource`] over
//! [`InMemoryNotificationPolicyApi`] through the basic and filtered policy
//! scenarios, then checks error propagation and audit events.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use notification_policy_core::AccountId;
use notification_policy_core::ApiError;
use notification_policy_core::AuditSink;
use notification_policy_core::FilterRecord;
use notification_policy_core::InMemoryNotificationPolicyApi;
use notification_policy_core::IntegrationBlock;
use notification_policy_core::IntegrationBlocks;
use notification_policy_core::LifecycleEvent;
use notification_policy_core::LifecycleOperation;
use notification_policy_core::LifecycleOutcome;
use notification_policy_core::NotificationPolicyApi;
use notification_policy_core::NotificationPolicyResource;
use notification_policy_core::PolicyConfig;
use notification_policy_core::ResourceError;
use notification_policy_core::expand;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const ACCOUNT: &str = "f037e56e89293a057740de681ac9abbe";

#[derive(Default)]
struct RecordingAudit {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingAudit {
    fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

impl AuditSink for RecordingAudit {
    fn record(&self, event: &LifecycleEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

fn email_integration() -> IntegrationBlocks {
    IntegrationBlocks {
        email_integration: vec![IntegrationBlock::new("test@example.com", "")],
        ..IntegrationBlocks::default()
    }
}

fn ssl_policy() -> PolicyConfig {
    PolicyConfig {
        account_id: AccountId::new(ACCOUNT),
        name: "test SSL policy from terraform provider".to_string(),
        description: "test description".to_string(),
        enabled: true,
        alert_type: "universal_ssl_event_type".to_string(),
        integrations: email_integration(),
        filters: Vec::new(),
    }
}

fn usage_policy() -> PolicyConfig {
    PolicyConfig {
        account_id: AccountId::new(ACCOUNT),
        name: "workers usage notification".to_string(),
        description: "test description".to_string(),
        enabled: true,
        alert_type: "billing_usage_alert".to_string(),
        integrations: email_integration(),
        filters: vec![
            FilterRecord::new("product", vec!["worker_requests".to_string()]),
            FilterRecord::new("limit", vec!["100".to_string()]),
        ],
    }
}

fn resource_with_audit()
-> (NotificationPolicyResource<InMemoryNotificationPolicyApi>, Arc<RecordingAudit>) {
    let audit = Arc::new(RecordingAudit::default());
    let resource =
        NotificationPolicyResource::with_audit(InMemoryNotificationPolicyApi::new(), audit.clone());
    (resource, audit)
}

// ============================================================================
// SECTION: Basic Scenario
// ============================================================================

#[test]
fn create_reads_back_declared_fields() {
    let (resource, _) = resource_with_audit();
    let config = ssl_policy();

    let state = resource.create(&config).unwrap();
    assert_eq!(state.name, "test SSL policy from terraform provider");
    assert_eq!(state.description, "test description");
    assert!(state.enabled);
    assert_eq!(state.alert_type, "universal_ssl_event_type");
    assert_eq!(state.account_id.as_str(), ACCOUNT);
    assert_eq!(state.integrations.email_integration, vec![IntegrationBlock::new(
        "test@example.com",
        ""
    )]);
    assert!(state.filters.is_empty());
    assert!(state.created.is_some());
    assert!(!config.differs_from(&state));
}

#[test]
fn update_changes_only_name_and_description() {
    let (resource, _) = resource_with_audit();
    let created = resource.create(&ssl_policy()).unwrap();

    let mut updated_config = ssl_policy();
    updated_config.name = "updated test SSL policy from terraform provider".to_string();
    updated_config.description = "updated description".to_string();
    assert!(updated_config.differs_from(&created));

    let updated = resource.update(&created, &updated_config).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "updated test SSL policy from terraform provider");
    assert_eq!(updated.description, "updated description");
    assert_eq!(updated.enabled, created.enabled);
    assert_eq!(updated.alert_type, created.alert_type);
    assert_eq!(updated.account_id, created.account_id);
    assert_eq!(updated.integrations, created.integrations);
    assert_eq!(updated.created, created.created);
    assert_ne!(updated.modified, created.modified);

    let refreshed = resource.read(&updated).unwrap();
    assert_eq!(refreshed, updated);
}

#[test]
fn delete_removes_remote_policy() {
    let (resource, _) = resource_with_audit();
    let state = resource.create(&ssl_policy()).unwrap();

    resource.delete(&state).unwrap();
    assert!(resource.api().is_empty().unwrap());

    let error = resource.read(&state).unwrap_err();
    assert!(error.is_not_found());
}

// ============================================================================
// SECTION: Filtered Scenario
// ============================================================================

#[test]
fn filtered_policy_reads_back_filter_block() {
    let (resource, _) = resource_with_audit();
    let config = usage_policy();

    let state = resource.create(&config).unwrap();
    assert_eq!(state.alert_type, "billing_usage_alert");
    assert!(expand(&state.filters).equivalent(&expand(&config.filters)));

    let filters = expand(&state.filters);
    assert_eq!(filters.len(), 2);
    assert_eq!(filters.get("product").unwrap(), ["worker_requests".to_string()].as_slice());
    assert_eq!(filters.get("limit").unwrap(), ["100".to_string()].as_slice());
}

#[test]
fn filtered_policy_update_keeps_filters() {
    let (resource, _) = resource_with_audit();
    let created = resource.create(&usage_policy()).unwrap();

    let mut config = usage_policy();
    config.name = "updated workers usage notification".to_string();
    config.description = "updated description".to_string();
    config.filters.reverse();

    let updated = resource.update(&created, &config).unwrap();
    assert_eq!(updated.name, "updated workers usage notification");
    assert!(expand(&updated.filters).equivalent(&expand(&created.filters)));
    assert!(!config.differs_from(&updated));
}

#[test]
fn reordered_filter_values_are_not_a_change() {
    let (resource, _) = resource_with_audit();
    let mut config = usage_policy();
    config.filters =
        vec![FilterRecord::new("zones", vec!["b".to_string(), "a".to_string()])];
    let state = resource.create(&config).unwrap();

    config.filters = vec![FilterRecord::new("zones", vec!["a".to_string(), "b".to_string()])];
    assert!(!config.differs_from(&state));
}

// ============================================================================
// SECTION: Account Changes
// ============================================================================

#[test]
fn changing_account_replaces_policy() {
    let (resource, _) = resource_with_audit();
    let created = resource.create(&ssl_policy()).unwrap();

    let mut config = ssl_policy();
    config.account_id = AccountId::new("other-account");
    let replaced = resource.update(&created, &config).unwrap();

    assert_eq!(replaced.account_id.as_str(), "other-account");
    assert_ne!(replaced.id, created.id);
    assert_eq!(
        resource.api().get_policy(&created.account_id, &created.id),
        Err(ApiError::NotFound)
    );
    assert_eq!(resource.api().len().unwrap(), 1);
}

// ============================================================================
// SECTION: Import
// ============================================================================

#[test]
fn import_reads_existing_policy() {
    let (resource, _) = resource_with_audit();
    let created = resource.create(&usage_policy()).unwrap();

    let imported = resource.import(&format!("{ACCOUNT}/{}", created.id)).unwrap();
    assert_eq!(imported, created);
    assert_eq!(created.import_id().to_string(), format!("{ACCOUNT}/{}", created.id));
}

#[test]
fn import_rejects_malformed_ids() {
    let (resource, audit) = resource_with_audit();
    for raw in ["", "only-account", "/policy", "account/", "a/b/c"] {
        let error = resource.import(raw).unwrap_err();
        assert_eq!(error, ResourceError::InvalidImportId(raw.to_string()));
    }
    assert!(audit.events().iter().all(|event| event.outcome == LifecycleOutcome::Error));
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn api_failures_surface_with_operation_context() {
    let (resource, _) = resource_with_audit();
    resource
        .api()
        .fail_next(ApiError::Status {
            status: 400,
            message: "alert_type is invalid".to_string(),
        })
        .unwrap();

    let error = resource.create(&ssl_policy()).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("error creating notification policy"), "{message}");
    assert!(message.contains("\"test SSL policy from terraform provider\""), "{message}");
    assert!(message.contains("alert_type is invalid"), "{message}");
    assert!(resource.api().is_empty().unwrap());
}

#[test]
fn update_of_missing_policy_fails() {
    let (resource, _) = resource_with_audit();
    let state = resource.create(&ssl_policy()).unwrap();
    resource.api().delete_policy(&state.account_id, &state.id).unwrap();

    let error = resource.update(&state, &ssl_policy()).unwrap_err();
    assert!(error.is_not_found());
    assert!(error.to_string().starts_with("error updating notification policy"));
}

#[test]
fn failed_read_back_after_create_returns_recoverable_state() {
    let (resource, audit) = resource_with_audit();
    resource.api().fail_after(1, ApiError::Transport("timeout".to_string())).unwrap();
    let config = usage_policy();

    let error = resource.create(&config).unwrap_err();
    assert!(error.to_string().starts_with("error creating notification policy"), "{error}");
    let recovered = error.recovered_state().expect("state for the created policy").clone();
    assert_eq!(resource.api().len().unwrap(), 1);
    assert!(recovered.created.is_none());
    assert!(!config.differs_from(&recovered));

    let refreshed = resource.read(&recovered).unwrap();
    assert_eq!(refreshed.id, recovered.id);
    assert!(!config.differs_from(&refreshed));

    let create_event = &audit.events()[0];
    assert_eq!(create_event.outcome, LifecycleOutcome::Error);
    assert_eq!(create_event.policy_id.as_ref(), Some(&recovered.id));
}

#[test]
fn failed_create_during_account_change_keeps_old_policy() {
    let (resource, _) = resource_with_audit();
    let created = resource.create(&ssl_policy()).unwrap();
    resource
        .api()
        .fail_next(ApiError::Status {
            status: 403,
            message: "account not permitted".to_string(),
        })
        .unwrap();

    let mut config = ssl_policy();
    config.account_id = AccountId::new("other-account");
    let error = resource.update(&created, &config).unwrap_err();
    assert!(error.recovered_state().is_none());
    assert_eq!(resource.api().len().unwrap(), 1);
    assert_eq!(resource.read(&created).unwrap(), created);
}

#[test]
fn failed_delete_during_account_change_reports_replacement() {
    let (resource, audit) = resource_with_audit();
    let created = resource.create(&ssl_policy()).unwrap();
    resource.api().fail_after(2, ApiError::Transport("connection reset".to_string())).unwrap();

    let mut config = ssl_policy();
    config.account_id = AccountId::new("other-account");
    let error = resource.update(&created, &config).unwrap_err();
    let replacement = error.recovered_state().expect("replacement state");
    assert_eq!(replacement.account_id.as_str(), "other-account");
    assert_ne!(replacement.id, created.id);
    assert!(replacement.created.is_some());
    assert_eq!(resource.read(replacement).unwrap(), *replacement);

    let update_event = audit
        .events()
        .into_iter()
        .find(|event| event.operation == LifecycleOperation::Update)
        .expect("update event");
    assert_eq!(update_event.outcome, LifecycleOutcome::Error);
    assert_eq!(update_event.account_id.as_str(), ACCOUNT);
    assert_eq!(update_event.policy_id.as_ref(), Some(&created.id));
}

#[test]
fn failed_create_audits_without_policy_id() {
    let (resource, audit) = resource_with_audit();
    resource.api().fail_next(ApiError::Transport("timeout".to_string())).unwrap();

    let error = resource.create(&ssl_policy()).unwrap_err();
    assert!(error.recovered_state().is_none());
    let events = audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].account_id.as_str(), ACCOUNT);
    assert_eq!(events[0].policy_id, None);
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn every_operation_records_one_event() {
    let (resource, audit) = resource_with_audit();
    let state = resource.create(&ssl_policy()).unwrap();
    let state = resource.read(&state).unwrap();
    let state = resource.update(&state, &usage_policy()).unwrap();
    resource.delete(&state).unwrap();
    let _ = resource.read(&state);

    let events = audit.events();
    let operations: Vec<LifecycleOperation> = events.iter().map(|event| event.operation).collect();
    assert_eq!(operations, vec![
        LifecycleOperation::Create,
        LifecycleOperation::Read,
        LifecycleOperation::Update,
        LifecycleOperation::Delete,
        LifecycleOperation::Read,
    ]);
    assert!(events[..4].iter().all(|event| event.outcome == LifecycleOutcome::Ok));
    assert!(events[..4].iter().all(|event| event.policy_id.as_ref() == Some(&state.id)));

    let last = &events[4];
    assert_eq!(last.outcome, LifecycleOutcome::Error);
    assert_eq!(last.policy_id.as_ref(), Some(&state.id));
    assert!(last.error.as_deref().unwrap().contains("not found"));
}
