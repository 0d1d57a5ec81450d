// system-tests/tests/suites/notification_policy.rs
// ============================================================================
// Module: Notification Policy Acceptance Suite
// Description: Live create, update, import, and delete scenarios.
// Purpose: Validate the lifecycle against the vendor API end to end.
// Dependencies: system-tests helpers
// ============================================================================

//! ## Overview
//! Each scenario creates a uniquely named policy, verifies its attributes,
//! applies an update, checks that import reproduces the updated state, and
//! deletes the policy through [`PolicyCleanup`].

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use notification_policy_core::AccountId;
use notification_policy_core::FilterRecord;
use notification_policy_core::IntegrationBlock;
use notification_policy_core::IntegrationBlocks;
use notification_policy_core::PolicyConfig;
use notification_policy_core::expand;
use system_tests::naming::random_resource_name;

use crate::helpers::PolicyCleanup;
use crate::helpers::live_resource;

fn email_integrations(target: &str) -> IntegrationBlocks {
    IntegrationBlocks {
        email_integration: vec![IntegrationBlock::new(target, "")],
        ..IntegrationBlocks::default()
    }
}

fn ssl_policy(account_id: &AccountId, alert_email: &str) -> PolicyConfig {
    PolicyConfig {
        account_id: account_id.clone(),
        name: "test SSL policy from terraform provider".to_string(),
        description: "test description".to_string(),
        enabled: true,
        alert_type: "universal_ssl_event_type".to_string(),
        integrations: email_integrations(alert_email),
        filters: Vec::new(),
    }
}

#[test]
fn notification_policy_basic_lifecycle() {
    let Some(live) = live_resource("notification_policy_basic_lifecycle") else {
        return;
    };
    let resource = &live.resource;
    let mut cleanup = PolicyCleanup::new(resource);
    let mut config = ssl_policy(&live.target.account_id, &live.target.alert_email);
    config.name = format!("{} {}", config.name, random_resource_name("tf"));

    let created = cleanup.create(&config).expect("create policy");
    assert_eq!(created.name, config.name);
    assert_eq!(created.description, "test description");
    assert!(created.enabled);
    assert_eq!(created.alert_type, "universal_ssl_event_type");
    assert_eq!(created.integrations.email_integration.len(), 1);
    assert_eq!(created.integrations.email_integration[0].id, live.target.alert_email);
    assert!(created.filters.is_empty());

    let mut updated_config = config.clone();
    updated_config.name = format!("updated {}", config.name);
    updated_config.description = "updated description".to_string();
    let updated = resource.update(&created, &updated_config).expect("update policy");
    cleanup.track(&updated);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, updated_config.name);
    assert_eq!(updated.description, "updated description");
    assert_eq!(updated.enabled, created.enabled);
    assert_eq!(updated.alert_type, "universal_ssl_event_type");
    assert_eq!(updated.account_id, created.account_id);
    assert_eq!(updated.integrations, created.integrations);
    assert!(!updated_config.differs_from(&updated));

    let imported =
        resource.import(&format!("{}/{}", updated.account_id.as_str(), updated.id.as_str()));
    assert_eq!(imported.expect("import policy"), resource.read(&updated).expect("read policy"));

    cleanup.delete().expect("delete policy");
    match resource.read(&updated) {
        Err(error) if error.is_not_found() => {}
        other => panic!("expected deleted policy to be gone, got {other:?}"),
    }
}

#[test]
fn notification_policy_with_filters() {
    let Some(live) = live_resource("notification_policy_with_filters") else {
        return;
    };
    let resource = &live.resource;
    let mut cleanup = PolicyCleanup::new(resource);
    let config = PolicyConfig {
        account_id: live.target.account_id.clone(),
        name: format!("workers usage notification {}", random_resource_name("tf")),
        description: "test description".to_string(),
        enabled: true,
        alert_type: "billing_usage_alert".to_string(),
        integrations: email_integrations(&live.target.alert_email),
        filters: vec![
            FilterRecord::new("product", vec!["worker_requests".to_string()]),
            FilterRecord::new("limit", vec!["100".to_string()]),
        ],
    };

    let created = cleanup.create(&config).expect("create policy");
    assert_eq!(created.alert_type, "billing_usage_alert");
    assert!(expand(&created.filters).equivalent(&expand(&config.filters)));

    let mut updated_config = config.clone();
    updated_config.name = format!("updated {}", config.name);
    updated_config.description = "updated description".to_string();
    let updated = resource.update(&created, &updated_config).expect("update policy");
    cleanup.track(&updated);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, updated_config.name);
    assert_eq!(updated.description, "updated description");
    assert!(updated.enabled);
    assert_eq!(updated.alert_type, "billing_usage_alert");
    assert_eq!(updated.account_id, live.target.account_id);
    assert!(expand(&updated.filters).equivalent(&expand(&config.filters)));
    assert!(!updated_config.differs_from(&updated));
}
