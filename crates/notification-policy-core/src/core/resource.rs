// crates/notification-policy-core/src/core/resource.rs
// ============================================================================
// Module: Notification Policy Resource Model
// Description: Declarative configuration and state for one policy resource.
// Purpose: Map resource attributes to and from the vendor policy object.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! [`PolicyConfig`] is the desired configuration of a `notification_policy`
//! resource; [`PolicyState`] is what was last observed remotely. Both carry
//! filters in nested-record form ([`FilterRecord`]) and convert through the
//! filter codec at the vendor boundary.
//! Invariants:
//! - Integration names default to an empty string when the API omits them.
//! - Comparisons between configuration and state ignore ordering of
//!   integrations, filter records, and filter values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::filters::FilterRecord;
use crate::core::filters::expand;
use crate::core::filters::flatten;
use crate::core::identifiers::AccountId;
use crate::core::identifiers::PolicyId;
use crate::core::policy::MechanismIntegration;
use crate::core::policy::MechanismKind;
use crate::core::policy::Mechanisms;
use crate::core::policy::NotificationPolicy;

// ============================================================================
// SECTION: Integration Blocks
// ============================================================================

/// One `*_integration` block of the resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntegrationBlock {
    /// Integration identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl IntegrationBlock {
    /// Creates an integration block.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Integration blocks grouped per mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationBlocks {
    /// `email_integration` blocks.
    #[serde(default)]
    pub email_integration: Vec<IntegrationBlock>,
    /// `webhooks_integration` blocks.
    #[serde(default)]
    pub webhooks_integration: Vec<IntegrationBlock>,
    /// `pagerduty_integration` blocks.
    #[serde(default)]
    pub pagerduty_integration: Vec<IntegrationBlock>,
}

impl IntegrationBlocks {
    /// Returns the blocks configured for a mechanism.
    #[must_use]
    pub fn get(&self, kind: MechanismKind) -> &[IntegrationBlock] {
        match kind {
            MechanismKind::Email => &self.email_integration,
            MechanismKind::Webhooks => &self.webhooks_integration,
            MechanismKind::Pagerduty => &self.pagerduty_integration,
        }
    }

    /// Returns the mutable block list for a mechanism.
    const fn get_mut(&mut self, kind: MechanismKind) -> &mut Vec<IntegrationBlock> {
        match kind {
            MechanismKind::Email => &mut self.email_integration,
            MechanismKind::Webhooks => &mut self.webhooks_integration,
            MechanismKind::Pagerduty => &mut self.pagerduty_integration,
        }
    }

    /// Converts the blocks into vendor mechanisms.
    #[must_use]
    pub fn to_mechanisms(&self) -> Mechanisms {
        let mut mechanisms = Mechanisms::default();
        for kind in MechanismKind::ALL {
            *mechanisms.get_mut(kind) = self
                .get(kind)
                .iter()
                .map(|block| MechanismIntegration {
                    id: block.id.clone(),
                    name: Some(block.name.clone()),
                })
                .collect();
        }
        mechanisms
    }

    /// Builds blocks from vendor mechanisms.
    #[must_use]
    pub fn from_mechanisms(mechanisms: &Mechanisms) -> Self {
        let mut blocks = Self::default();
        for kind in MechanismKind::ALL {
            *blocks.get_mut(kind) = mechanisms
                .get(kind)
                .iter()
                .map(|item| {
                    IntegrationBlock::new(item.id.clone(), item.name.clone().unwrap_or_default())
                })
                .collect();
        }
        blocks
    }

    /// Returns a copy with every block list sorted.
    #[must_use]
    fn normalized(&self) -> Self {
        let mut blocks = self.clone();
        for kind in MechanismKind::ALL {
            blocks.get_mut(kind).sort();
        }
        blocks
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Returns the default value for the `enabled` attribute.
const fn default_enabled() -> bool {
    true
}

/// Desired configuration of a `notification_policy` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether the policy delivers alerts.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Alert type the policy subscribes to.
    pub alert_type: String,
    /// Delivery integrations.
    #[serde(flatten)]
    pub integrations: IntegrationBlocks,
    /// Filter block in nested-record form.
    #[serde(default)]
    pub filters: Vec<FilterRecord>,
}

impl PolicyConfig {
    /// Builds the vendor request body for this configuration.
    #[must_use]
    pub fn to_policy(&self, id: Option<PolicyId>) -> NotificationPolicy {
        NotificationPolicy {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
            alert_type: self.alert_type.clone(),
            mechanisms: self.integrations.to_mechanisms(),
            filters: expand(&self.filters),
            conditions: None,
            created: None,
            modified: None,
        }
    }

    /// Returns true when applying this configuration would change `state`.
    #[must_use]
    pub fn differs_from(&self, state: &PolicyState) -> bool {
        self.account_id != state.account_id
            || self.name != state.name
            || self.description != state.description
            || self.enabled != state.enabled
            || self.alert_type != state.alert_type
            || self.integrations.normalized() != state.integrations.normalized()
            || !expand(&self.filters).equivalent(&expand(&state.filters))
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Observed state of a `notification_policy` resource.
///
/// # Invariants
/// - `id` identifies an existing remote policy under `account_id` at the time
///   the state was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    /// Remote policy identifier.
    pub id: PolicyId,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the policy delivers alerts.
    pub enabled: bool,
    /// Alert type the policy subscribes to.
    pub alert_type: String,
    /// Delivery integrations.
    #[serde(flatten)]
    pub integrations: IntegrationBlocks,
    /// Filter block in nested-record form.
    #[serde(default)]
    pub filters: Vec<FilterRecord>,
    /// Creation timestamp reported by the API.
    #[serde(default)]
    pub created: Option<String>,
    /// Last modification timestamp reported by the API.
    #[serde(default)]
    pub modified: Option<String>,
}

impl PolicyState {
    /// Builds state from a policy returned by the API.
    ///
    /// The API response is authoritative for every attribute; `id` falls
    /// back to `fallback_id` when the response omits it.
    #[must_use]
    pub fn from_remote(
        account_id: AccountId,
        fallback_id: &PolicyId,
        policy: &NotificationPolicy,
    ) -> Self {
        Self {
            id: policy.id.clone().unwrap_or_else(|| fallback_id.clone()),
            account_id,
            name: policy.name.clone(),
            description: policy.description.clone(),
            enabled: policy.enabled,
            alert_type: policy.alert_type.clone(),
            integrations: IntegrationBlocks::from_mechanisms(&policy.mechanisms),
            filters: flatten(&policy.filters),
            created: policy.created.clone(),
            modified: policy.modified.clone(),
        }
    }

    /// Builds state for `id` from the configuration that was written to it.
    ///
    /// Used when a write succeeded but the policy could not be read back;
    /// server-assigned timestamps are unknown.
    #[must_use]
    pub fn from_config(config: &PolicyConfig, id: PolicyId) -> Self {
        Self {
            id,
            account_id: config.account_id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            enabled: config.enabled,
            alert_type: config.alert_type.clone(),
            integrations: config.integrations.clone(),
            filters: flatten(&expand(&config.filters)),
            created: None,
            modified: None,
        }
    }

    /// Returns the import identifier for this state.
    #[must_use]
    pub fn import_id(&self) -> ImportId {
        ImportId {
            account_id: self.account_id.clone(),
            policy_id: self.id.clone(),
        }
    }
}

// ============================================================================
// SECTION: Import Identifiers
// ============================================================================

/// Composite `<account_id>/<policy_id>` identifier used for imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    /// Owning account.
    pub account_id: AccountId,
    /// Remote policy identifier.
    pub policy_id: PolicyId,
}

impl ImportId {
    /// Parses `<account_id>/<policy_id>`.
    ///
    /// Returns `None` unless both halves are present and non-empty.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (account, policy) = raw.trim().split_once('/')?;
        if account.is_empty() || policy.is_empty() || policy.contains('/') {
            return None;
        }
        Some(Self {
            account_id: AccountId::new(account),
            policy_id: PolicyId::new(policy),
        })
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account_id, self.policy_id)
    }
}
