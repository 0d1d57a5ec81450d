// crates/notification-policy-core/src/core/policy.rs
// ============================================================================
// Module: Notification Policy Model
// Description: Vendor-facing notification policy object and delivery mechanisms.
// Purpose: Define the JSON body exchanged with the alerting policies API.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`NotificationPolicy`] mirrors the request and response body of the
//! vendor alerting API. Delivery targets are grouped per mechanism kind in
//! [`Mechanisms`]; filters use the canonical [`FilterSet`] mapping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::filters::FilterSet;
use crate::core::identifiers::PolicyId;

// ============================================================================
// SECTION: Mechanisms
// ============================================================================

/// Delivery mechanism families supported by notification policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    /// Email delivery; integration ids are email addresses.
    Email,
    /// Webhook delivery; integration ids reference configured webhooks.
    Webhooks,
    /// PagerDuty delivery; integration ids reference connected services.
    Pagerduty,
}

impl MechanismKind {
    /// All mechanism kinds in wire order.
    pub const ALL: [Self; 3] = [Self::Email, Self::Webhooks, Self::Pagerduty];

    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Webhooks => "webhooks",
            Self::Pagerduty => "pagerduty",
        }
    }

    /// Returns the configuration block name for this mechanism.
    #[must_use]
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Email => "email_integration",
            Self::Webhooks => "webhooks_integration",
            Self::Pagerduty => "pagerduty_integration",
        }
    }
}

/// Reference to one delivery integration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MechanismIntegration {
    /// Integration identifier (email address, webhook id, or service id).
    pub id: String,
    /// Optional display name; the API may omit it on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Delivery integrations grouped by mechanism kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanisms {
    /// Email integrations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<MechanismIntegration>,
    /// Webhook integrations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<MechanismIntegration>,
    /// PagerDuty integrations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pagerduty: Vec<MechanismIntegration>,
}

impl Mechanisms {
    /// Returns the integrations for a mechanism kind.
    #[must_use]
    pub fn get(&self, kind: MechanismKind) -> &[MechanismIntegration] {
        match kind {
            MechanismKind::Email => &self.email,
            MechanismKind::Webhooks => &self.webhooks,
            MechanismKind::Pagerduty => &self.pagerduty,
        }
    }

    /// Returns the mutable integration list for a mechanism kind.
    pub const fn get_mut(&mut self, kind: MechanismKind) -> &mut Vec<MechanismIntegration> {
        match kind {
            MechanismKind::Email => &mut self.email,
            MechanismKind::Webhooks => &mut self.webhooks,
            MechanismKind::Pagerduty => &mut self.pagerduty,
        }
    }

    /// Returns true when no integrations are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.webhooks.is_empty() && self.pagerduty.is_empty()
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Notification policy object as exchanged with the vendor API.
///
/// # Invariants
/// - `id` is `None` on create requests and set on every API response.
/// - `created` and `modified` are server-assigned and ignored on writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    /// Policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PolicyId>,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether the policy delivers alerts.
    pub enabled: bool,
    /// Alert type the policy subscribes to.
    pub alert_type: String,
    /// Delivery integrations.
    #[serde(default)]
    pub mechanisms: Mechanisms,
    /// Optional match criteria.
    #[serde(default, skip_serializing_if = "FilterSet::is_empty")]
    pub filters: FilterSet,
    /// Opaque alert conditions, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}
