// crates/notification-policy-config/src/policy.rs
// ============================================================================
// Module: Policy Definitions
// Description: Declarative notification policy files.
// Purpose: Parse a TOML policy definition into resource configuration.
// Dependencies: notification-policy-core, serde, toml
// ============================================================================

//! ## Overview
//! A policy definition mirrors the `notification_policy` resource block.
//! Filters are written the way the vendor API stores them, as a table of
//! string arrays, and are flattened into filter records on load:
//!
//! ```toml
//! name = "workers usage notification"
//! alert_type = "billing_usage_alert"
//!
//! [[email_integration]]
//! id = "test@example.com"
//!
//! [filters]
//! product = ["worker_requests"]
//! limit = ["100"]
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use notification_policy_core::AccountId;
use notification_policy_core::FilterSet;
use notification_policy_core::IntegrationBlocks;
use notification_policy_core::PolicyConfig;
use notification_policy_core::flatten;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::config::read_bounded;
use crate::config::validate_path;

// ============================================================================
// SECTION: Policy Definition
// ============================================================================

/// Policy definition as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyDefinition {
    /// Owning account; falls back to the configured default.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Policy name.
    pub name: String,
    /// Policy description.
    #[serde(default)]
    pub description: String,
    /// Whether the policy is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Alert type.
    pub alert_type: String,
    /// Delivery integrations.
    #[serde(flatten)]
    pub integrations: IntegrationBlocks,
    /// Filters keyed by attribute name.
    #[serde(default)]
    pub filters: FilterSet,
}

impl PolicyDefinition {
    /// Loads a policy definition file and resolves it into resource
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// resolved.
    pub fn load(
        path: &Path,
        default_account: Option<&AccountId>,
    ) -> Result<PolicyConfig, ConfigError> {
        validate_path(path)?;
        let content = read_bounded(path, "policy")?;
        Self::from_toml_str(&content)?.into_config(default_account)
    }

    /// Parses policy definition text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves the definition into resource configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when required attributes are blank or
    /// no account can be determined.
    pub fn into_config(
        self,
        default_account: Option<&AccountId>,
    ) -> Result<PolicyConfig, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("policy name must be non-empty".to_string()));
        }
        if self.alert_type.trim().is_empty() {
            return Err(ConfigError::Invalid("policy alert_type must be non-empty".to_string()));
        }
        let account_id = self
            .account_id
            .or_else(|| default_account.cloned())
            .filter(|account| !account.as_str().trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Invalid(
                    "policy account_id is not set and no default account is configured"
                        .to_string(),
                )
            })?;
        Ok(PolicyConfig {
            account_id,
            name: self.name,
            description: self.description,
            enabled: self.enabled,
            alert_type: self.alert_type,
            integrations: self.integrations,
            filters: flatten(&self.filters),
        })
    }
}

/// Policies are enabled unless stated otherwise.
const fn default_enabled() -> bool {
    true
}
