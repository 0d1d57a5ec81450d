// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for acceptance suites.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: notification-policy-client, notification-policy-config
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or empty values fail closed. Credentials
//! reuse the provider's `CLOUDFLARE_*` overrides so that acceptance runs see
//! exactly what the CLI would.

// ============================================================================
// SECTION: Imports
// ============================================================================

use notification_policy_client::ClientConfig;
use notification_policy_config::API_KEY_ENV_VAR;
use notification_policy_config::API_TOKEN_ENV_VAR;
use notification_policy_config::BASE_URL_ENV_VAR;
use notification_policy_config::EMAIL_ENV_VAR;
use notification_policy_config::ProviderConfig;
use notification_policy_core::AccountId;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Default destination for email integrations created by acceptance runs.
const DEFAULT_ALERT_EMAIL: &str = "test@example.com";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Enables live acceptance suites (`true`/`false` or `1`/`0`).
    Acceptance,
    /// Account that owns policies created by acceptance runs.
    AccountId,
    /// Scoped API token.
    ApiToken,
    /// Account email for global key auth.
    Email,
    /// Global API key.
    ApiKey,
    /// Optional API base URL override.
    BaseUrl,
    /// Optional email integration target override.
    AlertEmail,
}

impl SystemTestEnv {
    /// Every key, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Acceptance,
        Self::AccountId,
        Self::ApiToken,
        Self::Email,
        Self::ApiKey,
        Self::BaseUrl,
        Self::AlertEmail,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acceptance => "NOTIFICATION_POLICY_ACCEPTANCE",
            Self::AccountId => "CLOUDFLARE_ACCOUNT_ID",
            Self::ApiToken => API_TOKEN_ENV_VAR,
            Self::Email => EMAIL_ENV_VAR,
            Self::ApiKey => API_KEY_ENV_VAR,
            Self::BaseUrl => BASE_URL_ENV_VAR,
            Self::AlertEmail => "NOTIFICATION_POLICY_TEST_EMAIL",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Whether live acceptance suites are enabled.
    pub acceptance: bool,
    /// Account that owns created policies.
    pub account_id: Option<String>,
    /// Email integration target.
    pub alert_email: Option<String>,
    /// Provider settings after `CLOUDFLARE_*` overrides.
    pub provider: ProviderConfig,
}

/// Resolved settings for a live acceptance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceTarget {
    /// Account that owns created policies.
    pub account_id: AccountId,
    /// HTTP client configuration with credentials.
    pub client: ClientConfig,
    /// Email integration target.
    pub alert_email: String,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid boolean value).
    pub fn load() -> Result<Self, String> {
        let acceptance = parse_bool_env(
            SystemTestEnv::Acceptance.as_str(),
            read_env_nonempty(SystemTestEnv::Acceptance.as_str())?,
        )?;
        let account_id = read_env_nonempty(SystemTestEnv::AccountId.as_str())?;
        let alert_email = read_env_nonempty(SystemTestEnv::AlertEmail.as_str())?;
        for key in [
            SystemTestEnv::ApiToken,
            SystemTestEnv::Email,
            SystemTestEnv::ApiKey,
            SystemTestEnv::BaseUrl,
        ] {
            read_env_nonempty(key.as_str())?;
        }
        let mut provider = ProviderConfig::default();
        provider.apply_env_overrides(|name| read_env_strict(name).ok().flatten());
        provider.validate().map_err(|err| err.to_string())?;
        Ok(Self {
            acceptance,
            account_id,
            alert_email,
            provider,
        })
    }

    /// Resolves the acceptance target.
    ///
    /// Returns `Ok(None)` when acceptance suites are disabled, so callers can
    /// skip without failing.
    ///
    /// # Errors
    ///
    /// Returns an error when acceptance is enabled but the account or
    /// credentials are missing.
    pub fn acceptance_target(&self) -> Result<Option<AcceptanceTarget>, String> {
        if !self.acceptance {
            return Ok(None);
        }
        let account_id = self.account_id.clone().ok_or_else(|| {
            format!("{} must be set for acceptance runs", SystemTestEnv::AccountId.as_str())
        })?;
        let client = self.provider.api.client_config().map_err(|err| err.to_string())?;
        Ok(Some(AcceptanceTarget {
            account_id: AccountId::new(account_id),
            client,
            alert_email: self
                .alert_email
                .clone()
                .unwrap_or_else(|| DEFAULT_ALERT_EMAIL.to_string()),
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a boolean environment variable; unset means false.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}
