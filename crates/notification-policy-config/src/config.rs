// crates/notification-policy-config/src/config.rs
// ============================================================================
// Module: Provider Configuration
// Description: Configuration loading and validation for the policy provider.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: notification-policy-client, notification-policy-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then overlaid with `CLOUDFLARE_*` environment variables and validated.
//! When neither a path nor `NOTIFICATION_POLICY_CONFIG` is given and the
//! default file is absent, defaults are used so that environment-only setups
//! work.
//! Secrets are never rendered by `Debug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use notification_policy_client::ClientConfig;
use notification_policy_client::Credentials;
use notification_policy_client::DEFAULT_BASE_URL;
use notification_policy_client::DEFAULT_MAX_RESPONSE_BYTES;
use notification_policy_client::DEFAULT_TIMEOUT_MS;
use notification_policy_client::default_user_agent;
use notification_policy_core::AccountId;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "notification-policy.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "NOTIFICATION_POLICY_CONFIG";
/// Environment variable carrying a scoped API token.
pub const API_TOKEN_ENV_VAR: &str = "CLOUDFLARE_API_TOKEN";
/// Environment variable carrying the account email for global key auth.
pub const EMAIL_ENV_VAR: &str = "CLOUDFLARE_EMAIL";
/// Environment variable carrying the global API key.
pub const API_KEY_ENV_VAR: &str = "CLOUDFLARE_API_KEY";
/// Environment variable carrying the default account identifier.
pub const ACCOUNT_ID_ENV_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "CLOUDFLARE_API_BASE_URL";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum request timeout in milliseconds.
const MIN_TIMEOUT_MS: u64 = 1;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 300_000;
/// Minimum response size limit in bytes.
const MIN_RESPONSE_BYTES: usize = 1024;
/// Maximum response size limit in bytes.
const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Provider Config
// ============================================================================

/// Top-level provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Vendor API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Defaults applied to policy definitions.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Lifecycle audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ProviderConfig {
    /// Loads configuration from disk using the default resolution rules and
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| env::var(name).ok())
    }

    /// Loads configuration resolving environment variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_env(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, &lookup)?;
        validate_path(&resolved)?;
        let mut config = if !explicit && !resolved.exists() {
            Self::default()
        } else {
            let content = read_bounded(&resolved, "config")?;
            Self::from_toml_str(&content)?
        };
        config.apply_env_overrides(&lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without environment overlays or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies `CLOUDFLARE_*` environment overrides. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(token) = read(API_TOKEN_ENV_VAR) {
            self.api.api_token = Some(token);
        }
        if let Some(email) = read(EMAIL_ENV_VAR) {
            self.api.email = Some(email);
        }
        if let Some(key) = read(API_KEY_ENV_VAR) {
            self.api.api_key = Some(key);
        }
        if let Some(base_url) = read(BASE_URL_ENV_VAR) {
            self.api.base_url = base_url;
        }
        if let Some(account_id) = read(ACCOUNT_ID_ENV_VAR) {
            self.defaults.account_id = Some(AccountId::new(account_id));
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.defaults.validate()?;
        self.audit.validate()
    }
}

// ============================================================================
// SECTION: API Config
// ============================================================================

/// Vendor API endpoint, credentials, and limits.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Scoped API token.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Account email for global key auth.
    #[serde(default)]
    pub email: Option<String>,
    /// Global API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Optional user agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Allow cleartext HTTP base URLs.
    #[serde(default)]
    pub allow_http: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            email: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: None,
            allow_http: false,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &redact(&self.api_token))
            .field("email", &self.email)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("user_agent", &self.user_agent)
            .field("allow_http", &self.allow_http)
            .finish()
    }
}

impl ApiConfig {
    /// Validates endpoint, limits, and credential pairing.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("api.base_url is invalid: {err}")))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "api.base_url uses http without allow_http".to_string(),
                ));
            }
            scheme => {
                return Err(ConfigError::Invalid(format!(
                    "api.base_url has unsupported scheme {scheme}"
                )));
            }
        }
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(MIN_RESPONSE_BYTES..=MAX_RESPONSE_BYTES).contains(&self.max_response_bytes) {
            return Err(ConfigError::Invalid(format!(
                "api.max_response_bytes must be between {MIN_RESPONSE_BYTES} and \
                 {MAX_RESPONSE_BYTES}"
            )));
        }
        if self.email.is_some() != self.api_key.is_some() {
            return Err(ConfigError::Invalid(
                "api.email and api.api_key must be set together".to_string(),
            ));
        }
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            return Err(ConfigError::Invalid("api.user_agent must be non-empty".to_string()));
        }
        Ok(())
    }

    /// Returns the configured credentials. A scoped token takes precedence
    /// over a global key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no credentials are configured.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(token) = &self.api_token {
            return Ok(Credentials::ApiToken(token.clone()));
        }
        match (&self.email, &self.api_key) {
            (Some(email), Some(key)) => Ok(Credentials::ApiKey {
                email: email.clone(),
                key: key.clone(),
            }),
            _ => Err(ConfigError::Invalid(format!(
                "no api credentials configured: set {API_TOKEN_ENV_VAR} or {EMAIL_ENV_VAR} and \
                 {API_KEY_ENV_VAR}"
            ))),
        }
    }

    /// Builds the HTTP client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no credentials are configured.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            base_url: self.base_url.clone(),
            credentials: self.credentials()?,
            timeout_ms: self.timeout_ms,
            max_response_bytes: self.max_response_bytes,
            user_agent: self.user_agent.clone().unwrap_or_else(default_user_agent),
            allow_http: self.allow_http,
        })
    }
}

/// Returns the default API base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the default request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

// ============================================================================
// SECTION: Defaults and Audit
// ============================================================================

/// Defaults applied to policy definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Account used when a policy definition omits `account_id`.
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

impl DefaultsConfig {
    /// Validates defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(account_id) = &self.account_id
            && account_id.as_str().trim().is_empty()
        {
            return Err(ConfigError::Invalid("defaults.account_id must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Lifecycle audit logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable lifecycle audit events.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Events go to stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

/// Audit events are enabled unless turned off.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O error while reading config.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults. The flag is
/// false when the built-in default name was chosen.
fn resolve_path(
    path: Option<&Path>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads a UTF-8 file no larger than [`MAX_CONFIG_FILE_SIZE`].
pub(crate) fn read_bounded(path: &Path, label: &str) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid(format!("{label} file exceeds size limit")));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid(format!("{label} file must be utf-8")))
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
