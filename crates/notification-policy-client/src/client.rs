// crates/notification-policy-client/src/client.rs
// ============================================================================
// Module: HTTP Notification Policy Client
// Description: Blocking client for the vendor alerting policies API.
// Purpose: Implement the core API seam over HTTPS with strict response limits.
// Dependencies: notification-policy-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpNotificationPolicyClient`] issues account-scoped requests against
//! `{base_url}/accounts/{account_id}/alerting/v3/policies`. Responses are read
//! with a hard size cap, decoded from the vendor response envelope, and mapped
//! onto [`ApiError`]. Redirects are not followed and no request is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use notification_policy_core::AccountId;
use notification_policy_core::ApiError;
use notification_policy_core::NotificationPolicy;
use notification_policy_core::NotificationPolicyApi;
use notification_policy_core::PolicyId;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::auth::Credentials;
use crate::envelope::ApiEnvelope;
use crate::envelope::describe_messages;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default vendor API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default maximum response body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Configuration for the HTTP client.
///
/// # Invariants
/// - `allow_http = false` rejects cleartext `http://` base URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without a trailing `/accounts` segment.
    pub base_url: String,
    /// Credentials attached to every request.
    pub credentials: Credentials,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Allow cleartext HTTP base URLs.
    pub allow_http: bool,
}

impl ClientConfig {
    /// Creates a configuration with default limits for `credentials`.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: default_user_agent(),
            allow_http: false,
        }
    }
}

/// Returns the default user agent.
#[must_use]
pub fn default_user_agent() -> String {
    format!("notification-policy/{}", env!("CARGO_PKG_VERSION"))
}

/// Errors raised while constructing the client.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Base URL is malformed or uses a disallowed scheme.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Credentials cannot be encoded as headers.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    /// The underlying HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// `result` payload of write responses.
#[derive(Debug, Deserialize)]
struct IdResult {
    /// Identifier of the written policy.
    id: PolicyId,
}

/// Blocking HTTP implementation of [`NotificationPolicyApi`].
///
/// # Invariants
/// - `base_url` has a hierarchical path that accepts appended segments.
pub struct HttpNotificationPolicyClient {
    /// HTTP client with default headers and limits applied.
    client: Client,
    /// Parsed API base URL.
    base_url: Url,
    /// Maximum response size allowed, in bytes.
    max_response_bytes: usize,
}

impl HttpNotificationPolicyClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL or credentials are invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url, config.allow_http)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        config.credentials.apply(&mut headers)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the parsed base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the policies collection or item URL for an account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Invalid`] when the base URL cannot take path segments.
    pub fn policies_url(
        &self,
        account_id: &AccountId,
        policy_id: Option<&PolicyId>,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::Invalid("base url cannot hold a path".to_string()))?;
            segments.pop_if_empty().extend([
                "accounts",
                account_id.as_str(),
                "alerting",
                "v3",
                "policies",
            ]);
            if let Some(policy_id) = policy_id {
                segments.push(policy_id.as_str());
            }
        }
        Ok(url)
    }

    /// Sends a request and decodes the envelope `result`, which may be absent.
    fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&NotificationPolicy>,
    ) -> Result<Option<T>, ApiError> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ApiError::Invalid(format!("policy serialization failed: {err}")))?;
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }
        let mut response = request.send().map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        let body = read_response_limited(&mut response, self.max_response_bytes)?;
        decode_response(status, &body)
    }
}

impl NotificationPolicyApi for HttpNotificationPolicyClient {
    fn create_policy(
        &self,
        account_id: &AccountId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        let url = self.policies_url(account_id, None)?;
        let result: Option<IdResult> = self.execute(Method::POST, url, Some(policy))?;
        Ok(required(result)?.id)
    }

    fn get_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
    ) -> Result<NotificationPolicy, ApiError> {
        let url = self.policies_url(account_id, Some(policy_id))?;
        required(self.execute(Method::GET, url, None)?)
    }

    fn update_policy(
        &self,
        account_id: &AccountId,
        policy_id: &PolicyId,
        policy: &NotificationPolicy,
    ) -> Result<PolicyId, ApiError> {
        let url = self.policies_url(account_id, Some(policy_id))?;
        let result: Option<IdResult> = self.execute(Method::PUT, url, Some(policy))?;
        Ok(required(result)?.id)
    }

    fn delete_policy(&self, account_id: &AccountId, policy_id: &PolicyId) -> Result<(), ApiError> {
        let url = self.policies_url(account_id, Some(policy_id))?;
        let _: Option<Value> = self.execute(Method::DELETE, url, None)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the configured base URL.
fn parse_base_url(raw: &str, allow_http: bool) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        scheme => {
            return Err(ClientError::InvalidBaseUrl(format!("unsupported scheme {scheme}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ClientError::InvalidBaseUrl("url credentials are not allowed".to_string()));
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl("url cannot hold a path".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::InvalidBaseUrl("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

/// Requires an envelope `result` to be present.
fn required<T>(result: Option<T>) -> Result<T, ApiError> {
    result.ok_or_else(|| ApiError::Decode("response is missing result".to_string()))
}

/// Maps a status code and body onto the envelope result or an [`ApiError`].
fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiEnvelope<Value>>(body)
            .ok()
            .map(|envelope| describe_messages(&envelope.errors))
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    let envelope: ApiEnvelope<T> =
        serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Rejected(describe_messages(&envelope.errors)));
    }
    Ok(envelope.result)
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ApiError::Invalid("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(ApiError::Transport("api response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|err| ApiError::Transport(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ApiError::Transport("api response exceeds size limit".to_string()));
    }
    Ok(buf)
}
