// crates/notification-policy-client/src/auth.rs
// ============================================================================
// Module: API Credentials
// Description: Credential variants accepted by the vendor API.
// Purpose: Build authentication headers without leaking secrets in logs.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! The vendor API accepts either a scoped API token (bearer auth) or the
//! legacy global key paired with the account email. Header values are marked
//! sensitive and `Debug` output is redacted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use crate::client::ClientError;

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Header carrying the account email for global key auth.
const AUTH_EMAIL_HEADER: &str = "x-auth-email";
/// Header carrying the global API key.
const AUTH_KEY_HEADER: &str = "x-auth-key";

/// Vendor API credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Scoped API token sent as a bearer token.
    ApiToken(String),
    /// Global API key paired with the account email.
    ApiKey {
        /// Account email address.
        email: String,
        /// Global API key.
        key: String,
    },
}

impl Credentials {
    /// Returns a stable label for the credential kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiToken(_) => "api_token",
            Self::ApiKey {
                ..
            } => "api_key",
        }
    }

    /// Writes the authentication headers into `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidCredentials`] when a credential is not a
    /// valid header value.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), ClientError> {
        match self {
            Self::ApiToken(token) => {
                headers.insert(AUTHORIZATION, sensitive_value(&format!("Bearer {token}"))?);
            }
            Self::ApiKey {
                email,
                key,
            } => {
                headers.insert(HeaderName::from_static(AUTH_EMAIL_HEADER), sensitive_value(email)?);
                headers.insert(HeaderName::from_static(AUTH_KEY_HEADER), sensitive_value(key)?);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiToken(_) => f.debug_tuple("ApiToken").field(&"<redacted>").finish(),
            Self::ApiKey {
                email, ..
            } => f
                .debug_struct("ApiKey")
                .field("email", email)
                .field("key", &"<redacted>")
                .finish(),
        }
    }
}

/// Builds a header value flagged as sensitive.
fn sensitive_value(raw: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(raw).map_err(|_| {
        ClientError::InvalidCredentials("credential contains invalid header characters".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}
