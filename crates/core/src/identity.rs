//! Third-party identity sign-in
//!
//! The hosted Google button hands back an opaque credential. No exchange
//! endpoint exists on the backend yet, so the credential is acknowledged and
//! logged (never its contents) and goes no further.

use std::fmt;
use tracing::{info, warn};

/// External identity providers offered on the sign-in pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    Google,
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
        }
    }
}

/// Credential returned by a provider's sign-in widget
#[derive(Clone, PartialEq, Eq)]
pub struct ExternalCredential {
    provider: IdentityProvider,
    credential: String,
}

impl ExternalCredential {
    pub fn new(provider: IdentityProvider, credential: impl Into<String>) -> Self {
        Self {
            provider,
            credential: credential.into(),
        }
    }

    pub const fn provider(&self) -> IdentityProvider {
        self.provider
    }

    /// Raw credential, for a future exchange endpoint
    pub fn expose(&self) -> &str {
        &self.credential
    }
}

impl fmt::Debug for ExternalCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalCredential")
            .field("provider", &self.provider)
            .field("len", &self.credential.len())
            .finish()
    }
}

/// What happened to a provider credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// Received and logged; no session was created
    NotForwarded,
    /// The widget returned nothing usable
    Empty,
}

/// Success callback of the provider widget
pub fn accept_external_credential(credential: &ExternalCredential) -> CredentialOutcome {
    if credential.expose().trim().is_empty() {
        warn!(provider = %credential.provider, "Sign-in widget returned an empty credential");
        return CredentialOutcome::Empty;
    }

    info!(
        provider = %credential.provider,
        credential_len = credential.expose().len(),
        "Received external sign-in credential; no exchange endpoint is configured"
    );
    CredentialOutcome::NotForwarded
}

/// Failure callback of the provider widget
pub fn external_sign_in_failed(provider: IdentityProvider) {
    warn!(%provider, "External sign-in failed");
}
