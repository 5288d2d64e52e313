//! CSRF token checks.
//!
//! Token issuance and session policy belong to the host application; the list table only
//! needs something that can hand out a token for the full-page form and later verify the
//! token echoed back by an AJAX request. That is the [`CsrfGuard`] trait.

use crate::params::RequestParameters;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Action name the list table tokens are scoped to.
pub const NONCE_ACTION: &str = "ajax-custom-list-nonce";

/// Request field carrying the list table token.
pub const NONCE_FIELD: &str = "_ajax_custom_list_nonce";

/// Generic token field, consulted when [`NONCE_FIELD`] is absent.
pub const FALLBACK_NONCE_FIELD: &str = "_ajax_nonce";

/// Capability / CSRF check service.
pub trait CsrfGuard: Send + Sync {
    /// Returns the token to embed in a form for `action`.
    fn issue(&self, action: &str) -> String;

    /// Checks a token previously issued for `action`.
    fn verify(&self, action: &str, token: &str) -> bool;
}

/// Extracts the token from request parameters.
pub fn token_from(params: &RequestParameters) -> Option<&str> {
    params
        .get(NONCE_FIELD)
        .or_else(|| params.get(FALLBACK_NONCE_FIELD))
        .filter(|t| !t.is_empty())
}

/// Deterministic tokens derived from a shared secret.
///
/// `token = base64url(sha256(secret || 0x00 || action))`
#[derive(Clone)]
pub struct SharedSecretGuard {
    secret: String,
}

impl SharedSecretGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecretGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretGuard").finish_non_exhaustive()
    }
}

impl CsrfGuard for SharedSecretGuard {
    fn issue(&self, action: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update([0u8]);
        hasher.update(action.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    fn verify(&self, action: &str, token: &str) -> bool {
        constant_time_eq(self.issue(action).as_bytes(), token.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
