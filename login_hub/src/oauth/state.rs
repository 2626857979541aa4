//! CSRF state tokens and PKCE pairs for the authorization-code flow.
//!
//! State tokens are 32 random bytes, base64url encoded without padding, for
//! 256 bits of entropy. PKCE follows RFC 7636 with the S256 method only.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::errors::{OAuthError, OAuthResult};

/// A PKCE verifier and its S256 challenge.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub code_verifier: String,
    pub code_challenge: String,
}

/// Tokens minted when a sign-in flow begins.
///
/// The state goes into both the session and the authorization URL; the PKCE
/// verifier (when present) goes into the session only, and the challenge into
/// the URL.
#[derive(Debug, Clone)]
pub struct FlowTokens {
    pub state: String,
    pub pkce: Option<PkcePair>,
}

/// What the session remembered about a flow, read back at callback time.
#[derive(Debug, Clone, Default)]
pub struct PendingFlow {
    pub state: Option<String>,
    pub code_verifier: Option<String>,
}

/// Mint the tokens for a new authorization flow.
pub fn begin_flow(requires_pkce: bool) -> FlowTokens {
    FlowTokens {
        state: generate_state(),
        pkce: requires_pkce.then(generate_pkce_pair),
    }
}

/// Check the callback `state` against the stored flow.
///
/// The stored state is single-use: callers must clear the session keys whether
/// this succeeds or fails. A missing stored state fails the same way as a
/// mismatched one.
pub fn validate_state(pending: &PendingFlow, callback_state: &str) -> OAuthResult<()> {
    let stored = pending.state.as_deref().ok_or(OAuthError::StateMismatch)?;

    if stored.is_empty() || callback_state.is_empty() {
        return Err(OAuthError::StateMismatch);
    }

    // Constant-time comparison; the token is an authenticator.
    if stored.as_bytes().ct_eq(callback_state.as_bytes()).into() {
        Ok(())
    } else {
        Err(OAuthError::StateMismatch)
    }
}

/// Generate a 256-bit random state token.
fn generate_state() -> String {
    let mut random = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random);
    URL_SAFE_NO_PAD.encode(random)
}

/// Generate a fresh PKCE verifier/challenge pair.
fn generate_pkce_pair() -> PkcePair {
    let mut random = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut random);

    let code_verifier = URL_SAFE_NO_PAD.encode(random);
    let code_challenge = code_challenge_s256(&code_verifier);

    PkcePair {
        code_verifier,
        code_challenge,
    }
}

/// S256 challenge for a verifier: base64url(sha256(verifier)), no padding.
pub fn code_challenge_s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
