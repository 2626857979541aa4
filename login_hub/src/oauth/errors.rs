//! OAuth flow error types.

use thiserror::Error;

use super::identity::ProviderKind;
use crate::auth::AuthError;

/// Errors produced by the OAuth sign-in flow.
///
/// Each variant maps to a short tag via [`OAuthError::redirect_tag`] so the
/// login page can render a message without the server leaking provider
/// responses into the URL.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The provider is not enabled or not configured
    #[error("Provider {0} is disabled")]
    ProviderDisabled(ProviderKind),

    /// Callback state did not match the stored state, or no state was stored
    #[error("State token mismatch")]
    StateMismatch,

    /// Callback arrived without an authorization code
    #[error("Missing authorization code")]
    MissingCode,

    /// Token endpoint rejected the code or returned an unusable response
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// User info endpoint failed or returned an unusable response
    #[error("User info fetch failed: {0}")]
    UserInfoFailed(String),

    /// Account creation lost a uniqueness race twice in a row
    #[error("Account creation conflicted with an existing account")]
    AccountCreateConflict,

    /// Account store error during resolution
    #[error(transparent)]
    Store(#[from] AuthError),
}

impl OAuthError {
    /// Short, non-sensitive tag for the `error` query parameter on the login
    /// page redirect.
    pub fn redirect_tag(&self) -> String {
        match self {
            OAuthError::ProviderDisabled(kind) => format!("{kind}_disabled"),
            OAuthError::StateMismatch => "state".to_string(),
            OAuthError::MissingCode => "code".to_string(),
            OAuthError::TokenExchangeFailed(_) => "exchange".to_string(),
            OAuthError::UserInfoFailed(_) => "userinfo".to_string(),
            OAuthError::AccountCreateConflict => "create".to_string(),
            OAuthError::Store(_) => "create".to_string(),
        }
    }
}

/// Result type for OAuth operations
pub type OAuthResult<T> = Result<T, OAuthError>;
