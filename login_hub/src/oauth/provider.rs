//! The provider adapter trait and shared credential config.

use async_trait::async_trait;

use super::errors::OAuthResult;
use super::identity::{ExternalIdentity, ProviderKind};

/// Client credentials and the callback URL registered with a provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Absolute callback URL, e.g. `https://app.example.com/oauth/google/callback`.
    pub redirect_url: String,
}

/// One external identity provider.
///
/// Adapters are stateless beyond their credentials and HTTP client; each
/// implements the provider-specific halves of the authorization-code flow and
/// normalizes the result into an [`ExternalIdentity`].
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Which provider this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Whether the flow must carry a PKCE challenge.
    fn requires_pkce(&self) -> bool {
        false
    }

    /// Build the authorization URL the browser is redirected to.
    ///
    /// `code_challenge` is `Some` exactly when [`requires_pkce`] is true.
    ///
    /// [`requires_pkce`]: OAuthProvider::requires_pkce
    fn authorize_url(&self, state: &str, code_challenge: Option<&str>) -> String;

    /// Exchange the callback code for tokens and fetch the user's identity.
    ///
    /// `code_verifier` is `Some` exactly when [`requires_pkce`] is true.
    ///
    /// [`requires_pkce`]: OAuthProvider::requires_pkce
    async fn exchange(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> OAuthResult<ExternalIdentity>;
}
