//! X (Twitter) OAuth 2.0 adapter.
//!
//! X requires PKCE with the S256 method and authenticates the token exchange
//! with HTTP Basic credentials rather than form fields. The API never returns
//! an email, so the identity always carries a synthetic `<username>@x.user`
//! address.

use async_trait::async_trait;
use serde_json::Value;

use super::{access_token_from, build_authorize_url, get_json, post_token_form, str_field};
use crate::oauth::errors::{OAuthError, OAuthResult};
use crate::oauth::identity::{ExternalIdentity, ProviderKind};
use crate::oauth::provider::{OAuthProvider, ProviderCredentials};

const SCOPES: &str = "users.read tweet.read";

/// X endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct XEndpoints {
    pub authorize: String,
    pub token: String,
    pub me: String,
}

impl Default for XEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://twitter.com/i/oauth2/authorize".to_string(),
            token: "https://api.twitter.com/2/oauth2/token".to_string(),
            me: "https://api.twitter.com/2/users/me?user.fields=profile_image_url".to_string(),
        }
    }
}

pub struct XProvider {
    credentials: ProviderCredentials,
    endpoints: XEndpoints,
    client: reqwest::Client,
}

impl XProvider {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self::with_endpoints(credentials, XEndpoints::default())
    }

    pub fn with_endpoints(credentials: ProviderCredentials, endpoints: XEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    fn identity_from_me(payload: &Value) -> OAuthResult<ExternalIdentity> {
        let data = payload
            .get("data")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing data".to_string()))?;

        let subject = str_field(data, "id")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing id".to_string()))?;
        let username = str_field(data, "username")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing username".to_string()))?;

        Ok(ExternalIdentity {
            provider: ProviderKind::X,
            subject,
            email: format!("{username}@x.user"),
            username,
            name: str_field(data, "name").unwrap_or_default(),
            avatar_url: str_field(data, "profile_image_url").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl OAuthProvider for XProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::X
    }

    fn requires_pkce(&self) -> bool {
        true
    }

    fn authorize_url(&self, state: &str, code_challenge: Option<&str>) -> String {
        let challenge = code_challenge.unwrap_or_default();
        build_authorize_url(
            &self.endpoints.authorize,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
                ("code_challenge", challenge),
                ("code_challenge_method", "S256"),
            ],
        )
    }

    async fn exchange(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> OAuthResult<ExternalIdentity> {
        let verifier = code_verifier.ok_or(OAuthError::StateMismatch)?;

        let token = post_token_form(
            &self.client,
            &self.endpoints.token,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
                ("code_verifier", verifier),
            ],
            Some((
                self.credentials.client_id.as_str(),
                self.credentials.client_secret.as_str(),
            )),
        )
        .await?;
        let access_token = access_token_from(&token)?;

        let me = get_json(&self.client, &self.endpoints.me, &access_token, None).await?;
        Self::identity_from_me(&me)
    }
}
