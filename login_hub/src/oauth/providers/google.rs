//! Google OAuth 2.0 adapter.

use async_trait::async_trait;
use serde_json::Value;

use super::{access_token_from, build_authorize_url, get_json, post_token_form, str_field};
use crate::oauth::errors::{OAuthError, OAuthResult};
use crate::oauth::identity::{ExternalIdentity, ProviderKind};
use crate::oauth::provider::{OAuthProvider, ProviderCredentials};

const SCOPES: &str = "https://www.googleapis.com/auth/userinfo.email \
                      https://www.googleapis.com/auth/userinfo.profile";

/// Google endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }
}

/// Sign-in with Google. Userinfo always carries an email, which doubles as the
/// suggested username.
pub struct GoogleProvider {
    credentials: ProviderCredentials,
    endpoints: GoogleEndpoints,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self::with_endpoints(credentials, GoogleEndpoints::default())
    }

    pub fn with_endpoints(credentials: ProviderCredentials, endpoints: GoogleEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    fn identity_from_userinfo(userinfo: &Value) -> OAuthResult<ExternalIdentity> {
        let subject = str_field(userinfo, "id")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing id".to_string()))?;
        let email = str_field(userinfo, "email")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing email".to_string()))?;

        Ok(ExternalIdentity {
            provider: ProviderKind::Google,
            subject,
            username: email.clone(),
            email,
            name: str_field(userinfo, "name").unwrap_or_default(),
            avatar_url: str_field(userinfo, "picture").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn authorize_url(&self, state: &str, _code_challenge: Option<&str>) -> String {
        build_authorize_url(
            &self.endpoints.authorize,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
    }

    async fn exchange(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> OAuthResult<ExternalIdentity> {
        let token = post_token_form(
            &self.client,
            &self.endpoints.token,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("redirect_uri", self.credentials.redirect_url.as_str()),
            ],
            None,
        )
        .await?;
        let access_token = access_token_from(&token)?;

        let userinfo = get_json(&self.client, &self.endpoints.userinfo, &access_token, None).await?;
        Self::identity_from_userinfo(&userinfo)
    }
}
