//! LinkedIn OAuth adapter, using the OIDC userinfo endpoint.

use async_trait::async_trait;
use serde_json::Value;

use super::{access_token_from, build_authorize_url, get_json, post_token_form, str_field};
use crate::oauth::errors::{OAuthError, OAuthResult};
use crate::oauth::identity::{ExternalIdentity, ProviderKind};
use crate::oauth::provider::{OAuthProvider, ProviderCredentials};

const SCOPES: &str = "openid profile email";

/// LinkedIn endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct LinkedInEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for LinkedInEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://www.linkedin.com/oauth/v2/authorization".to_string(),
            token: "https://www.linkedin.com/oauth/v2/accessToken".to_string(),
            userinfo: "https://api.linkedin.com/v2/userinfo".to_string(),
        }
    }
}

/// Sign-in with LinkedIn. Some grants omit the email claim; the identity then
/// falls back to `<sub>@linkedin.user` and a `linkedin_<sub>` username.
pub struct LinkedInProvider {
    credentials: ProviderCredentials,
    endpoints: LinkedInEndpoints,
    client: reqwest::Client,
}

impl LinkedInProvider {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self::with_endpoints(credentials, LinkedInEndpoints::default())
    }

    pub fn with_endpoints(credentials: ProviderCredentials, endpoints: LinkedInEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    fn identity_from_userinfo(userinfo: &Value) -> OAuthResult<ExternalIdentity> {
        let subject = str_field(userinfo, "sub")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing sub".to_string()))?;

        let (email, username) = match str_field(userinfo, "email") {
            Some(email) => (email.clone(), email),
            None => (
                format!("{subject}@linkedin.user"),
                format!("linkedin_{subject}"),
            ),
        };

        Ok(ExternalIdentity {
            provider: ProviderKind::LinkedIn,
            subject,
            email,
            username,
            name: str_field(userinfo, "name").unwrap_or_default(),
            avatar_url: str_field(userinfo, "picture").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl OAuthProvider for LinkedInProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LinkedIn
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
