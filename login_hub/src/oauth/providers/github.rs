//! GitHub OAuth adapter.
//!
//! GitHub's quirks: the token endpoint answers with a form body unless asked
//! for JSON, `api.github.com` rejects requests without a `User-Agent`, and the
//! user payload may omit the email, in which case `/user/emails` is consulted
//! before falling back to a synthetic `<login>@github.user` address.

use async_trait::async_trait;
use serde_json::Value;

use super::{access_token_from, build_authorize_url, get_json, post_token_form, str_field};
use crate::oauth::errors::{OAuthError, OAuthResult};
use crate::oauth::identity::{ExternalIdentity, ProviderKind};
use crate::oauth::provider::{OAuthProvider, ProviderCredentials};

const SCOPES: &str = "user:email read:user";
const USER_AGENT: &str = concat!("login-hub/", env!("CARGO_PKG_VERSION"));

/// GitHub endpoint set, overridable for tests.
#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    pub authorize: String,
    pub token: String,
    pub user: String,
    pub emails: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://github.com/login/oauth/authorize".to_string(),
            token: "https://github.com/login/oauth/access_token".to_string(),
            user: "https://api.github.com/user".to_string(),
            emails: "https://api.github.com/user/emails".to_string(),
        }
    }
}

pub struct GitHubProvider {
    credentials: ProviderCredentials,
    endpoints: GitHubEndpoints,
    client: reqwest::Client,
}

impl GitHubProvider {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self::with_endpoints(credentials, GitHubEndpoints::default())
    }

    pub fn with_endpoints(credentials: ProviderCredentials, endpoints: GitHubEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    /// Email from the user payload, then `/user/emails` (primary first, then
    /// any), then the synthetic fallback. A failed emails request is not fatal.
    fn resolve_email(login: &str, user: &Value, emails: Option<&Value>) -> String {
        if let Some(email) = str_field(user, "email") {
            return email;
        }

        if let Some(list) = emails.and_then(Value::as_array) {
            let primary = list
                .iter()
                .find(|e| e.get("primary").and_then(Value::as_bool) == Some(true))
                .and_then(|e| str_field(e, "email"));
            if let Some(email) = primary {
                return email;
            }
            if let Some(email) = list.first().and_then(|e| str_field(e, "email")) {
                return email;
            }
        }

        format!("{login}@github.user")
    }

    fn identity_from_payloads(user: &Value, emails: Option<&Value>) -> OAuthResult<ExternalIdentity> {
        // GitHub's id is numeric; stored as its decimal string.
        let subject = user
            .get("id")
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
            .ok_or_else(|| OAuthError::UserInfoFailed("missing id".to_string()))?;
        let login = str_field(user, "login")
            .ok_or_else(|| OAuthError::UserInfoFailed("missing login".to_string()))?;

        let email = Self::resolve_email(&login, user, emails);
        let name = str_field(user, "name").unwrap_or_else(|| login.clone());

        Ok(ExternalIdentity {
            provider: ProviderKind::GitHub,
            subject,
            email,
            username: login,
            name,
            avatar_url: str_field(user, "avatar_url").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl OAuthProvider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
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

        let user = get_json(
            &self.client,
            &self.endpoints.user,
            &access_token,
            Some(USER_AGENT),
        )
        .await?;

        let emails = if str_field(&user, "email").is_none() {
            get_json(
                &self.client,
                &self.endpoints.emails,
                &access_token,
                Some(USER_AGENT),
            )
            .await
            .ok()
        } else {
            None
        };

        Self::identity_from_payloads(&user, emails.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_email_wins_over_emails_endpoint() {
        let user = json!({"id": 42, "login": "octo", "email": "octo@example.com"});
        let emails = json!([{"email": "other@example.com", "primary": true}]);
        let identity = GitHubProvider::identity_from_payloads(&user, Some(&emails)).unwrap();
        assert_eq!(identity.email, "octo@example.com");
        assert_eq!(identity.subject, "42");
        assert_eq!(identity.username, "octo");
    }

    #[test]
    fn primary_email_is_preferred_from_emails_list() {
        let user = json!({"id": 42, "login": "octo"});
        let emails = json!([
            {"email": "second@example.com", "primary": false},
            {"email": "main@example.com", "primary": true},
        ]);
        let identity = GitHubProvider::identity_from_payloads(&user, Some(&emails)).unwrap();
        assert_eq!(identity.email, "main@example.com");
    }

    #[test]
    fn first_email_is_used_when_no_primary() {
        let user = json!({"id": 42, "login": "octo"});
        let emails = json!([
            {"email": "a@example.com", "primary": false},
            {"email": "b@example.com", "primary": false},
        ]);
        let identity = GitHubProvider::identity_from_payloads(&user, Some(&emails)).unwrap();
        assert_eq!(identity.email, "a@example.com");
    }

    #[test]
    fn synthetic_email_when_nothing_else_is_available() {
        let user = json!({"id": 42, "login": "octo"});
        let identity = GitHubProvider::identity_from_payloads(&user, None).unwrap();
        assert_eq!(identity.email, "octo@github.user");
    }

    #[test]
    fn name_falls_back_to_login() {
        let user = json!({"id": 42, "login": "octo", "email": "o@e.com"});
        let identity = GitHubProvider::identity_from_payloads(&user, None).unwrap();
        assert_eq!(identity.name, "octo");
    }

    #[test]
    fn missing_numeric_id_is_rejected() {
        let user = json!({"login": "octo"});
        let err = GitHubProvider::identity_from_payloads(&user, None).unwrap_err();
        assert!(matches!(err, OAuthError::UserInfoFailed(_)));
    }
}
