//! Provider adapters.
//!
//! Each adapter owns its credentials, its endpoint set, and a shared HTTP
//! client. Endpoints are overridable through `with_endpoints` constructors so
//! tests can point an adapter at a local mock server.

pub mod github;
pub mod google;
pub mod linkedin;
pub mod x;

pub use github::{GitHubEndpoints, GitHubProvider};
pub use google::{GoogleEndpoints, GoogleProvider};
pub use linkedin::{LinkedInEndpoints, LinkedInProvider};
pub use x::{XEndpoints, XProvider};

use std::time::Duration;

use serde_json::Value;

use super::errors::{OAuthError, OAuthResult};

/// Per-request timeout for provider HTTP calls.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build an authorization URL from a base endpoint and query pairs.
pub(crate) fn build_authorize_url(base: &str, params: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    format!("{}?{}", base, serializer.finish())
}

/// POST a form to a token endpoint and parse the JSON response.
///
/// `basic_auth` switches client authentication from form fields to an HTTP
/// Basic header. On a non-2xx status the response body is truncated into the
/// error so logs stay bounded.
pub(crate) async fn post_token_form(
    client: &reqwest::Client,
    token_url: &str,
    form: &[(&str, &str)],
    basic_auth: Option<(&str, &str)>,
) -> OAuthResult<Value> {
    let mut request = client
        .post(token_url)
        .timeout(HTTP_TIMEOUT)
        .header("Accept", "application/json")
        .form(form);
    if let Some((user, password)) = basic_auth {
        request = request.basic_auth(user, Some(password));
    }

    let response = request
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(format!("request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed(format!("response read failed: {e}")))?;

    if !status.is_success() {
        return Err(OAuthError::TokenExchangeFailed(format!(
            "status={} body={}",
            status.as_u16(),
            truncate(&body, 200),
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| OAuthError::TokenExchangeFailed(format!("invalid json: {e}")))
}

/// Pull a non-empty `access_token` out of a token response.
pub(crate) fn access_token_from(value: &Value) -> OAuthResult<String> {
    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| OAuthError::TokenExchangeFailed("missing access_token".to_string()))
}

/// GET a JSON resource with a bearer token.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
    user_agent: Option<&str>,
) -> OAuthResult<Value> {
    let mut request = client
        .get(url)
        .timeout(HTTP_TIMEOUT)
        .bearer_auth(access_token);
    if let Some(agent) = user_agent {
        request = request.header("User-Agent", agent);
    }

    let response = request
        .send()
        .await
        .map_err(|e| OAuthError::UserInfoFailed(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(OAuthError::UserInfoFailed(format!(
            "status={}",
            status.as_u16()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| OAuthError::UserInfoFailed(format!("invalid json: {e}")))
}

/// Non-empty trimmed string field, if present.
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
