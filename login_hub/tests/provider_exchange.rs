//! Adapter tests against a mock provider, covering the full
//! exchange-then-userinfo sequence and each provider's wire quirks.

use login_hub::oauth::providers::{
    GitHubEndpoints, GitHubProvider, GoogleEndpoints, GoogleProvider, LinkedInEndpoints,
    LinkedInProvider, XEndpoints, XProvider,
};
use login_hub::oauth::{OAuthError, OAuthProvider, ProviderCredentials, ProviderKind};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(server: &MockServer) -> ProviderCredentials {
    ProviderCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_url: format!("{}/callback", server.uri()),
    }
}

fn google_on(server: &MockServer) -> GoogleProvider {
    GoogleProvider::with_endpoints(
        credentials(server),
        GoogleEndpoints {
            authorize: format!("{}/authorize", server.uri()),
            token: format!("{}/token", server.uri()),
            userinfo: format!("{}/userinfo", server.uri()),
        },
    )
}

fn github_on(server: &MockServer) -> GitHubProvider {
    GitHubProvider::with_endpoints(
        credentials(server),
        GitHubEndpoints {
            authorize: format!("{}/authorize", server.uri()),
            token: format!("{}/token", server.uri()),
            user: format!("{}/user", server.uri()),
            emails: format!("{}/user/emails", server.uri()),
        },
    )
}

fn linkedin_on(server: &MockServer) -> LinkedInProvider {
    LinkedInProvider::with_endpoints(
        credentials(server),
        LinkedInEndpoints {
            authorize: format!("{}/authorize", server.uri()),
            token: format!("{}/token", server.uri()),
            userinfo: format!("{}/userinfo", server.uri()),
        },
    )
}

fn x_on(server: &MockServer) -> XProvider {
    XProvider::with_endpoints(
        credentials(server),
        XEndpoints {
            authorize: format!("{}/authorize", server.uri()),
            token: format!("{}/token", server.uri()),
            me: format!("{}/2/users/me", server.uri()),
        },
    )
}

#[tokio::test]
async fn google_exchange_produces_identity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.token",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("Authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "108",
            "email": "alice@gmail.com",
            "name": "Alice",
            "picture": "https://lh3.example/p.jpg",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = google_on(&server).exchange("auth-code", None).await.unwrap();
    assert_eq!(identity.provider, ProviderKind::Google);
    assert_eq!(identity.subject, "108");
    assert_eq!(identity.email, "alice@gmail.com");
    assert_eq!(identity.username, "alice@gmail.com");
}

#[tokio::test]
async fn google_token_rejection_maps_to_exchange_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let err = google_on(&server).exchange("bad-code", None).await.unwrap_err();
    assert!(matches!(err, OAuthError::TokenExchangeFailed(_)));
    assert_eq!(err.redirect_tag(), "exchange");
}

#[tokio::test]
async fn google_userinfo_failure_maps_to_userinfo_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = google_on(&server).exchange("code", None).await.unwrap_err();
    assert!(matches!(err, OAuthError::UserInfoFailed(_)));
}

#[tokio::test]
async fn github_requests_json_tokens_and_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "gho_tok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "login": "octo",
            "name": "Octo Cat",
            "email": "octo@example.com",
            "avatar_url": "https://avatars.example/42",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = github_on(&server).exchange("code", None).await.unwrap();
    assert_eq!(identity.subject, "42");
    assert_eq!(identity.username, "octo");
    assert_eq!(identity.email, "octo@example.com");
}

#[tokio::test]
async fn github_falls_back_to_primary_address_from_emails_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "gho_tok"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "login": "octo",
            "email": null,
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "a@x.com", "primary": false},
            {"email": "b@x.com", "primary": true},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let identity = github_on(&server).exchange("code", None).await.unwrap();
    assert_eq!(identity.email, "b@x.com");
}

#[tokio::test]
async fn github_synthesizes_email_when_emails_endpoint_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "gho_tok"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 42, "login": "octo"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/emails"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let identity = github_on(&server).exchange("code", None).await.unwrap();
    assert_eq!(identity.email, "octo@github.user");
}

#[tokio::test]
async fn linkedin_exchange_uses_oidc_userinfo() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "li_tok"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("Authorization", "Bearer li_tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "AbC123",
            "name": "Pat Doe",
            "email": "pat@example.com",
            "picture": "https://media.example/p.jpg",
        })))
        .mount(&server)
        .await;

    let identity = linkedin_on(&server).exchange("code", None).await.unwrap();
    assert_eq!(identity.subject, "AbC123");
    assert_eq!(identity.username, "pat@example.com");
}

#[tokio::test]
async fn x_exchange_uses_basic_auth_and_verifier() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(basic_auth("client-id", "client-secret"))
        .and(body_string_contains("code_verifier=the-verifier"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "x_tok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/me"))
        .and(header("Authorization", "Bearer x_tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "5551212",
                "username": "birdo",
                "name": "Birdo",
                "profile_image_url": "https://pbs.example/p.png",
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = x_on(&server)
        .exchange("code", Some("the-verifier"))
        .await
        .unwrap();
    assert_eq!(identity.subject, "5551212");
    assert_eq!(identity.email, "birdo@x.user");
}

#[tokio::test]
async fn x_exchange_without_verifier_fails_before_any_request() {
    let server = MockServer::start().await;

    let err = x_on(&server).exchange("code", None).await.unwrap_err();
    assert!(matches!(err, OAuthError::StateMismatch));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_access_token_is_an_exchange_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    let err = linkedin_on(&server).exchange("code", None).await.unwrap_err();
    assert!(matches!(err, OAuthError::TokenExchangeFailed(_)));
}
