//! Shared helpers for server integration tests: an in-memory account store
//! and cookie plumbing for driving the router with `oneshot`.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use http_body_util::BodyExt;
use lh_server::api::{AppState, create_router};
use lh_server::config::ServerConfig;
use login_hub::auth::{Account, AccountId, AuthError, AuthResult, LoginMethod, NewAccount};
use login_hub::db::{AccountRepository, LinkUpdate};
use login_hub::oauth::{ProviderKind, ProviderRegistry};
use std::sync::Arc;
use tower::ServiceExt;

/// In-memory account store enforcing the same uniqueness rules as Postgres.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// Seed an account directly, assigning an id if none is set.
    pub fn seed(&self, mut account: Account) -> Account {
        let mut accounts = self.accounts.lock().unwrap();
        if account.id == 0 {
            account.id = accounts.len() as AccountId + 1;
        }
        accounts.push(account.clone());
        account
    }

    /// Grant admin to an existing account.
    pub fn promote_to_admin(&self, username: &str) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.username == username) {
            account.is_admin = true;
        }
    }

    fn subject_of(account: &NewAccount, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Google => account.google_id.as_deref(),
            ProviderKind::GitHub => account.github_id.as_deref(),
            ProviderKind::LinkedIn => account.linkedin_id.as_deref(),
            ProviderKind::X => account.x_id.as_deref(),
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_provider_subject(
        &self,
        provider: ProviderKind,
        subject: &str,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.provider_subject(provider) == Some(subject))
            .cloned())
    }

    async fn create(&self, account: &NewAccount) -> AuthResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let conflict = accounts.iter().any(|a| {
            a.username == account.username
                || a.email == account.email
                || ProviderKind::ALL.iter().any(|kind| {
                    let subject = Self::subject_of(account, *kind);
                    subject.is_some() && a.provider_subject(*kind) == subject
                })
        });
        if conflict {
            return Err(AuthError::AccountConflict);
        }

        let now = Utc::now();
        let stored = Account {
            id: accounts.len() as AccountId + 1,
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            name: account.name.clone(),
            avatar_url: account.avatar_url.clone(),
            bio: account.bio.clone(),
            google_id: account.google_id.clone(),
            github_id: account.github_id.clone(),
            linkedin_id: account.linkedin_id.clone(),
            x_id: account.x_id.clone(),
            login_method: account.login_method.unwrap_or(LoginMethod::Password),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        accounts.push(stored.clone());
        Ok(stored)
    }

    async fn link_identity(&self, update: &LinkUpdate) -> AuthResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == update.account_id)
            .ok_or(AuthError::AccountNotFound)?;

        match update.provider {
            ProviderKind::Google => account.google_id = Some(update.subject.clone()),
            ProviderKind::GitHub => account.github_id = Some(update.subject.clone()),
            ProviderKind::LinkedIn => account.linkedin_id = Some(update.subject.clone()),
            ProviderKind::X => account.x_id = Some(update.subject.clone()),
        }
        account.login_method = update.provider.into();
        account.name = update.name.clone();
        if let Some(avatar) = &update.avatar_url {
            account.avatar_url = avatar.clone();
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }
}

/// An account row for seeding, with sensible defaults.
pub fn account_fixture(username: &str, email: &str) -> Account {
    let now = Utc::now();
    Account {
        id: 0,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        name: username.to_string(),
        avatar_url: String::new(),
        bio: String::new(),
        google_id: None,
        github_id: None,
        linkedin_id: None,
        x_id: None,
        login_method: LoginMethod::Password,
        is_admin: false,
        created_at: now,
        updated_at: now,
    }
}

/// Configuration with password login on and all providers off.
pub fn password_only_config() -> ServerConfig {
    let mut config = ServerConfig::disabled();
    config.password_login_enabled = true;
    config
}

/// Build the router around a repository and an explicit registry.
pub fn app_with_registry(
    repo: Arc<MemoryAccountRepository>,
    config: ServerConfig,
    registry: ProviderRegistry,
) -> Router {
    create_router(AppState::with_registry(repo, config, registry))
}

/// Build the router with no providers registered.
pub fn app(repo: Arc<MemoryAccountRepository>, config: ServerConfig) -> Router {
    app_with_registry(repo, config, ProviderRegistry::new())
}

/// A browser-like cookie jar over `oneshot` requests.
#[derive(Default)]
pub struct TestClient {
    cookie: Option<String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a request, attaching and updating the session cookie.
    pub async fn send(&mut self, app: &Router, request: Request<Body>) -> Response<Body> {
        let mut request = request;
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().unwrap();
            // Keep only the `name=value` pair.
            self.cookie = value.split(';').next().map(str::to_string);
        }

        response
    }

    pub async fn get(&mut self, app: &Router, uri: &str) -> Response<Body> {
        self.send(
            app,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn post_form(&mut self, app: &Router, uri: &str, form: &str) -> Response<Body> {
        self.send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("expected a redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
