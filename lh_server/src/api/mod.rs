//! HTTP API for the login server.
//!
//! The API is built with:
//! - **Axum**: routing and handlers
//! - **tower-sessions**: signed-in state and the pending OAuth flow, in a
//!   cookie-keyed server-side session
//! - **Tower**: CORS middleware
//!
//! # Modules
//!
//! - [`auth`]: password login, registration, logout, pages, health
//! - [`oauth`]: per-provider begin/callback handlers
//! - [`middleware`]: session-based auth/admin guards
//! - [`session`]: typed accessors over the cookie session
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                    - Liveness probe (public)
//! GET  /                          - Landing page (public)
//! GET  /login                     - Login page (public)
//! POST /login                     - Password login (public)
//! GET  /register                  - Registration page (public)
//! POST /register                  - Register account (public)
//! GET  /logout                    - Destroy session (public)
//! GET  /auth/{provider}           - Begin OAuth flow (public)
//! GET  /auth/{provider}/callback  - Finish OAuth flow (public)
//! GET  /profile                   - Account profile (auth required)
//! GET  /{admin_path}              - Admin page (admin required)
//! ```
//!
//! Disabled logins keep their routes; the handlers answer with an error
//! redirect at request time, so flipping a provider on never changes the
//! routing table.

pub mod auth;
pub mod middleware;
pub mod oauth;
pub mod session;

use std::sync::Arc;

use axum::{Router, routing::get};
use login_hub::auth::AuthManager;
use login_hub::db::AccountRepository;
use login_hub::oauth::{IdentityResolver, ProviderRegistry};
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerConfig;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; all fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn AccountRepository>,
    pub auth_manager: Arc<AuthManager>,
    pub resolver: Arc<IdentityResolver>,
    pub registry: Arc<ProviderRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire up the managers around a repository and configuration.
    pub fn new(repo: Arc<dyn AccountRepository>, config: ServerConfig) -> Self {
        let registry = config.build_registry();
        Self::with_registry(repo, config, registry)
    }

    /// Like [`AppState::new`], but with an explicit registry. Used by tests to
    /// point adapters at mock provider endpoints.
    pub fn with_registry(
        repo: Arc<dyn AccountRepository>,
        config: ServerConfig,
        registry: ProviderRegistry,
    ) -> Self {
        Self {
            auth_manager: Arc::new(AuthManager::new(repo.clone())),
            resolver: Arc::new(IdentityResolver::new(repo.clone())),
            registry: Arc::new(registry),
            config: Arc::new(config),
            repo,
        }
    }
}

/// Create the complete router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)));

    let protected_routes = Router::new()
        .route("/profile", get(auth::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let admin_routes = Router::new()
        .route(
            &format!("/{}", state.config.admin_base_path),
            get(auth::admin_home),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .route("/health", get(auth::health))
        .route("/", get(auth::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/auth/{provider}", get(oauth::begin))
        .route("/auth/{provider}/callback", get(oauth::callback))
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
