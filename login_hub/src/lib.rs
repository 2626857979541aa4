//! # Login Hub
//!
//! Account management and multi-provider sign-in for web applications.
//!
//! This library unifies two authentication paths into a single account concept:
//! local username/password credentials and external identity providers (Google,
//! GitHub, LinkedIn, X). Every path ends in the same [`auth::Account`] row,
//! regardless of how the user arrived.
//!
//! ## Core Modules
//!
//! - [`auth`]: account model, password registration and login
//! - [`oauth`]: provider adapters, CSRF state/PKCE service, and the identity
//!   resolver that matches an external identity to an account
//! - [`db`]: PostgreSQL pool management and the account repository trait
//!
//! ## Example
//!
//! ```no_run
//! use login_hub::auth::{AuthManager, RegisterRequest};
//! use login_hub::db::{Database, DatabaseConfig, PgAccountRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     let repo = Arc::new(PgAccountRepository::new(db.pool().clone()));
//!     let auth = AuthManager::new(repo);
//!
//!     let request = RegisterRequest {
//!         username: "alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!         password: "SecurePass123".to_string(),
//!         name: "Alice".to_string(),
//!     };
//!
//!     let account = auth.register(request).await?;
//!     println!("Registered account: {}", account.username);
//!     Ok(())
//! }
//! ```

/// Account model, password authentication, and shared error types.
pub mod auth;
pub use auth::{Account, AccountId, AuthError, AuthManager, AuthResult};

/// PostgreSQL pool management and the account repository.
pub mod db;
pub use db::{AccountRepository, Database, DatabaseConfig, PgAccountRepository};

/// OAuth provider adapters, state/PKCE handling, and identity resolution.
pub mod oauth;
pub use oauth::{
    ExternalIdentity, IdentityResolver, OAuthError, OAuthProvider, ProviderKind,
    ProviderRegistry,
};
