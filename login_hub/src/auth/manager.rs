//! Password authentication manager.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::{
    errors::{AuthError, AuthResult},
    models::{Account, LoginMethod, LoginRequest, NewAccount, RegisterRequest},
};
use crate::db::AccountRepository;

/// Password registration and login against the shared account store.
#[derive(Clone)]
pub struct AuthManager {
    repo: Arc<dyn AccountRepository>,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `repo` - Account repository backing all lookups and writes
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Register a new account with a password
    ///
    /// # Arguments
    ///
    /// * `request` - Registration request with username, email, password, name
    ///
    /// # Returns
    ///
    /// * `AuthResult<Account>` - Created account or error
    ///
    /// # Errors
    ///
    /// * `AuthError::UsernameTaken` - Username already exists
    /// * `AuthError::EmailTaken` - Email already exists
    /// * `AuthError::InvalidUsername` - Username format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<Account> {
        self.validate_username(&request.username)?;
        self.validate_password(&request.password)?;

        if self
            .repo
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash_password(&request.password)?;

        let account = self
            .repo
            .create(&NewAccount {
                username: request.username,
                email: request.email,
                password_hash,
                name: request.name,
                login_method: Some(LoginMethod::Password),
                ..NewAccount::default()
            })
            .await?;

        tracing::info!(account_id = account.id, username = %account.username, "account registered");

        Ok(account)
    }

    /// Login with username and password
    ///
    /// # Arguments
    ///
    /// * `request` - Login request with username and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<Account>` - Authenticated account or error
    ///
    /// # Errors
    ///
    /// * `AuthError::AccountNotFound` - No account with that username
    /// * `AuthError::PasswordNotSet` - Account is OAuth-only
    /// * `AuthError::InvalidPassword` - Incorrect password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<Account> {
        let account = self
            .repo
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.has_password() {
            return Err(AuthError::PasswordNotSet);
        }

        self.verify_password(&request.password, &account.password_hash)?;

        tracing::info!(account_id = account.id, "password login succeeded");

        Ok(account)
    }

    /// Hash a password with Argon2id
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify a password against a stored hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidPassword)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)
    }

    /// Validate username format
    fn validate_username(&self, username: &str) -> AuthResult<()> {
        let len = username.len();
        if !(3..=30).contains(&len) {
            return Err(AuthError::InvalidUsername(
                "Username must be 3-30 characters".to_string(),
            ));
        }

        if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(AuthError::InvalidUsername(
                "Username can only contain letters, numbers, and underscores".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate password strength
    fn validate_password(&self, password: &str) -> AuthResult<()> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        Ok(())
    }
}
