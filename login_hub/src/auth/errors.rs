//! Authentication error types.

use thiserror::Error;

/// Account and password authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint (username, email, or provider id) was violated
    #[error("Account conflicts with an existing account")]
    AccountConflict,

    /// Account not found
    #[error("Account not found")]
    AccountNotFound,

    /// Password verification failed
    #[error("Invalid password")]
    InvalidPassword,

    /// Password login attempted on an account without a password
    #[error("Account has no password set")]
    PasswordNotSet,

    /// Username already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// Email already exists
    #[error("Email already exists")]
    EmailTaken,

    /// Invalid username format
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password too weak
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database errors are sanitized to prevent disclosure of schema or query
    /// details; everything else is safe to show as-is.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
