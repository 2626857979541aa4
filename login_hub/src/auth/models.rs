//! Account data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oauth::ProviderKind;

/// Account ID type
pub type AccountId = i64;

/// How an account was created or most recently linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Password,
    Google,
    GitHub,
    LinkedIn,
    X,
}

impl LoginMethod {
    /// Storage representation, matching the `login_method` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMethod::Password => "password",
            LoginMethod::Google => "google",
            LoginMethod::GitHub => "github",
            LoginMethod::LinkedIn => "linkedin",
            LoginMethod::X => "x",
        }
    }

    /// Parse the storage representation; unknown values fall back to `Password`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "google" => LoginMethod::Google,
            "github" => LoginMethod::GitHub,
            "linkedin" => LoginMethod::LinkedIn,
            "x" => LoginMethod::X,
            _ => LoginMethod::Password,
        }
    }
}

impl From<ProviderKind> for LoginMethod {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Google => LoginMethod::Google,
            ProviderKind::GitHub => LoginMethod::GitHub,
            ProviderKind::LinkedIn => LoginMethod::LinkedIn,
            ProviderKind::X => LoginMethod::X,
        }
    }
}

/// Durable account record.
///
/// Username and email are globally unique. Each provider id column is nullable
/// and unique, so at most one account may hold a given (provider, subject) pair.
/// An account with an empty password hash is OAuth-only and carries at least one
/// provider id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub avatar_url: String,
    pub bio: String,
    pub google_id: Option<String>,
    pub github_id: Option<String>,
    pub linkedin_id: Option<String>,
    pub x_id: Option<String>,
    pub login_method: LoginMethod,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The stored subject id for the given provider, if linked.
    pub fn provider_subject(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Google => self.google_id.as_deref(),
            ProviderKind::GitHub => self.github_id.as_deref(),
            ProviderKind::LinkedIn => self.linkedin_id.as_deref(),
            ProviderKind::X => self.x_id.as_deref(),
        }
    }

    /// Whether the account can sign in with a password.
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

/// Fields for creating an account row.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    /// Empty for OAuth-only accounts.
    pub password_hash: String,
    pub name: String,
    pub avatar_url: String,
    pub bio: String,
    pub google_id: Option<String>,
    pub github_id: Option<String>,
    pub linkedin_id: Option<String>,
    pub x_id: Option<String>,
    pub login_method: Option<LoginMethod>,
}

impl NewAccount {
    /// Set the subject id column for the given provider.
    pub fn set_provider_subject(&mut self, kind: ProviderKind, subject: String) {
        match kind {
            ProviderKind::Google => self.google_id = Some(subject),
            ProviderKind::GitHub => self.github_id = Some(subject),
            ProviderKind::LinkedIn => self.linkedin_id = Some(subject),
            ProviderKind::X => self.x_id = Some(subject),
        }
    }
}

/// Password registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Password login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
