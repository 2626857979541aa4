//! Repository trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over account storage,
//! enabling better testing through mock implementations and dependency
//! injection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::auth::{Account, AccountId, AuthError, AuthResult, LoginMethod, NewAccount};
use crate::oauth::ProviderKind;

/// Fields applied when linking an external identity to an existing account.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub account_id: AccountId,
    pub provider: ProviderKind,
    pub subject: String,
    pub name: String,
    /// `None` leaves the stored avatar untouched.
    pub avatar_url: Option<String>,
}

/// Trait for account repository operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>>;

    /// Find account by username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Find account holding the given provider subject id
    async fn find_by_provider_subject(
        &self,
        provider: ProviderKind,
        subject: &str,
    ) -> AuthResult<Option<Account>>;

    /// Create a new account
    ///
    /// A uniqueness-constraint violation surfaces as
    /// [`AuthError::AccountConflict`] so callers can retry their lookup.
    async fn create(&self, account: &NewAccount) -> AuthResult<Account>;

    /// Attach a provider subject id to an existing account and refresh its
    /// profile fields
    async fn link_identity(&self, update: &LinkUpdate) -> AuthResult<Account>;
}

/// Column holding the subject id for a provider.
fn provider_column(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Google => "google_id",
        ProviderKind::GitHub => "github_id",
        ProviderKind::LinkedIn => "linkedin_id",
        ProviderKind::X => "x_id",
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, name, avatar_url, bio,
     google_id, github_id, linkedin_id, x_id, login_method, is_admin, created_at, updated_at";

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        bio: row.get("bio"),
        google_id: row.get("google_id"),
        github_id: row.get("github_id"),
        linkedin_id: row.get("linkedin_id"),
        x_id: row.get("x_id"),
        login_method: LoginMethod::from_str_lossy(row.get::<String, _>("login_method").as_str()),
        is_admin: row.get("is_admin"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}

fn map_create_error(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AuthError::AccountConflict
        }
        _ => AuthError::Database(err),
    }
}

/// Default PostgreSQL implementation of `AccountRepository`
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, clause: &str, value: &str) -> AuthResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {clause} = $1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(account_from_row))
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        self.find_where("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        self.find_where("email", email).await
    }

    async fn find_by_provider_subject(
        &self,
        provider: ProviderKind,
        subject: &str,
    ) -> AuthResult<Option<Account>> {
        self.find_where(provider_column(provider), subject).await
    }

    async fn create(&self, account: &NewAccount) -> AuthResult<Account> {
        let login_method = account.login_method.unwrap_or(LoginMethod::Password);
        let query = format!(
            "INSERT INTO accounts
                (username, email, password_hash, name, avatar_url, bio,
                 google_id, github_id, linkedin_id, x_id, login_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.name)
            .bind(&account.avatar_url)
            .bind(&account.bio)
            .bind(&account.google_id)
            .bind(&account.github_id)
            .bind(&account.linkedin_id)
            .bind(&account.x_id)
            .bind(login_method.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_create_error)?;

        Ok(account_from_row(&row))
    }

    async fn link_identity(&self, update: &LinkUpdate) -> AuthResult<Account> {
        let column = provider_column(update.provider);
        let query = format!(
            "UPDATE accounts
             SET {column} = $1,
                 login_method = $2,
                 name = $3,
                 avatar_url = COALESCE($4, avatar_url),
                 updated_at = now()
             WHERE id = $5
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&update.subject)
            .bind(LoginMethod::from(update.provider).as_str())
            .bind(&update.name)
            .bind(&update.avatar_url)
            .bind(update.account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_create_error)?;

        row.as_ref()
            .map(account_from_row)
            .ok_or(AuthError::AccountNotFound)
    }
}
