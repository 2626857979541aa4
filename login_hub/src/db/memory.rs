//! In-memory `AccountRepository` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{AccountRepository, LinkUpdate};
use crate::auth::{Account, AccountId, AuthError, AuthResult, LoginMethod, NewAccount};
use crate::oauth::ProviderKind;

/// Test double enforcing the same uniqueness rules as the accounts table.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing validation. Returns the stored row.
    pub fn seed(&self, account: Account) -> Account {
        let mut accounts = self.accounts.lock().unwrap();
        let mut account = account;
        if account.id == 0 {
            account.id = accounts.len() as AccountId + 1;
        }
        accounts.push(account.clone());
        account
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn violates_uniqueness(accounts: &[Account], candidate: &NewAccount) -> bool {
        accounts.iter().any(|a| {
            a.username == candidate.username
                || a.email == candidate.email
                || ProviderKind::ALL.iter().any(|kind| {
                    let new_subject = match kind {
                        ProviderKind::Google => candidate.google_id.as_deref(),
                        ProviderKind::GitHub => candidate.github_id.as_deref(),
                        ProviderKind::LinkedIn => candidate.linkedin_id.as_deref(),
                        ProviderKind::X => candidate.x_id.as_deref(),
                    };
                    new_subject.is_some() && a.provider_subject(*kind) == new_subject
                })
        })
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_provider_subject(
        &self,
        provider: ProviderKind,
        subject: &str,
    ) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.provider_subject(provider) == Some(subject))
            .cloned())
    }

    async fn create(&self, account: &NewAccount) -> AuthResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if Self::violates_uniqueness(&accounts, account) {
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
