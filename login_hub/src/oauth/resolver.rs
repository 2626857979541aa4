//! Identity resolution: match, link, or create an account for an external
//! identity.
//!
//! The resolver is the only writer on the OAuth path. It looks an identity up
//! by the provider's subject id first and only then by email (username for X,
//! which has no reliable email), so when both match different rows the
//! id-matched account wins and neither row is merged or mutated unexpectedly.
//! Creation races are settled by the store's uniqueness constraints: a
//! conflict triggers exactly one re-lookup before giving up.

use std::sync::Arc;

use super::errors::{OAuthError, OAuthResult};
use super::identity::{ExternalIdentity, ProviderKind};
use crate::auth::{Account, AuthError, NewAccount};
use crate::db::{AccountRepository, LinkUpdate};

/// How an identity was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No account matched; a new one was created.
    Created,
    /// An account matched by email/username and the provider id was attached.
    Linked,
    /// The provider id was already on file; nothing changed.
    Matched,
}

/// A resolved account and how it was arrived at.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub account: Account,
    pub outcome: Resolution,
}

#[derive(Clone)]
pub struct IdentityResolver {
    repo: Arc<dyn AccountRepository>,
}

impl IdentityResolver {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Resolve an external identity to exactly one account.
    pub async fn resolve(&self, identity: &ExternalIdentity) -> OAuthResult<Resolved> {
        match self.find_match(identity).await? {
            Some(account) => self.link_or_match(account, identity).await,
            None => self.create(identity).await,
        }
    }

    /// Subject-id match first, then the provider's secondary key.
    async fn find_match(&self, identity: &ExternalIdentity) -> OAuthResult<Option<Account>> {
        if let Some(account) = self
            .repo
            .find_by_provider_subject(identity.provider, &identity.subject)
            .await
            .map_err(OAuthError::Store)?
        {
            return Ok(Some(account));
        }

        let secondary = match identity.provider {
            ProviderKind::X => self.repo.find_by_username(&identity.username).await,
            _ => self.repo.find_by_email(&identity.email).await,
        };
        secondary.map_err(OAuthError::Store)
    }

    async fn link_or_match(
        &self,
        account: Account,
        identity: &ExternalIdentity,
    ) -> OAuthResult<Resolved> {
        if account.provider_subject(identity.provider).is_some() {
            // Repeat login. Stored profile fields are left alone.
            return Ok(Resolved {
                account,
                outcome: Resolution::Matched,
            });
        }

        let update = LinkUpdate {
            account_id: account.id,
            provider: identity.provider,
            subject: identity.subject.clone(),
            name: identity.name.clone(),
            avatar_url: (!identity.avatar_url.is_empty()).then(|| identity.avatar_url.clone()),
        };
        let account = self
            .repo
            .link_identity(&update)
            .await
            .map_err(OAuthError::Store)?;

        tracing::info!(
            account_id = account.id,
            provider = %identity.provider,
            "linked external identity to existing account"
        );

        Ok(Resolved {
            account,
            outcome: Resolution::Linked,
        })
    }

    async fn create(&self, identity: &ExternalIdentity) -> OAuthResult<Resolved> {
        let mut new_account = NewAccount {
            username: identity.username.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            avatar_url: identity.avatar_url.clone(),
            login_method: Some(identity.provider.into()),
            ..NewAccount::default()
        };
        new_account.set_provider_subject(identity.provider, identity.subject.clone());

        match self.repo.create(&new_account).await {
            Ok(account) => {
                tracing::info!(
                    account_id = account.id,
                    provider = %identity.provider,
                    "created account from external identity"
                );
                Ok(Resolved {
                    account,
                    outcome: Resolution::Created,
                })
            }
            Err(AuthError::AccountConflict) => {
                // A concurrent first login won the insert. One re-lookup must
                // now find the row; if it does not, surface the conflict.
                match self.find_match(identity).await? {
                    Some(account) => self.link_or_match(account, identity).await,
                    None => Err(OAuthError::AccountCreateConflict),
                }
            }
            Err(e) => Err(OAuthError::Store(e)),
        }
    }
}
