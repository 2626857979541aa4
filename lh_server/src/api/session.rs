//! Session accessors for the authenticated account and the pending OAuth flow.
//!
//! The cookie session carries at most three keys: the signed-in account id,
//! and during an OAuth round trip the state token and (for PKCE providers)
//! the code verifier. The flow keys are consumed exactly once at callback
//! time, success or failure.

use login_hub::AccountId;
use login_hub::oauth::{FlowTokens, PendingFlow};
use tower_sessions::Session;

const ACCOUNT_ID_KEY: &str = "account_id";
const OAUTH_STATE_KEY: &str = "oauth_state";
const OAUTH_VERIFIER_KEY: &str = "oauth_code_verifier";

/// Thin wrapper giving the session a typed surface.
#[derive(Clone)]
pub struct AuthSession(Session);

impl AuthSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// The signed-in account id, if any.
    pub async fn account_id(&self) -> Result<Option<AccountId>, tower_sessions::session::Error> {
        self.0.get::<AccountId>(ACCOUNT_ID_KEY).await
    }

    /// Establish the authenticated session.
    ///
    /// The session id is cycled so a session fixated before login cannot be
    /// replayed afterwards.
    pub async fn authenticate(
        &self,
        account_id: AccountId,
    ) -> Result<(), tower_sessions::session::Error> {
        self.0.cycle_id().await?;
        self.0.insert(ACCOUNT_ID_KEY, account_id).await
    }

    /// Destroy the session entirely.
    pub async fn logout(&self) -> Result<(), tower_sessions::session::Error> {
        self.0.flush().await
    }

    /// Store the tokens of a freshly begun OAuth flow.
    pub async fn store_pending_flow(
        &self,
        tokens: &FlowTokens,
    ) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(OAUTH_STATE_KEY, tokens.state.clone()).await?;
        if let Some(pkce) = &tokens.pkce {
            self.0
                .insert(OAUTH_VERIFIER_KEY, pkce.code_verifier.clone())
                .await?;
        }
        Ok(())
    }

    /// Remove and return the pending flow. Single-use by construction.
    pub async fn take_pending_flow(
        &self,
    ) -> Result<PendingFlow, tower_sessions::session::Error> {
        let state = self.0.remove::<String>(OAUTH_STATE_KEY).await?;
        let code_verifier = self.0.remove::<String>(OAUTH_VERIFIER_KEY).await?;
        Ok(PendingFlow {
            state,
            code_verifier,
        })
    }
}
