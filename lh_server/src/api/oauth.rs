//! OAuth begin/callback handlers.
//!
//! Every outcome of these handlers is a redirect: to the provider's
//! authorization page on begin, to the application home on success, or to the
//! login page with a short error tag on failure. Provider error bodies never
//! reach the browser.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use login_hub::oauth::{self, OAuthError, OAuthProvider, ProviderKind};
use serde::Deserialize;
use tower_sessions::Session;

use super::AppState;
use super::session::AuthSession;

fn login_error(tag: &str) -> Response {
    Redirect::to(&format!("/login?error={tag}")).into_response()
}

fn parse_provider(segment: &str) -> Result<ProviderKind, Response> {
    ProviderKind::from_path_segment(segment).ok_or_else(|| login_error("invalid"))
}

fn enabled_provider<'a>(
    state: &'a AppState,
    kind: ProviderKind,
) -> Result<&'a dyn OAuthProvider, Response> {
    state
        .registry
        .get(kind)
        .ok_or_else(|| login_error(&OAuthError::ProviderDisabled(kind).redirect_tag()))
}

/// `GET /auth/{provider}` — start the authorization-code flow.
pub async fn begin(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    session: Session,
) -> Response {
    let kind = match parse_provider(&provider) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let provider = match enabled_provider(&state, kind) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    let tokens = oauth::begin_flow(provider.requires_pkce());
    let auth_session = AuthSession::new(session);
    if auth_session.store_pending_flow(&tokens).await.is_err() {
        return login_error("session");
    }

    let challenge = tokens.pkce.as_ref().map(|p| p.code_challenge.as_str());
    let url = provider.authorize_url(&tokens.state, challenge);

    tracing::debug!(provider = %kind, "redirecting to provider authorization page");

    // 307 keeps the redirect method-preserving, as providers expect.
    Redirect::temporary(&url).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// `GET /auth/{provider}/callback` — finish the flow and sign the browser in.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    session: Session,
) -> Response {
    let kind = match parse_provider(&provider) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let provider = match enabled_provider(&state, kind) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    if params.code.is_empty() {
        return login_error(&OAuthError::MissingCode.redirect_tag());
    }

    // The pending flow is consumed here, before validation, so neither a
    // mismatch nor a later failure leaves a reusable state token behind.
    let auth_session = AuthSession::new(session);
    let pending = match auth_session.take_pending_flow().await {
        Ok(pending) => pending,
        Err(_) => return login_error("session"),
    };

    if let Err(err) = oauth::validate_state(&pending, &params.state) {
        crate::logging::log_security_event(
            "oauth_state_mismatch",
            None,
            &format!("State validation failed on {kind} callback"),
        );
        return login_error(&err.redirect_tag());
    }

    let identity = match provider
        .exchange(&params.code, pending.code_verifier.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(provider = %kind, error = %err, "provider exchange failed");
            return login_error(&err.redirect_tag());
        }
    };

    let resolved = match state.resolver.resolve(&identity).await {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::error!(provider = %kind, error = %err, "identity resolution failed");
            return login_error(&err.redirect_tag());
        }
    };

    if auth_session.authenticate(resolved.account.id).await.is_err() {
        return login_error("session");
    }

    tracing::info!(
        account_id = resolved.account.id,
        provider = %kind,
        outcome = ?resolved.outcome,
        "oauth sign-in complete"
    );

    Redirect::to("/").into_response()
}
