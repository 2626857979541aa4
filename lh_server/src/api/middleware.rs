//! Authentication middleware for protected endpoints.
//!
//! Both middlewares read the account id from the cookie session, load the
//! account, and inject it into request extensions for downstream handlers.
//! Browsers without a valid session are redirected to the login page rather
//! than handed a bare 401.
//!
//! # Extracting the account
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use login_hub::Account;
//!
//! async fn protected_handler(Extension(account): Extension<Account>) -> String {
//!     format!("Signed in as {}", account.username)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use login_hub::Account;
use tower_sessions::Session;

use super::AppState;
use super::session::AuthSession;

/// Load the signed-in account for a request, if any.
async fn signed_in_account(state: &AppState, session: Session) -> Option<Account> {
    let account_id = AuthSession::new(session).account_id().await.ok()??;
    state.repo.find_by_id(account_id).await.ok()?
}

/// Require a signed-in account; otherwise redirect to the login page.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match signed_in_account(&state, session).await {
        Some(account) => {
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Require a signed-in admin account.
///
/// Unauthenticated browsers go to the login page; authenticated non-admins
/// get a 403.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match signed_in_account(&state, session).await {
        Some(account) if account.is_admin => {
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Some(_) => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
        None => Redirect::to("/login").into_response(),
    }
}
