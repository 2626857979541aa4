//! Password authentication and page handlers.

use axum::{
    Form,
    extract::{Extension, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use login_hub::auth::{AuthError, LoginRequest, RegisterRequest};
use login_hub::{Account, AccountId};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use super::AppState;
use super::session::AuthSession;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub error: Option<String>,
}

/// `GET /` — landing page.
pub async fn home(session: Session) -> Response {
    let signed_in = AuthSession::new(session)
        .account_id()
        .await
        .ok()
        .flatten()
        .is_some();

    let body = if signed_in {
        "<p>Signed in. <a href=\"/profile\">Profile</a> | <a href=\"/logout\">Logout</a></p>"
    } else {
        "<p><a href=\"/login\">Login</a> | <a href=\"/register\">Register</a></p>"
    };
    Html(page("Home", body)).into_response()
}

/// `GET /login` — login page with provider links and an optional error tag.
pub async fn login_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Response {
    let mut body = String::new();
    if let Some(error) = &params.error {
        body.push_str(&format!(
            "<p class=\"error\">Login failed: {}</p>",
            escape(error)
        ));
    }
    if state.config.password_login_enabled {
        body.push_str(
            "<form method=\"post\" action=\"/login\">\
             <input name=\"username\" placeholder=\"Username\">\
             <input name=\"password\" type=\"password\" placeholder=\"Password\">\
             <button type=\"submit\">Login</button></form>",
        );
    }
    for kind in state.registry.enabled_kinds() {
        body.push_str(&format!(
            "<p><a href=\"/auth/{kind}\">Continue with {kind}</a></p>"
        ));
    }
    Html(page("Login", &body)).into_response()
}

/// `POST /login` — password login.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(request): Form<LoginRequest>,
) -> Response {
    if !state.config.password_login_enabled {
        return Redirect::to("/login?error=password_disabled").into_response();
    }

    match state.auth_manager.login(request).await {
        Ok(account) => establish_session(session, account.id).await,
        Err(err) => {
            crate::logging::log_security_event("failed_login", None, &err.client_message());
            Redirect::to("/login?error=invalid").into_response()
        }
    }
}

/// `GET /register` — registration page.
pub async fn register_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Response {
    if !state.config.password_login_enabled {
        return Redirect::to("/login?error=password_disabled").into_response();
    }

    let mut body = String::new();
    if let Some(error) = &params.error {
        body.push_str(&format!(
            "<p class=\"error\">Registration failed: {}</p>",
            escape(error)
        ));
    }
    body.push_str(
        "<form method=\"post\" action=\"/register\">\
         <input name=\"username\" placeholder=\"Username\">\
         <input name=\"email\" placeholder=\"Email\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <button type=\"submit\">Register</button></form>",
    );
    Html(page("Register", &body)).into_response()
}

/// `POST /register` — create an account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(request): Form<RegisterRequest>,
) -> Response {
    if !state.config.password_login_enabled {
        return Redirect::to("/login?error=password_disabled").into_response();
    }

    match state.auth_manager.register(request).await {
        Ok(account) => establish_session(session, account.id).await,
        Err(err) => {
            let tag = register_error_tag(&err);
            tracing::warn!(error = %err, "registration failed");
            Redirect::to(&format!("/register?error={tag}")).into_response()
        }
    }
}

/// `GET /logout` — destroy the session.
pub async fn logout(session: Session) -> Response {
    if AuthSession::new(session).logout().await.is_err() {
        return Redirect::to("/login?error=session").into_response();
    }
    Redirect::to("/login").into_response()
}

/// `GET /profile` — the signed-in account, injected by the auth middleware.
pub async fn profile(Extension(account): Extension<Account>) -> Response {
    Json(account).into_response()
}

/// `GET /{admin_path}` — admin landing page.
pub async fn admin_home(Extension(account): Extension<Account>) -> Response {
    Html(page(
        "Admin",
        &format!("<p>Welcome, {}.</p>", escape(&account.username)),
    ))
    .into_response()
}

/// `GET /health` — liveness probe.
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

async fn establish_session(session: Session, account_id: AccountId) -> Response {
    if AuthSession::new(session).authenticate(account_id).await.is_err() {
        return Redirect::to("/login?error=session").into_response();
    }
    Redirect::to("/").into_response()
}

fn register_error_tag(err: &AuthError) -> &'static str {
    match err {
        AuthError::UsernameTaken => "username_taken",
        AuthError::EmailTaken => "email_taken",
        AuthError::InvalidUsername(_) => "invalid_username",
        AuthError::WeakPassword(_) => "weak_password",
        _ => "invalid",
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head>\
         <body><h1>{title}</h1>{body}</body></html>"
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
