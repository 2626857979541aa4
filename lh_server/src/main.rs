//! Login server binary.
//!
//! Wires the account store, provider registry, and HTTP API together and
//! serves them over a single listener.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use lh_server::{api, config::ServerConfig, logging};
use login_hub::db::{Database, DatabaseConfig, PgAccountRepository};
use pico_args::Arguments;

const HELP: &str = "\
Run the login server

USAGE:
  lh_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/login_hub]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  LOGIN_PASSWORD_ENABLED   Password login switch        [default: true]
  LOGIN_GOOGLE_ENABLED     Google sign-in switch        [default: true]
  LOGIN_GITHUB_ENABLED     GitHub sign-in switch        [default: false]
  LOGIN_LINKEDIN_ENABLED   LinkedIn sign-in switch      [default: false]
  LOGIN_X_ENABLED          X sign-in switch             [default: false]
  <PROVIDER>_CLIENT_ID     OAuth client id per provider
  <PROVIDER>_CLIENT_SECRET OAuth client secret per provider
  <PROVIDER>_REDIRECT_URL  OAuth callback URL per provider
  ADMIN_BASE_PATH          Admin page path segment      [default: admin]
  (See .env file for all configuration options)
";

struct Args {
    bind: SocketAddr,
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.value_from_str("--bind").unwrap_or_else(|_| {
            std::env::var("SERVER_BIND")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
                .parse()
                .expect("Invalid SERVER_BIND address")
        }),
        database_url: pargs.value_from_str("--db-url").unwrap_or_else(|_| {
            std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://postgres@localhost/login_hub".to_string())
        }),
    };

    logging::init();
    tracing::info!("Starting login server at {}", args.bind);

    let db_config = DatabaseConfig {
        database_url: args.database_url,
        ..DatabaseConfig::default()
    };

    let db = Database::new(&db_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    db.ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure schema: {}", e))?;
    db.health_check()
        .await
        .map_err(|e| anyhow::anyhow!("Database health check failed: {}", e))?;

    tracing::info!("Database connected successfully");

    let config = ServerConfig::from_env();
    let enabled: Vec<String> = config
        .build_registry()
        .enabled_kinds()
        .iter()
        .map(ToString::to_string)
        .collect();
    tracing::info!(
        password_login = config.password_login_enabled,
        providers = ?enabled,
        "login methods configured"
    );

    let repo = Arc::new(PgAccountRepository::new(db.pool().clone()));
    let state = api::AppState::new(repo, config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", args.bind, e))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        args.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
