//! Server configuration from environment variables.
//!
//! All settings are read once at startup into an immutable [`ServerConfig`];
//! handlers and adapters never consult the environment themselves.

use std::env;

use login_hub::oauth::{
    GitHubProvider, GoogleProvider, LinkedInProvider, ProviderCredentials, ProviderKind,
    ProviderRegistry, XProvider,
};

/// One provider's switch and credentials.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl ProviderSettings {
    /// Enabled and fully configured.
    pub fn usable(&self) -> bool {
        self.enabled
            && !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.redirect_url.is_empty()
    }

    fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.redirect_url.clone(),
        }
    }
}

/// Immutable server configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Username/password login switch.
    pub password_login_enabled: bool,
    pub google: ProviderSettings,
    pub github: ProviderSettings,
    pub linkedin: ProviderSettings,
    pub x: ProviderSettings,
    /// Path segment the admin page is mounted under.
    pub admin_base_path: String,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// Login switches: `LOGIN_PASSWORD_ENABLED` and `LOGIN_GOOGLE_ENABLED`
    /// default to true, `LOGIN_GITHUB_ENABLED` / `LOGIN_LINKEDIN_ENABLED` /
    /// `LOGIN_X_ENABLED` default to false. Each provider reads
    /// `<PROVIDER>_CLIENT_ID`, `<PROVIDER>_CLIENT_SECRET`, and
    /// `<PROVIDER>_REDIRECT_URL`. The admin page path comes from
    /// `ADMIN_BASE_PATH` (default `admin`).
    pub fn from_env() -> Self {
        Self {
            password_login_enabled: env_bool("LOGIN_PASSWORD_ENABLED", true),
            google: provider_settings("GOOGLE", env_bool("LOGIN_GOOGLE_ENABLED", true)),
            github: provider_settings("GITHUB", env_bool("LOGIN_GITHUB_ENABLED", false)),
            linkedin: provider_settings("LINKEDIN", env_bool("LOGIN_LINKEDIN_ENABLED", false)),
            x: provider_settings("X", env_bool("LOGIN_X_ENABLED", false)),
            admin_base_path: env::var("ADMIN_BASE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "admin".to_string()),
        }
    }

    /// Configuration with everything switched off, for tests to build on.
    pub fn disabled() -> Self {
        Self {
            password_login_enabled: false,
            google: ProviderSettings::default(),
            github: ProviderSettings::default(),
            linkedin: ProviderSettings::default(),
            x: ProviderSettings::default(),
            admin_base_path: "admin".to_string(),
        }
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Google => &self.google,
            ProviderKind::GitHub => &self.github,
            ProviderKind::LinkedIn => &self.linkedin,
            ProviderKind::X => &self.x,
        }
    }

    /// Build the registry of usable providers with their default endpoints.
    pub fn build_registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        if self.google.usable() {
            registry.register(Box::new(GoogleProvider::new(self.google.credentials())));
        }
        if self.github.usable() {
            registry.register(Box::new(GitHubProvider::new(self.github.credentials())));
        }
        if self.linkedin.usable() {
            registry.register(Box::new(LinkedInProvider::new(self.linkedin.credentials())));
        }
        if self.x.usable() {
            registry.register(Box::new(XProvider::new(self.x.credentials())));
        }

        registry
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn provider_settings(prefix: &str, enabled: bool) -> ProviderSettings {
    let var = |suffix: &str| env::var(format!("{prefix}_{suffix}")).unwrap_or_default();
    ProviderSettings {
        enabled,
        client_id: var("CLIENT_ID"),
        client_secret: var("CLIENT_SECRET"),
        redirect_url: var("REDIRECT_URL"),
    }
}
