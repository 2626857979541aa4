//! Provider kinds and the normalized identity they produce.

use serde::{Deserialize, Serialize};

/// The external identity providers this crate can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    GitHub,
    LinkedIn,
    X,
}

impl ProviderKind {
    /// All supported providers, in display order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Google,
        ProviderKind::GitHub,
        ProviderKind::LinkedIn,
        ProviderKind::X,
    ];

    /// The URL path segment and configuration key for this provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::GitHub => "github",
            ProviderKind::LinkedIn => "linkedin",
            ProviderKind::X => "x",
        }
    }

    /// Parse a provider kind from its path segment.
    pub fn from_path_segment(s: &str) -> Option<Self> {
        match s {
            "google" => Some(ProviderKind::Google),
            "github" => Some(ProviderKind::GitHub),
            "linkedin" => Some(ProviderKind::LinkedIn),
            "x" => Some(ProviderKind::X),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider's answer to "who just signed in", normalized to one shape.
///
/// `subject` is the provider's stable user id and is never empty. `email` and
/// `username` are already resolved through the provider's fallback rules, so
/// both are always non-empty by the time an identity leaves an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub provider: ProviderKind,
    /// Stable provider-side user id.
    pub subject: String,
    pub email: String,
    pub username: String,
    pub name: String,
    /// Empty when the provider did not return a picture.
    pub avatar_url: String,
}
