//! OAuth 2.0 sign-in: provider adapters, flow state, and identity resolution.
//!
//! The flow is the standard authorization-code dance. [`state`] mints the CSRF
//! state token (and a PKCE pair for providers that require it), a provider
//! adapter builds the authorization URL and later exchanges the callback code
//! for an [`ExternalIdentity`], and the [`IdentityResolver`] maps that identity
//! onto an [`crate::auth::Account`] by creating, linking, or matching.
//!
//! Providers are held in a [`ProviderRegistry`] keyed by [`ProviderKind`]; a
//! provider that is disabled in configuration is simply absent from the
//! registry.

pub mod errors;
pub mod identity;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod resolver;
pub mod state;

pub use errors::{OAuthError, OAuthResult};
pub use identity::{ExternalIdentity, ProviderKind};
pub use provider::{OAuthProvider, ProviderCredentials};
pub use providers::{GitHubProvider, GoogleProvider, LinkedInProvider, XProvider};
pub use registry::ProviderRegistry;
pub use resolver::{IdentityResolver, Resolution, Resolved};
pub use state::{FlowTokens, PendingFlow, PkcePair, begin_flow, validate_state};
