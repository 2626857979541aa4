//! Registry of enabled providers.

use std::collections::HashMap;

use super::identity::ProviderKind;
use super::provider::OAuthProvider;

/// The set of providers a deployment has enabled and configured.
///
/// A disabled provider is simply never registered, so `get` returning `None`
/// covers both "unknown" and "switched off". Routes stay registered either
/// way; handlers consult the registry at request time.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Box<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider; replaces any previous adapter for the same kind.
    pub fn register(&mut self, provider: Box<dyn OAuthProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    /// Look up an enabled provider.
    pub fn get(&self, kind: ProviderKind) -> Option<&dyn OAuthProvider> {
        self.providers.get(&kind).map(Box::as_ref)
    }

    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Enabled kinds in display order.
    pub fn enabled_kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::errors::OAuthResult;
    use crate::oauth::identity::ExternalIdentity;
    use async_trait::async_trait;

    struct StubProvider(ProviderKind);

    #[async_trait]
    impl OAuthProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.0
        }

        fn authorize_url(&self, _state: &str, _code_challenge: Option<&str>) -> String {
            String::new()
        }

        async fn exchange(
            &self,
            _code: &str,
            _code_verifier: Option<&str>,
        ) -> OAuthResult<ExternalIdentity> {
            unimplemented!("stub")
        }
    }

    #[test]
    fn unregistered_kinds_are_disabled() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(StubProvider(ProviderKind::Google)));
        registry.register(Box::new(StubProvider(ProviderKind::X)));

        assert!(registry.is_enabled(ProviderKind::Google));
        assert!(!registry.is_enabled(ProviderKind::GitHub));
        assert!(registry.get(ProviderKind::LinkedIn).is_none());
        assert_eq!(
            registry.enabled_kinds(),
            vec![ProviderKind::Google, ProviderKind::X]
        );
    }
}
