//! Keychain resolver over an ordered list of credential indexes
//!
//! Each index is one credential source (typically one pull secret). Sources
//! are consulted in the order they were supplied and the first source with
//! *any* applicable entry wins outright; entries from different sources are
//! never merged, even when a later source has a more specific path. When no
//! source matches, the fallback authenticator is returned.

use std::sync::Arc;

use tracing::{debug, warn};

use super::credential::Authenticator;
use super::index::CredentialIndex;
use super::target::Target;

/// Anything that can turn a target into an authenticator.
///
/// Resolution never fails: "no credentials" is the anonymous authenticator.
pub trait Keychain: Send + Sync {
    /// Resolve the authenticator to use for `target`
    fn resolve(&self, target: &Target) -> Authenticator;
}

/// Which document shape a raw credential source holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Bare map of registry key to credential (`.dockercfg`)
    DockerCfg,
    /// `{"auths": {...}}` (`.dockerconfigjson`)
    DockerConfigJson,
}

/// Read-only keychain over ordered credential sources
#[derive(Debug, Clone, Default)]
pub struct KeychainResolver {
    indexes: Vec<Arc<CredentialIndex>>,
    fallback: Authenticator,
}

impl KeychainResolver {
    /// Build a resolver from indexes in precedence order.
    pub fn new(indexes: Vec<Arc<CredentialIndex>>, fallback: Authenticator) -> Self {
        Self { indexes, fallback }
    }

    /// Start building a resolver
    pub fn builder() -> KeychainResolverBuilder {
        KeychainResolverBuilder::default()
    }

    /// Credential sources in precedence order
    pub fn indexes(&self) -> &[Arc<CredentialIndex>] {
        &self.indexes
    }

    /// Authenticator returned when no source matches
    pub fn fallback(&self) -> &Authenticator {
        &self.fallback
    }

    /// Resolve `target` against the sources in order.
    pub fn resolve(&self, target: &Target) -> Authenticator {
        for (position, index) in self.indexes.iter().enumerate() {
            if let Some(credential) = index.matches(target) {
                debug!(%target, source = position, "resolved credentials");
                return Authenticator::from(credential);
            }
        }

        debug!(%target, "no credentials configured, using fallback");
        self.fallback.clone()
    }
}

impl Keychain for KeychainResolver {
    fn resolve(&self, target: &Target) -> Authenticator {
        KeychainResolver::resolve(self, target)
    }
}

/// Builder for [`KeychainResolver`]
#[derive(Debug, Default)]
pub struct KeychainResolverBuilder {
    indexes: Vec<Arc<CredentialIndex>>,
    fallback: Authenticator,
}

impl KeychainResolverBuilder {
    /// Append an already-parsed source
    #[must_use]
    pub fn index(mut self, index: impl Into<Arc<CredentialIndex>>) -> Self {
        self.indexes.push(index.into());
        self
    }

    /// Parse and append a raw source.
    ///
    /// A document that fails to parse contributes nothing; the failure is
    /// logged against `label` and the remaining sources are still used.
    #[must_use]
    pub fn document(mut self, label: &str, format: DocumentFormat, bytes: &[u8]) -> Self {
        let parsed = match format {
            DocumentFormat::DockerCfg => CredentialIndex::parse(bytes),
            DocumentFormat::DockerConfigJson => CredentialIndex::parse_config_json(bytes),
        };

        match parsed {
            Ok(index) => {
                debug!(source = label, entries = index.len(), "loaded credential source");
                self.indexes.push(Arc::new(index));
            }
            Err(e) => {
                warn!(source = label, error = %e, "skipping malformed credential source");
            }
        }
        self
    }

    /// Authenticator to return when nothing matches (anonymous by default)
    #[must_use]
    pub fn fallback(mut self, fallback: Authenticator) -> Self {
        self.fallback = fallback;
        self
    }

    /// Finish building
    pub fn build(self) -> KeychainResolver {
        KeychainResolver::new(self.indexes, self.fallback)
    }
}
