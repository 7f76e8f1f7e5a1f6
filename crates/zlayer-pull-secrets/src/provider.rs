//! Pull secret provider trait and an in-memory implementation.
//!
//! - [`PullSecretProvider`]: read-only access to secrets and service accounts
//! - [`InMemoryPullSecretProvider`]: a provider over records held in memory

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{PullSecret, PullSecretsError, Result, ServiceAccount};

/// Read-only access to pull secrets and service accounts.
///
/// Implementations front whatever control plane holds the records. Timeouts,
/// retries and cancellation for those lookups belong to the implementation.
#[async_trait]
pub trait PullSecretProvider: Send + Sync {
    /// Fetch a secret by namespace and name.
    ///
    /// # Errors
    ///
    /// Returns `PullSecretsError::SecretNotFound` if the secret doesn't exist,
    /// or other errors for backend failures.
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<PullSecret>;

    /// Fetch a service account by namespace and name.
    ///
    /// # Errors
    ///
    /// Returns `PullSecretsError::ServiceAccountNotFound` if the account
    /// doesn't exist, or other errors for backend failures.
    async fn get_service_account(&self, namespace: &str, name: &str) -> Result<ServiceAccount>;
}

type Key = (String, String);

/// Provider over secrets and service accounts held in memory.
#[derive(Debug, Default)]
pub struct InMemoryPullSecretProvider {
    secrets: RwLock<HashMap<Key, PullSecret>>,
    service_accounts: RwLock<HashMap<Key, ServiceAccount>>,
}

impl InMemoryPullSecretProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, keyed by its own namespace and name.
    #[must_use]
    pub fn with_secret(mut self, secret: PullSecret) -> Self {
        self.secrets
            .get_mut()
            .insert((secret.namespace.clone(), secret.name.clone()), secret);
        self
    }

    /// Add a service account, keyed by its own namespace and name.
    #[must_use]
    pub fn with_service_account(mut self, account: ServiceAccount) -> Self {
        self.service_accounts
            .get_mut()
            .insert((account.namespace.clone(), account.name.clone()), account);
        self
    }

    /// Insert or replace a secret.
    pub async fn insert_secret(&self, secret: PullSecret) {
        self.secrets
            .write()
            .await
            .insert((secret.namespace.clone(), secret.name.clone()), secret);
    }

    /// Remove a secret, returning it if it existed.
    pub async fn remove_secret(&self, namespace: &str, name: &str) -> Option<PullSecret> {
        self.secrets
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
    }

    /// Insert or replace a service account.
    pub async fn insert_service_account(&self, account: ServiceAccount) {
        self.service_accounts
            .write()
            .await
            .insert((account.namespace.clone(), account.name.clone()), account);
    }
}

#[async_trait]
impl PullSecretProvider for InMemoryPullSecretProvider {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<PullSecret> {
        self.secrets
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| PullSecretsError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn get_service_account(&self, namespace: &str, name: &str) -> Result<ServiceAccount> {
        self.service_accounts
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| PullSecretsError::ServiceAccountNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_secret() {
        let provider = InMemoryPullSecretProvider::new()
            .with_secret(PullSecret::dockercfg("ns", "regcred", "{}"));

        let secret = provider.get_secret("ns", "regcred").await.unwrap();
        assert_eq!(secret.name, "regcred");

        let err = provider.get_secret("other", "regcred").await.unwrap_err();
        assert!(matches!(err, PullSecretsError::SecretNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_insert_and_remove() {
        let provider = InMemoryPullSecretProvider::new();
        provider
            .insert_secret(PullSecret::dockercfg("ns", "regcred", "{}"))
            .await;
        assert!(provider.get_secret("ns", "regcred").await.is_ok());

        assert!(provider.remove_secret("ns", "regcred").await.is_some());
        assert!(provider.get_secret("ns", "regcred").await.is_err());
        assert!(provider.remove_secret("ns", "regcred").await.is_none());
    }

    #[tokio::test]
    async fn test_get_service_account() {
        let provider = InMemoryPullSecretProvider::new();
        provider
            .insert_service_account(ServiceAccount::new("ns", "builder").with_pull_secret("a"))
            .await;

        let account = provider.get_service_account("ns", "builder").await.unwrap();
        assert_eq!(account.image_pull_secrets, vec!["a"]);

        let err = provider
            .get_service_account("ns", "default")
            .await
            .unwrap_err();
        assert!(matches!(err, PullSecretsError::ServiceAccountNotFound { .. }));
    }
}
