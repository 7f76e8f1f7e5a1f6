//! Keychains built from a workload's pull secrets.
//!
//! Secrets become credential sources in this order:
//!
//! 1. the secrets named in [`KeychainOptions::image_pull_secrets`]
//! 2. the pull secrets attached to the service account, in attachment order
//!
//! Missing records and malformed documents are logged and skipped. Any other
//! provider failure aborts construction.

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use zlayer_keychain::{Authenticator, Keychain, KeychainResolver, Target};

use crate::{KeychainOptions, PullSecret, PullSecretProvider, Result};

/// Keychain over the pull secrets available to one workload.
///
/// Immutable once built and cheap to share; resolution never fails.
#[derive(Debug, Clone, Default)]
pub struct PullSecretKeychain {
    resolver: KeychainResolver,
}

impl PullSecretKeychain {
    /// Fetch the workload's pull secrets from `provider` and build a keychain.
    ///
    /// # Errors
    ///
    /// Returns the provider's error for any failure other than a missing
    /// secret or service account.
    #[instrument(skip(provider, options), fields(namespace = %options.namespace))]
    pub async fn new<P>(provider: &P, options: &KeychainOptions) -> Result<Self>
    where
        P: PullSecretProvider + ?Sized,
    {
        let mut secrets = Vec::new();

        for name in &options.image_pull_secrets {
            if let Some(secret) = fetch_secret(provider, &options.namespace, name).await? {
                secrets.push(secret);
            }
        }

        if options.uses_service_account() {
            match provider
                .get_service_account(&options.namespace, &options.service_account_name)
                .await
            {
                Ok(account) => {
                    for name in &account.image_pull_secrets {
                        if let Some(secret) =
                            fetch_secret(provider, &options.namespace, name).await?
                        {
                            secrets.push(secret);
                        }
                    }
                }
                Err(e) if e.is_not_found() => {
                    warn!(
                        service_account = %options.service_account_name,
                        "service account not found; ignoring"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self::from_pull_secrets(&secrets))
    }

    /// Build a keychain from already-fetched secrets, in precedence order.
    ///
    /// Secrets without a docker config document contribute nothing, and so do
    /// secrets whose document fails to parse.
    pub fn from_pull_secrets(secrets: &[PullSecret]) -> Self {
        let mut indexes = Vec::with_capacity(secrets.len());

        for secret in secrets {
            match secret.credential_index() {
                Ok(Some(index)) => {
                    debug!(
                        secret = %secret.name,
                        entries = index.len(),
                        "loaded pull secret"
                    );
                    indexes.push(Arc::new(index));
                }
                Ok(None) => {
                    warn!(
                        secret = %secret.name,
                        secret_type = %secret.secret_type,
                        "secret has no docker config data; ignoring"
                    );
                }
                Err(e) => {
                    warn!(secret = %secret.name, error = %e, "malformed pull secret; ignoring");
                }
            }
        }

        Self {
            resolver: KeychainResolver::new(indexes, Authenticator::Anonymous),
        }
    }

    /// Resolve the authenticator for `target`.
    pub fn resolve(&self, target: &Target) -> Authenticator {
        self.resolver.resolve(target)
    }

    /// The underlying resolver
    pub fn resolver(&self) -> &KeychainResolver {
        &self.resolver
    }

    /// Take the underlying resolver
    pub fn into_resolver(self) -> KeychainResolver {
        self.resolver
    }
}

impl Keychain for PullSecretKeychain {
    fn resolve(&self, target: &Target) -> Authenticator {
        self.resolver.resolve(target)
    }
}

async fn fetch_secret<P>(provider: &P, namespace: &str, name: &str) -> Result<Option<PullSecret>>
where
    P: PullSecretProvider + ?Sized,
{
    match provider.get_secret(namespace, name).await {
        Ok(secret) => Ok(Some(secret)),
        Err(e) if e.is_not_found() => {
            warn!(secret = %name, %namespace, "secret not found; ignoring");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
