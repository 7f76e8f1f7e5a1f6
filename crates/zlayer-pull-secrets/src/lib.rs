//! `ZLayer` Pull Secrets
//!
//! Builds registry keychains from the image pull secrets available to a
//! workload.
//!
//! ## Sources
//! - Explicitly named pull secrets
//! - Pull secrets attached to the workload's service account
//!
//! Records are fetched through a [`PullSecretProvider`]; the credential
//! matching itself lives in `zlayer-keychain`.

mod config;
mod error;
mod keychain;
mod provider;
mod types;

pub use config::{KeychainOptions, NO_SERVICE_ACCOUNT};
pub use error::{PullSecretsError, Result};
pub use keychain::PullSecretKeychain;
pub use provider::{InMemoryPullSecretProvider, PullSecretProvider};
pub use types::{PullSecret, SecretType, ServiceAccount, DOCKER_CONFIG_JSON_KEY, DOCKER_CONFIG_KEY};
