//! Keychain construction options

use serde::{Deserialize, Serialize};

/// Service account name that disables the service account lookup entirely.
pub const NO_SERVICE_ACCOUNT: &str = "no service account";

/// Where to find pull secrets for a workload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeychainOptions {
    /// Namespace the secrets and service account live in
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Service account whose attached pull secrets are used, or
    /// [`NO_SERVICE_ACCOUNT`]
    #[serde(default = "default_service_account_name")]
    pub service_account_name: String,

    /// Explicitly named pull secrets, consulted before the service account's
    #[serde(default)]
    pub image_pull_secrets: Vec<String>,
}

impl Default for KeychainOptions {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            service_account_name: default_service_account_name(),
            image_pull_secrets: Vec::new(),
        }
    }
}

impl KeychainOptions {
    /// Options for the default service account of `namespace`
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Whether a service account lookup should happen
    pub fn uses_service_account(&self) -> bool {
        self.service_account_name != NO_SERVICE_ACCOUNT
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_service_account_name() -> String {
    "default".to_string()
}
