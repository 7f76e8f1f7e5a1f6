//! Pull secret and service account records.
//!
//! These mirror the cluster objects a keychain is built from: secrets of the
//! docker config types, and the service accounts that reference them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zlayer_keychain::{CredentialIndex, DocumentFormat};

use crate::Result;

/// Data key holding a `.dockercfg` document.
pub const DOCKER_CONFIG_KEY: &str = ".dockercfg";

/// Data key holding a `.dockerconfigjson` document.
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";

/// The type of a secret record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SecretType {
    /// `kubernetes.io/dockercfg`
    DockerCfg,
    /// `kubernetes.io/dockerconfigjson`
    DockerConfigJson,
    /// `Opaque`
    Opaque,
    /// Any other type string
    Other(String),
}

impl SecretType {
    /// The wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DockerCfg => "kubernetes.io/dockercfg",
            Self::DockerConfigJson => "kubernetes.io/dockerconfigjson",
            Self::Opaque => "Opaque",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for SecretType {
    fn from(value: &str) -> Self {
        match value {
            "kubernetes.io/dockercfg" => Self::DockerCfg,
            "kubernetes.io/dockerconfigjson" => Self::DockerConfigJson,
            "Opaque" => Self::Opaque,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for SecretType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SecretType> for String {
    fn from(value: SecretType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secret record as fetched from the cluster.
///
/// Debug output lists the data keys but never their values.
#[derive(Clone)]
pub struct PullSecret {
    /// Secret name
    pub name: String,
    /// Namespace the secret lives in
    pub namespace: String,
    /// Secret type
    pub secret_type: SecretType,
    /// Raw data values by key
    pub data: HashMap<String, Vec<u8>>,
}

impl PullSecret {
    /// Create a `kubernetes.io/dockercfg` secret holding a bare credential map.
    pub fn dockercfg(
        namespace: impl Into<String>,
        name: impl Into<String>,
        document: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_data(
            namespace,
            name,
            SecretType::DockerCfg,
            DOCKER_CONFIG_KEY,
            document,
        )
    }

    /// Create a `kubernetes.io/dockerconfigjson` secret holding `{"auths": ...}`.
    pub fn dockerconfigjson(
        namespace: impl Into<String>,
        name: impl Into<String>,
        document: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_data(
            namespace,
            name,
            SecretType::DockerConfigJson,
            DOCKER_CONFIG_JSON_KEY,
            document,
        )
    }

    fn with_data(
        namespace: impl Into<String>,
        name: impl Into<String>,
        secret_type: SecretType,
        key: &str,
        document: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            secret_type,
            data: HashMap::from([(key.to_string(), document.into())]),
        }
    }

    /// The credential document this secret carries, if any.
    ///
    /// Only the docker config types are considered, and only when the data
    /// key for that type is present and non-empty.
    #[must_use]
    pub fn document(&self) -> Option<(DocumentFormat, &[u8])> {
        let (format, key) = match self.secret_type {
            SecretType::DockerCfg => (DocumentFormat::DockerCfg, DOCKER_CONFIG_KEY),
            SecretType::DockerConfigJson => {
                (DocumentFormat::DockerConfigJson, DOCKER_CONFIG_JSON_KEY)
            }
            SecretType::Opaque | SecretType::Other(_) => return None,
        };

        self.data
            .get(key)
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| (format, bytes.as_slice()))
    }

    /// Parse this secret's credential document.
    ///
    /// Returns `Ok(None)` when the secret carries no credential document.
    ///
    /// # Errors
    ///
    /// Returns a keychain error if the document is malformed.
    pub fn credential_index(&self) -> Result<Option<CredentialIndex>> {
        let Some((format, bytes)) = self.document() else {
            return Ok(None);
        };

        let index = match format {
            DocumentFormat::DockerCfg => CredentialIndex::parse(bytes)?,
            DocumentFormat::DockerConfigJson => CredentialIndex::parse_config_json(bytes)?,
        };
        Ok(Some(index))
    }
}

impl fmt::Debug for PullSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("PullSecret")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("secret_type", &self.secret_type)
            .field("data", &keys)
            .finish()
    }
}

/// A workload identity and the pull secrets attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccount {
    /// Service account name
    pub name: String,
    /// Namespace the service account lives in
    pub namespace: String,
    /// Names of attached pull secrets, in attachment order
    #[serde(default)]
    pub image_pull_secrets: Vec<String>,
}

impl ServiceAccount {
    /// Create a service account with no attached pull secrets.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            image_pull_secrets: Vec::new(),
        }
    }

    /// Attach a pull secret by name.
    #[must_use]
    pub fn with_pull_secret(mut self, name: impl Into<String>) -> Self {
        self.image_pull_secrets.push(name.into());
        self
    }
}
