use thiserror::Error;
use zlayer_keychain::KeychainError;

#[derive(Error, Debug)]
pub enum PullSecretsError {
    #[error("Secret not found: {namespace}/{name}")]
    SecretNotFound { namespace: String, name: String },

    #[error("Service account not found: {namespace}/{name}")]
    ServiceAccountNotFound { namespace: String, name: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Keychain error: {0}")]
    Keychain(#[from] KeychainError),
}

impl PullSecretsError {
    /// Whether this is a record-not-found error, which keychain construction skips
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SecretNotFound { .. } | Self::ServiceAccountNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PullSecretsError>;
