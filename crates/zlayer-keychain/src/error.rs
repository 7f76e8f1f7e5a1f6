//! Error types for the keychain
//!
//! Only parsing can fail. Resolution itself never errors: a target with no
//! applicable credentials resolves to the fallback authenticator.

use thiserror::Error;

/// Keychain error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeychainError {
    /// A credential-config document (or one of its entries) could not be decoded
    #[error("malformed credential config: {reason}")]
    MalformedConfig { reason: String },

    /// An image or registry reference could not be parsed into a target
    #[error("invalid reference {reference:?}: {reason}")]
    InvalidReference { reference: String, reason: String },
}

impl KeychainError {
    /// Create a malformed config error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid reference error
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for keychain operations
pub type Result<T, E = KeychainError> = std::result::Result<T, E>;

/// Convenience alias for the keychain error type
pub use KeychainError as Error;
