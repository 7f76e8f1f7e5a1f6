//! Credentials and the authenticators they resolve to
//!
//! Secret material is held in [`SecretString`] and never shows up in `Debug`
//! output.

use std::fmt;

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// A credential parsed out of a config entry. Immutable once built.
#[derive(Clone)]
pub enum Credential {
    /// HTTP Basic username and password
    Basic {
        username: String,
        password: SecretString,
    },

    /// Pre-encoded bearer value (registry token, or an `auth` field that did
    /// not decode to `user:pass`)
    Bearer(SecretString),
}

impl Credential {
    /// Create a basic credential
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create a bearer credential
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(SecretString::from(token.into()))
    }

    /// Username, if this is a basic credential
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Basic { username, .. } => Some(username),
            Self::Bearer(_) => None,
        }
    }

    /// Render the HTTP `Authorization` header value.
    pub fn authorization(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let raw = format!("{username}:{}", password.expose_secret());
                format!(
                    "Basic {}",
                    base64::engine::general_purpose::STANDARD.encode(raw)
                )
            }
            Self::Bearer(token) => format!("Bearer {}", token.expose_secret()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer(_) => f.write_str("Bearer([REDACTED])"),
        }
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.authorization() == other.authorization()
    }
}

impl Eq for Credential {}

/// Result of resolving a target: how to authenticate to the registry.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Authenticator {
    /// No authentication
    #[default]
    Anonymous,

    /// Authenticate with a resolved credential
    Credential(Credential),
}

impl Authenticator {
    /// Create a basic authenticator
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credential(Credential::basic(username, password))
    }

    /// Create a bearer authenticator
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Credential(Credential::bearer(token))
    }

    /// Whether this is the anonymous authenticator
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The credential to authenticate with, if any
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Anonymous => None,
            Self::Credential(credential) => Some(credential),
        }
    }

    /// Render the HTTP `Authorization` header value.
    ///
    /// Returns `None` for anonymous access.
    pub fn authorization(&self) -> Option<String> {
        self.credential().map(Credential::authorization)
    }
}

impl From<&Credential> for Authenticator {
    fn from(credential: &Credential) -> Self {
        Self::Credential(credential.clone())
    }
}

impl From<Credential> for Authenticator {
    fn from(credential: Credential) -> Self {
        Self::Credential(credential)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Credential(credential) => fmt::Debug::fmt(credential, f),
        }
    }
}

#[cfg(feature = "oci")]
impl From<Authenticator> for oci_client::secrets::RegistryAuth {
    fn from(auth: Authenticator) -> Self {
        match auth {
            Authenticator::Anonymous => Self::Anonymous,
            Authenticator::Credential(Credential::Basic { username, password }) => {
                Self::Basic(username, password.expose_secret().to_string())
            }
            Authenticator::Credential(Credential::Bearer(token)) => {
                Self::Bearer(token.expose_secret().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        // "foo:bar"
        let auth = Authenticator::basic("foo", "bar");
        assert_eq!(auth.authorization().as_deref(), Some("Basic Zm9vOmJhcg=="));
    }

    #[test]
    fn test_bearer_authorization() {
        let auth = Authenticator::bearer("tok3n");
        assert_eq!(auth.authorization().as_deref(), Some("Bearer tok3n"));
    }

    #[test]
    fn test_anonymous() {
        let auth = Authenticator::default();
        assert!(auth.is_anonymous());
        assert!(auth.credential().is_none());
        assert_eq!(auth.authorization(), None);
        assert_eq!(auth, Authenticator::Anonymous);
    }

    #[test]
    fn test_equality_compares_secrets() {
        assert_eq!(Authenticator::basic("u", "p"), Authenticator::basic("u", "p"));
        assert_ne!(Authenticator::basic("u", "p"), Authenticator::basic("u", "q"));
        assert_ne!(Authenticator::basic("u", "p"), Authenticator::Anonymous);
        assert_ne!(Authenticator::bearer("t"), Authenticator::basic("t", ""));
        assert_eq!(Credential::bearer("t"), Credential::bearer("t"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::basic("user", "hunter2");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));

        let auth = Authenticator::bearer("sekrit");
        assert!(!format!("{auth:?}").contains("sekrit"));
        assert_eq!(format!("{:?}", Authenticator::Anonymous), "Anonymous");
    }

    #[test]
    fn test_from_credential() {
        let credential = Credential::basic("u", "p");
        assert_eq!(credential.username(), Some("u"));
        assert_eq!(Authenticator::from(&credential), Authenticator::basic("u", "p"));
        assert_eq!(
            Authenticator::from(Credential::bearer("t")),
            Authenticator::bearer("t")
        );
        assert_eq!(
            Authenticator::basic("u", "p").credential(),
            Some(&credential)
        );
    }

    #[cfg(feature = "oci")]
    #[test]
    fn test_into_registry_auth() {
        use oci_client::secrets::RegistryAuth;

        assert!(matches!(
            RegistryAuth::from(Authenticator::Anonymous),
            RegistryAuth::Anonymous
        ));

        match RegistryAuth::from(Authenticator::basic("u", "p")) {
            RegistryAuth::Basic(username, password) => {
                assert_eq!(username, "u");
                assert_eq!(password, "p");
            }
            _ => panic!("Expected Basic auth"),
        }

        match RegistryAuth::from(Authenticator::bearer("t")) {
            RegistryAuth::Bearer(token) => assert_eq!(token, "t"),
            _ => panic!("Expected Bearer auth"),
        }
    }
}
