//! Docker credential-config parser
//!
//! Decodes the two document shapes that registry pull secrets carry:
//!
//! - `.dockercfg`: a JSON object keyed by registry or repository URL
//! - `.dockerconfigjson`: the same object wrapped as `{"auths": {...}}`
//!
//! Each value holds either plaintext `username`/`password` fields, a base64
//! `auth` field encoding `username:password`, or a `registrytoken`. The value
//! shape is resolved once here into a [`Credential`]; matching never looks at
//! the raw JSON again.
//!
//! Parsing is all-or-nothing: one undecodable entry fails the whole document.
//! Entries with no credential fields at all (`{}`, as credential-store setups
//! write them) carry nothing to decode and are skipped.

use base64::Engine;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::credential::Credential;
use super::index::CredentialEntry;
use super::normalize::MatchKey;
use crate::error::{KeychainError, Result};

/// Raw credential value as it appears in the document
#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    /// Base64-encoded "username:password" (or an opaque token)
    #[serde(default)]
    auth: Option<String>,
    /// Plain username (alternative to auth field)
    #[serde(default)]
    username: Option<String>,
    /// Plain password (alternative to auth field)
    #[serde(default)]
    password: Option<String>,
    /// Bearer token issued by the registry
    #[serde(default, rename = "registrytoken")]
    registry_token: Option<String>,
}

/// The shape a value took, in precedence order
enum EntryValue {
    Encoded(String),
    Token(String),
    Plain { username: String, password: String },
}

/// `.dockerconfigjson` wrapper
#[derive(Debug, Deserialize)]
struct DockerConfigJson {
    #[serde(default)]
    auths: Map<String, Value>,
}

/// Parse a `.dockercfg` document: a bare map of registry key to credential.
///
/// # Errors
///
/// Returns [`KeychainError::MalformedConfig`] if the document is not a JSON
/// object or any entry is invalid.
pub fn parse_dockercfg(bytes: &[u8]) -> Result<Vec<CredentialEntry>> {
    let auths: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| KeychainError::malformed(format!("failed to parse document: {e}")))?;
    parse_auths(auths)
}

/// Parse a `.dockerconfigjson` document: `{"auths": {...}}`.
///
/// A document without an `auths` object yields no entries.
///
/// # Errors
///
/// Returns [`KeychainError::MalformedConfig`] if the document is not a JSON
/// object or any entry is invalid.
pub fn parse_config_json(bytes: &[u8]) -> Result<Vec<CredentialEntry>> {
    let config: DockerConfigJson = serde_json::from_slice(bytes)
        .map_err(|e| KeychainError::malformed(format!("failed to parse document: {e}")))?;
    parse_auths(config.auths)
}

fn parse_auths(auths: Map<String, Value>) -> Result<Vec<CredentialEntry>> {
    let mut entries = Vec::with_capacity(auths.len());
    for (key, value) in auths {
        let match_key = MatchKey::parse(&key)?;
        match parse_value(&key, value)? {
            Some(credential) => entries.push(CredentialEntry::new(match_key, credential)),
            None => debug!(entry = %key, "entry has no credential fields; skipping"),
        }
    }
    Ok(entries)
}

fn parse_value(key: &str, value: Value) -> Result<Option<Credential>> {
    let entry: AuthEntry = serde_json::from_value(value)
        .map_err(|e| KeychainError::malformed(format!("entry {key:?}: {e}")))?;

    match classify(entry) {
        Some(EntryValue::Encoded(auth)) => decode_auth(&auth)
            .map(Some)
            .map_err(|reason| KeychainError::malformed(format!("entry {key:?}: {reason}"))),
        Some(EntryValue::Token(token)) => Ok(Some(Credential::bearer(token))),
        Some(EntryValue::Plain { username, password }) => {
            Ok(Some(Credential::basic(username, password)))
        }
        None => Ok(None),
    }
}

fn classify(entry: AuthEntry) -> Option<EntryValue> {
    if let Some(auth) = entry.auth.filter(|a| !a.is_empty()) {
        return Some(EntryValue::Encoded(auth));
    }
    if let Some(token) = entry.registry_token.filter(|t| !t.is_empty()) {
        return Some(EntryValue::Token(token));
    }
    if entry.username.is_none() && entry.password.is_none() {
        return None;
    }
    Some(EntryValue::Plain {
        username: entry.username.unwrap_or_default(),
        password: entry.password.unwrap_or_default(),
    })
}

/// Decode a base64 `auth` field.
///
/// `user:pass` splits at the first colon, so passwords may contain colons.
/// A decoded value without a colon is kept whole as a bearer token.
fn decode_auth(auth: &str) -> std::result::Result<Credential, String> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(auth.trim())
        .map_err(|e| format!("auth field is not valid base64: {e}"))?;

    let decoded =
        String::from_utf8(decoded).map_err(|_| "auth field is not valid UTF-8".to_string())?;

    match decoded.split_once(':') {
        Some((username, password)) => Ok(Credential::basic(username, password)),
        None => Ok(Credential::bearer(decoded)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(entries: &[CredentialEntry]) -> Vec<(String, Credential)> {
        entries
            .iter()
            .map(|e| (e.key().to_string(), e.credential().clone()))
            .collect()
    }

    #[test]
    fn test_parse_dockercfg() {
        let document = r#"
        {
            "ghcr.io": {
                "auth": "dXNlcm5hbWU6cGFzc3dvcmQ="
            },
            "docker.io": {
                "username": "myuser",
                "password": "mypass",
                "email": "me@example.com"
            }
        }
        "#;

        let entries = parse_dockercfg(document.as_bytes()).unwrap();
        assert_eq!(
            creds(&entries),
            vec![
                ("ghcr.io".to_string(), Credential::basic("username", "password")),
                (
                    "index.docker.io".to_string(),
                    Credential::basic("myuser", "mypass")
                ),
            ]
        );
    }

    #[test]
    fn test_parse_config_json() {
        let document = r#"
        {
            "auths": {
                "https://ghcr.io": {"auth": "dXNlcm5hbWU6cGFzc3dvcmQ="},
                "https://index.docker.io/v1/": {"auth": "ZG9ja2VyOnBhc3M="}
            },
            "credsStore": "desktop"
        }
        "#;

        let entries = parse_config_json(document.as_bytes()).unwrap();
        assert_eq!(
            creds(&entries),
            vec![
                ("ghcr.io".to_string(), Credential::basic("username", "password")),
                ("index.docker.io".to_string(), Credential::basic("docker", "pass")),
            ]
        );

        assert!(parse_config_json(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_document_order_is_kept() {
        let document = r#"{"z.io": {"auth": "YTpi"}, "a.io": {"auth": "YTpi"}, "m.io": {"auth": "YTpi"}}"#;
        let keys: Vec<String> = parse_dockercfg(document.as_bytes())
            .unwrap()
            .iter()
            .map(|e| e.key().to_string())
            .collect();
        assert_eq!(keys, vec!["z.io", "a.io", "m.io"]);
    }

    #[test]
    fn test_decode_auth() {
        // "username:password"
        let credential = decode_auth("dXNlcm5hbWU6cGFzc3dvcmQ=").unwrap();
        assert_eq!(credential, Credential::basic("username", "password"));

        // "user:pa:ss" keeps everything after the first colon
        let credential = decode_auth("dXNlcjpwYTpzcw==").unwrap();
        assert_eq!(credential, Credential::basic("user", "pa:ss"));

        // "opaque-token" has no colon
        let credential = decode_auth("b3BhcXVlLXRva2Vu").unwrap();
        assert_eq!(credential, Credential::bearer("opaque-token"));
    }

    #[test]
    fn test_auth_takes_precedence() {
        let document = r#"{"r.io": {"auth": "dTpw", "username": "other", "password": "x"}}"#;
        let entries = parse_dockercfg(document.as_bytes()).unwrap();
        assert_eq!(entries[0].credential(), &Credential::basic("u", "p"));

        let document = r#"{"r.io": {"auth": "", "username": "other", "password": "x"}}"#;
        let entries = parse_dockercfg(document.as_bytes()).unwrap();
        assert_eq!(entries[0].credential(), &Credential::basic("other", "x"));
    }

    #[test]
    fn test_registry_token() {
        let document = r#"{"r.io": {"registrytoken": "abc"}}"#;
        let entries = parse_dockercfg(document.as_bytes()).unwrap();
        assert_eq!(entries[0].credential(), &Credential::bearer("abc"));
    }

    #[test]
    fn test_bad_auth_fails_whole_document() {
        let document = r#"{"good.io": {"auth": "dTpw"}, "bad.io": {"auth": "!!!not base64"}}"#;
        let err = parse_dockercfg(document.as_bytes()).unwrap_err();
        assert!(matches!(err, KeychainError::MalformedConfig { .. }));
        assert!(err.to_string().contains("bad.io"));
    }

    #[test]
    fn test_entries_without_credentials_are_skipped() {
        let document = r#"
        {
            "auths": {
                "https://index.docker.io/v1/": {},
                "quay.io": {"email": "me@example.com"},
                "ghcr.io": {"auth": "dTpw"}
            },
            "credsStore": "desktop"
        }
        "#;

        let entries = parse_config_json(document.as_bytes()).unwrap();
        assert_eq!(
            creds(&entries),
            vec![("ghcr.io".to_string(), Credential::basic("u", "p"))]
        );

        let entries = parse_dockercfg(br#"{"r.io": {}}"#).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        for document in [
            "",
            "not json",
            "[]",
            r#"{"r.io": "u:p"}"#,
            r#"{"": {"auth": "dTpw"}}"#,
            r#"{"https://": {"auth": "dTpw"}}"#,
            r#"{"r.io": {"auth": 42}}"#,
        ] {
            let result = parse_dockercfg(document.as_bytes());
            assert!(
                matches!(result, Err(KeychainError::MalformedConfig { .. })),
                "expected malformed for {document:?}"
            );
        }
    }
}
