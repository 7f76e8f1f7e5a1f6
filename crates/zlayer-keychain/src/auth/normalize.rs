//! Registry host and repository path normalization
//!
//! Configured keys and query targets are both passed through these functions
//! so that they compare in the same space: schemes stripped, hosts lowercased,
//! Docker Hub aliases collapsed onto [`DEFAULT_REGISTRY`], and paths reduced
//! to `/`-joined segments without leading or trailing separators.

use std::fmt;

use crate::error::{KeychainError, Result};

/// Registry host that unqualified image references (`nginx`, `library/nginx`)
/// resolve to.
pub const DEFAULT_REGISTRY: &str = "index.docker.io";

/// Hosts that all name the Docker Hub registry.
const DOCKER_HUB_ALIASES: &[&str] = &[DEFAULT_REGISTRY, "docker.io", "registry-1.docker.io"];

/// Legacy API version segments that docker login writes after the Hub host
/// (`https://index.docker.io/v1/`).
const VERSION_SEGMENTS: &[&str] = &["v1", "v2"];

const SCHEMES: &[&str] = &["https://", "http://"];

/// Strip an `http://` or `https://` prefix, case-insensitively.
pub fn strip_scheme(value: &str) -> &str {
    for scheme in SCHEMES {
        if value.len() >= scheme.len()
            && value.is_char_boundary(scheme.len())
            && value[..scheme.len()].eq_ignore_ascii_case(scheme)
        {
            return &value[scheme.len()..];
        }
    }
    value
}

/// Whether `host` names Docker Hub under any of its aliases.
pub fn is_docker_hub(host: &str) -> bool {
    DOCKER_HUB_ALIASES
        .iter()
        .any(|alias| host.eq_ignore_ascii_case(alias))
}

/// Lowercase a registry host and rewrite Docker Hub aliases to
/// [`DEFAULT_REGISTRY`].
pub fn normalize_host(host: &str) -> String {
    if is_docker_hub(host) {
        DEFAULT_REGISTRY.to_string()
    } else {
        host.to_ascii_lowercase()
    }
}

/// Drop empty segments so `/ns//img/` and `ns/img` compare equal.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `path` lies under `prefix`, on whole segments.
///
/// An empty prefix covers every path; `ns/im` does not cover `ns/img`.
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() || path == prefix {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Match a configured host against a target host.
///
/// Hosts compare exactly unless the configured host carries `*` wildcards, in
/// which case both are split on `.` and matched label by label; the label
/// counts must agree, so `*.r.io` matches `eu.r.io` but not `r.io` or
/// `a.eu.r.io`.
pub fn host_matches(pattern: &str, host: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == host;
    }

    let pattern_labels: Vec<&str> = pattern.split('.').collect();
    let host_labels: Vec<&str> = host.split('.').collect();
    pattern_labels.len() == host_labels.len()
        && pattern_labels
            .iter()
            .zip(&host_labels)
            .all(|(p, h)| wildcard_match(p, h))
}

fn wildcard_match(pattern: &str, value: &str) -> bool {
    let Some((literal, rest)) = pattern.split_once('*') else {
        return pattern == value;
    };
    let Some(remaining) = value.strip_prefix(literal) else {
        return false;
    };
    remaining
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(remaining.len()))
        .any(|i| wildcard_match(rest, &remaining[i..]))
}

/// A normalized `(registry-host, repository-path)` pair derived from a
/// credential-config key.
///
/// An empty `path` marks a registry-wide entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    host: String,
    path: String,
}

impl MatchKey {
    /// Decompose a config key such as `https://r.io/ns/` into a match key.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::MalformedConfig`] when the key has no host.
    pub fn parse(key: &str) -> Result<Self> {
        let stripped = strip_scheme(key.trim());
        let (host, path) = stripped.split_once('/').unwrap_or((stripped, ""));

        if host.is_empty() {
            return Err(KeychainError::malformed(format!(
                "entry {key:?} has an empty registry host"
            )));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(KeychainError::malformed(format!(
                "entry {key:?} has whitespace in its registry host"
            )));
        }

        let host = normalize_host(host);
        let mut path = normalize_path(path);
        if host == DEFAULT_REGISTRY && VERSION_SEGMENTS.contains(&path.as_str()) {
            path.clear();
        }

        Ok(Self { host, path })
    }

    /// Normalized registry host, possibly containing `*` wildcards.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Normalized repository path prefix; empty for registry-wide entries.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this key applies to every repository on its registry.
    pub fn is_registry_wide(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether this key's host is a wildcard pattern.
    pub fn is_wildcard(&self) -> bool {
        self.host.contains('*')
    }

    /// Whether this key covers the given normalized host and path.
    pub fn covers(&self, host: &str, path: &str) -> bool {
        host_matches(&self.host, host) && path_has_prefix(path, &self.path)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.host)
        } else {
            write!(f, "{}/{}", self.host, self.path)
        }
    }
}
