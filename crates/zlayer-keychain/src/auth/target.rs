//! Resolution targets: a bare registry or a repository on a registry
//!
//! Targets are normalized on construction with the same rules as configured
//! keys (see [`super::normalize`]).

use std::fmt;
use std::str::FromStr;

use super::normalize::{normalize_host, normalize_path, strip_scheme, DEFAULT_REGISTRY};
use crate::error::{KeychainError, Result};

/// Namespace Docker Hub puts single-component repositories in.
const OFFICIAL_NAMESPACE: &str = "library";

/// What credentials are being asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A registry host, e.g. `r.io` or `localhost:5000`
    Registry { host: String },

    /// A repository on a registry, e.g. `r.io` + `ns/img`
    Repository { host: String, path: String },
}

impl Target {
    /// Target a whole registry.
    ///
    /// Anything after the first `/` of `host` is taken as a repository path,
    /// so `r.io/ns` targets repository `ns` on `r.io`.
    pub fn registry(host: &str) -> Self {
        Self::repository(host, "")
    }

    /// Target a repository path on a registry. An empty path targets the
    /// registry itself.
    ///
    /// A path carried on `host` (`r.io/ns`) is prepended to `path`.
    pub fn repository(host: &str, path: &str) -> Self {
        let (host, prefix) = split_host(host);
        let path = normalize_path(&format!("{prefix}/{path}"));
        let host = normalize_host(host);
        if path.is_empty() {
            Self::Registry { host }
        } else {
            Self::Repository { host, path }
        }
    }

    /// Parse an image or registry reference.
    ///
    /// - `r.io`, `localhost:5000` → registry targets
    /// - `r.io/ns/img:tag`, `r.io/ns/img@sha256:...` → repository `ns/img` on `r.io`
    /// - `nginx`, `library/nginx`, `bitnami/redis` → repositories on [`DEFAULT_REGISTRY`],
    ///   with `library/` added to single-component names
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::InvalidReference`] for empty references, empty
    /// path components, or whitespace.
    pub fn parse(reference: &str) -> Result<Self> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(KeychainError::invalid_reference(
                reference,
                "empty reference",
            ));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(KeychainError::invalid_reference(
                reference,
                "reference contains whitespace",
            ));
        }

        let without_scheme = strip_scheme(trimmed).trim_end_matches('/');
        let without_digest = without_scheme
            .split_once('@')
            .map_or(without_scheme, |(name, _)| name);

        let components: Vec<&str> = without_digest.split('/').collect();
        if components.iter().any(|c| c.is_empty()) {
            return Err(KeychainError::invalid_reference(
                reference,
                "empty path component",
            ));
        }

        let (host, repo_components) = match components.as_slice() {
            [single] if names_registry(single) => return Ok(Self::registry(single)),
            [first, rest @ ..] if !rest.is_empty() && looks_like_host(first) => (*first, rest),
            all => (DEFAULT_REGISTRY, all),
        };

        let mut segments: Vec<&str> = repo_components.to_vec();
        if let Some(last) = segments.last_mut() {
            let current = *last;
            *last = current.split_once(':').map_or(current, |(name, _tag)| name);
            if last.is_empty() {
                return Err(KeychainError::invalid_reference(
                    reference,
                    "empty repository name",
                ));
            }
        }

        let host = normalize_host(host);
        if host == DEFAULT_REGISTRY && segments.len() == 1 {
            segments.insert(0, OFFICIAL_NAMESPACE);
        }

        Ok(Self::Repository {
            host,
            path: segments.join("/"),
        })
    }

    /// Normalized registry host
    pub fn host(&self) -> &str {
        match self {
            Self::Registry { host } | Self::Repository { host, .. } => host,
        }
    }

    /// Normalized repository path; empty for registry targets
    pub fn path(&self) -> &str {
        match self {
            Self::Registry { .. } => "",
            Self::Repository { path, .. } => path,
        }
    }

    /// The registry this target lives on
    #[must_use]
    pub fn to_registry(&self) -> Self {
        Self::Registry {
            host: self.host().to_string(),
        }
    }
}

/// Split a scheme-less `host[/path]` at the first `/`.
fn split_host(host: &str) -> (&str, &str) {
    let stripped = strip_scheme(host.trim());
    stripped.split_once('/').unwrap_or((stripped, ""))
}

/// Whether the first component of a multi-component reference is a host.
fn looks_like_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

/// Whether a lone component names a registry rather than an image.
///
/// `nginx:1.25` is an image with a tag; `r.io:5000` is a registry with a port.
fn names_registry(component: &str) -> bool {
    let name = component
        .split_once(':')
        .map_or(component, |(name, _)| name);
    name.contains('.') || name == "localhost"
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry { host } => f.write_str(host),
            Self::Repository { host, path } => write!(f, "{host}/{path}"),
        }
    }
}

impl FromStr for Target {
    type Err = KeychainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry() {
        assert_eq!(Target::parse("r.io").unwrap(), Target::registry("r.io"));
        assert_eq!(
            Target::parse("localhost:5000").unwrap(),
            Target::registry("localhost:5000")
        );
        assert_eq!(
            Target::parse("https://r.io/").unwrap(),
            Target::registry("r.io")
        );
        assert_eq!(Target::parse("docker.io").unwrap().host(), DEFAULT_REGISTRY);
    }

    #[test]
    fn test_parse_repository() {
        let target = Target::parse("ghcr.io/owner/repo:tag").unwrap();
        assert_eq!(target.host(), "ghcr.io");
        assert_eq!(target.path(), "owner/repo");

        let target = Target::parse("localhost:5000/image@sha256:abcd").unwrap();
        assert_eq!(target.host(), "localhost:5000");
        assert_eq!(target.path(), "image");

        let target = Target::parse("myregistry.com/path/to/image:v1.0").unwrap();
        assert_eq!(target.to_string(), "myregistry.com/path/to/image");
    }

    #[test]
    fn test_parse_docker_hub() {
        for reference in ["nginx", "nginx:1.25", "library/nginx", "docker.io/nginx"] {
            let target = Target::parse(reference).unwrap();
            assert_eq!(target.host(), DEFAULT_REGISTRY, "{reference}");
            assert_eq!(target.path(), "library/nginx", "{reference}");
        }

        let target = Target::parse("bitnami/redis").unwrap();
        assert_eq!(target.to_string(), "index.docker.io/bitnami/redis");
    }

    #[test]
    fn test_parse_invalid() {
        for reference in ["", "   ", "r.io//img", "r.io/ns/:tag", "r.io/a b"] {
            assert!(
                matches!(
                    Target::parse(reference),
                    Err(KeychainError::InvalidReference { .. })
                ),
                "{reference:?}"
            );
        }
    }

    #[test]
    fn test_constructors_normalize() {
        let target = Target::repository("https://R.IO", "/ns/img/");
        assert_eq!(target.host(), "r.io");
        assert_eq!(target.path(), "ns/img");
        assert_eq!(target.to_registry(), Target::registry("r.io"));

        assert_eq!(Target::repository("r.io", ""), Target::registry("r.io"));
        assert_eq!(Target::registry("registry-1.docker.io").host(), DEFAULT_REGISTRY);
    }

    #[test]
    fn test_host_with_path() {
        assert_eq!(Target::registry("r.io/ns"), Target::repository("r.io", "ns"));
        assert_eq!(Target::registry("https://r.io/ns/").host(), "r.io");

        let target = Target::repository("https://R.io/ns", "img");
        assert_eq!(target.host(), "r.io");
        assert_eq!(target.path(), "ns/img");

        assert_eq!(Target::registry("r.io/"), Target::registry("r.io"));
        assert_eq!(Target::repository("r.io/", "/img"), Target::repository("r.io", "img"));
    }

    #[test]
    fn test_from_str() {
        let target: Target = "r.io/ns/img".parse().unwrap();
        assert_eq!(target, Target::repository("r.io", "ns/img"));
    }
}
