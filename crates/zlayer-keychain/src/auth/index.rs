//! Credential index: one parsed credential-config document
//!
//! Matching picks the most specific entry for a target:
//!
//! 1. among entries whose host matches and whose path is a segment prefix of
//!    the target's path, the longest path wins;
//! 2. registry-wide entries (empty path) are the least specific and apply to
//!    every repository on their host;
//! 3. at equal path length an exact host beats a wildcard host, and further
//!    ties go to the entry that came first in the document.

use tracing::trace;

use super::credential::Credential;
use super::docker_config;
use super::normalize::MatchKey;
use super::target::Target;
use crate::error::Result;

/// A `(MatchKey, Credential)` pair from a parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    key: MatchKey,
    credential: Credential,
}

impl CredentialEntry {
    /// Create an entry
    pub fn new(key: MatchKey, credential: Credential) -> Self {
        Self { key, credential }
    }

    /// The normalized key this entry matches on
    pub fn key(&self) -> &MatchKey {
        &self.key
    }

    /// The credential this entry yields
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Read-only lookup index over one credential-config document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialIndex {
    entries: Vec<CredentialEntry>,
}

impl CredentialIndex {
    /// Build an index from already-parsed entries, keeping their order.
    pub fn from_entries(entries: Vec<CredentialEntry>) -> Self {
        Self { entries }
    }

    /// An index that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a `.dockercfg` document (bare map of registry key to credential).
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeychainError::MalformedConfig`] if the document or any
    /// of its entries cannot be decoded. No partial index is produced.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        docker_config::parse_dockercfg(bytes).map(Self::from_entries)
    }

    /// Parse a `.dockerconfigjson` document (`{"auths": {...}}`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::KeychainError::MalformedConfig`] if the document or any
    /// of its entries cannot be decoded.
    pub fn parse_config_json(bytes: &[u8]) -> Result<Self> {
        docker_config::parse_config_json(bytes).map(Self::from_entries)
    }

    /// Entries in document order
    pub fn entries(&self) -> &[CredentialEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the most specific credential for `target`.
    ///
    /// `None` means this index has nothing for the target; the caller should
    /// consult the next index rather than assume anonymous access.
    pub fn matches(&self, target: &Target) -> Option<&Credential> {
        self.best_entry(target.host(), target.path())
            .map(CredentialEntry::credential)
    }

    fn best_entry(&self, host: &str, path: &str) -> Option<&CredentialEntry> {
        let mut best: Option<(&CredentialEntry, (usize, bool))> = None;

        for entry in &self.entries {
            if !entry.key.covers(host, path) {
                continue;
            }
            let rank = (entry.key.path().len(), !entry.key.is_wildcard());
            trace!(key = %entry.key, ?rank, "candidate entry");

            // Strictly greater only, so the earliest entry keeps a tie
            if best.map_or(true, |(_, best_rank)| rank > best_rank) {
                best = Some((entry, rank));
            }
        }

        best.map(|(entry, _)| entry)
    }
}
