//! Registry authentication module
//!
//! This module resolves registry credentials from docker credential-config
//! documents: parsing them into credential indexes, matching targets by
//! specificity, and combining several sources with first-source-wins
//! precedence.

pub mod credential;
pub mod docker_config;
pub mod index;
pub mod normalize;
pub mod resolver;
pub mod target;

pub use credential::{Authenticator, Credential};
pub use index::{CredentialEntry, CredentialIndex};
pub use normalize::{MatchKey, DEFAULT_REGISTRY};
pub use resolver::{DocumentFormat, Keychain, KeychainResolver, KeychainResolverBuilder};
pub use target::Target;
