//! ZLayer Keychain
//!
//! Resolves registry credentials for a target registry or repository from
//! docker credential-config documents (the payload of image pull secrets).
//!
//! Everything here is a pure, synchronous lookup over already-fetched bytes:
//! indexes and resolvers are immutable after construction and can be shared
//! across threads freely.
//!
//! ```
//! use zlayer_keychain::{Authenticator, CredentialIndex, KeychainResolver, Target};
//!
//! let index = CredentialIndex::parse(br#"{"r.io": {"username": "u", "password": "p"}}"#)?;
//! let resolver = KeychainResolver::new(vec![index.into()], Authenticator::Anonymous);
//!
//! assert_eq!(
//!     resolver.resolve(&Target::parse("r.io/ns/img:latest")?),
//!     Authenticator::basic("u", "p"),
//! );
//! # Ok::<(), zlayer_keychain::KeychainError>(())
//! ```

pub mod auth;
pub mod error;

pub use auth::*;
pub use error::*;
