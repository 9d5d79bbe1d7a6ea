use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Opaque canonical key of a network identity, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for IdentityKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A network identity as returned by the identity lookup calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Identity {
    #[getset(get = "pub")]
    display_name: String,

    #[getset(get = "pub")]
    canonical_key: IdentityKey,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, canonical_key: impl Into<IdentityKey>) -> Self {
        Self {
            display_name: display_name.into(),
            canonical_key: canonical_key.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.canonical_key)
    }
}

/// An identity resolved during setup, shared read-only by every iteration.
pub type ResolvedIdentity = Arc<Identity>;
