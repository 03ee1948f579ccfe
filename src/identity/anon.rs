//! Anonymous Identifier
//!
//! Client-generated identifiers of the form `anon_` followed by eight
//! lowercase base-36 characters, persisted once per storage scope.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::StoreResult;
use super::store::KeyValueStore;

/// Prefix of every generated identifier
pub const ANON_PREFIX: &str = "anon_";

/// Number of base-36 characters after the prefix
pub const SUFFIX_LEN: usize = 8;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Anonymous identifier for the current storage scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymousId(String);

impl AnonymousId {
    /// Generate a fresh identifier
    ///
    /// The suffix is drawn from the random bits of a v4 UUID. Collisions
    /// across storage scopes are possible and accepted.
    pub fn generate() -> Self {
        // Low half of a v4 UUID: top two bits are the variant, the rest random
        let (_, low) = uuid::Uuid::new_v4().as_u64_pair();
        Self::from_entropy(low & (u64::MAX >> 2))
    }

    fn from_entropy(mut bits: u64) -> Self {
        let mut id = String::with_capacity(ANON_PREFIX.len() + SUFFIX_LEN);
        id.push_str(ANON_PREFIX);
        for _ in 0..SUFFIX_LEN {
            id.push(BASE36[(bits % 36) as usize] as char);
            bits /= 36;
        }
        Self(id)
    }

    /// Whether a string has the generated shape
    pub fn is_well_formed(value: &str) -> bool {
        value
            .strip_prefix(ANON_PREFIX)
            .map(|suffix| {
                suffix.len() == SUFFIX_LEN
                    && suffix
                        .bytes()
                        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
            })
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnonymousId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read the persisted identifier, creating and persisting one if absent
///
/// A stored value is reused as-is even if it does not have the generated
/// shape; only an absent or empty value triggers generation.
pub fn resolve_identity(store: &dyn KeyValueStore, key: &str) -> StoreResult<AnonymousId> {
    if let Some(existing) = store.get(key)? {
        if !existing.is_empty() {
            tracing::debug!(user_id = %existing, "Reusing stored anonymous identifier");
            return Ok(AnonymousId(existing));
        }
    }

    let id = AnonymousId::generate();
    store.set(key, id.as_str())?;
    tracing::info!(user_id = %id, "Generated new anonymous identifier");
    Ok(id)
}

/// Drop the persisted identifier so the next resolve generates a new one
pub fn forget_identity(store: &dyn KeyValueStore, key: &str) -> StoreResult<()> {
    store.remove(key)?;
    tracing::info!(key, "Cleared stored anonymous identifier");
    Ok(())
}
