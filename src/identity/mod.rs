//! Anonymous Identity
//!
//! Assigns a persistent anonymous identifier to the current storage scope.
//!
//! - **store**: Local key-value storage (file-backed or in-memory)
//! - **anon**: Identifier generation and resolution
//! - **error**: Error types

mod anon;
mod error;
mod store;

pub use anon::{forget_identity, resolve_identity, AnonymousId, ANON_PREFIX, SUFFIX_LEN};
pub use error::{StoreError, StoreResult};
pub use store::{FileStore, KeyValueStore, MemoryStore, STORE_FILE_NAME};
