use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// The flat field map stored under one key. All values are strings:
/// timestamps as decimal millis, booleans as `"true"`/`"false"`.
pub type Fields = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Generic keyed-record store: per-key field read/write plus prefix
/// enumeration. Any backend with those three operations satisfies the
/// contract; the service layer only ever sees this trait.
///
/// Consistency is last-writer-wins per field. There are no transactions
/// across keys and no optimistic concurrency token — concurrent
/// read-modify-write sequences against the same key can interleave, and
/// that race is accepted rather than fixed.
pub trait KeyValueStore: Send + Sync {
    /// Merge `fields` into the record stored under `key`, creating the
    /// record if absent. Fields not named are left untouched.
    fn put(&self, key: &str, fields: Fields) -> Result<(), StoreError>;

    /// Read a single field of the record under `key`.
    fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Enumerate every key starting with `prefix`, in key order.
    fn scan_keys(&self, prefix: &str) -> Result<BTreeSet<String>, StoreError>;
}
