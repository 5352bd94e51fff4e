use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use crate::store::{Fields, KeyValueStore, StoreError};

/// In-memory store: a field map per key behind one `RwLock`. The lock only
/// keeps individual calls safe; like every other backend, consecutive
/// calls from one caller can interleave with another writer's.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, fields: Fields) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.entry(key.to_string()).or_default().extend(fields);
        Ok(())
    }

    fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(key).and_then(|fields| fields.get(field)).cloned())
    }

    fn scan_keys(&self, prefix: &str) -> Result<BTreeSet<String>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
