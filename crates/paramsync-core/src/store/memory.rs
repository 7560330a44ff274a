use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use paramsync_types::{ParamValue, StoreError};

use super::{validate_key, ParamStore};

/// In-process store. Counts successful writes so callers can observe
/// whether a sync pass touched it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, ParamValue>>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store without counting the seed values as writes.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ParamValue)>,
        K: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { entries: RwLock::new(entries), writes: AtomicU64::new(0) }
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> BTreeMap<String, ParamValue> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ParamStore for MemoryStore {
    fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<ParamValue, StoreError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { key: key.to_string() })
    }

    fn set(&self, key: &str, value: ParamValue) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries.write().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
