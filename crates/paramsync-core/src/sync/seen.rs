//! Per-process record of the last encoding applied for each key.
//!
//! This is what breaks the echo loop: a master that hears its own broadcast,
//! or the same converged value from every peer on every tick, finds the
//! payload already recorded and skips the store write. Entries are never
//! removed.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct SeenSet {
    entries: DashMap<String, String>,
}

/// Result of [`SeenSet::apply_if_novel`].
#[derive(Debug, PartialEq, Eq)]
pub enum Novelty<E> {
    /// The recorded payload already matches; nothing was done
    Duplicate,
    /// The write succeeded and the payload is now recorded
    Applied,
    /// The write failed; the recorded payload is unchanged
    Failed(E),
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// True when `encoded` is exactly what was last recorded for `key`.
    pub fn is_current(&self, key: &str, encoded: &str) -> bool {
        self.entries.get(key).is_some_and(|v| v.value() == encoded)
    }

    /// Record a locally observed encoding. Returns `true` if it changed.
    pub fn record(&self, key: &str, encoded: &str) -> bool {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) if entry.get() == encoded => false,
            Entry::Occupied(mut entry) => {
                entry.insert(encoded.to_string());
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(encoded.to_string());
                true
            }
        }
    }

    /// Run `apply` unless `encoded` is already recorded for `key`.
    ///
    /// The key's entry stays locked from the novelty check until the record
    /// is updated, so concurrent appliers of the same key are serialized.
    /// `apply` must not touch this set.
    pub fn apply_if_novel<E, F>(&self, key: &str, encoded: &str, apply: F) -> Novelty<E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) if entry.get() == encoded => Novelty::Duplicate,
            Entry::Occupied(mut entry) => match apply() {
                Ok(()) => {
                    entry.insert(encoded.to_string());
                    Novelty::Applied
                }
                Err(e) => Novelty::Failed(e),
            },
            Entry::Vacant(entry) => match apply() {
                Ok(()) => {
                    entry.insert(encoded.to_string());
                    Novelty::Applied
                }
                Err(e) => Novelty::Failed(e),
            },
        }
    }
}
