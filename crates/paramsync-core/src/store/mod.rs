//! Local parameter stores.
//!
//! The engine only needs enumerate/get/set; anything that can do those three
//! can be kept in sync.

mod file;
mod memory;

#[cfg(test)]
mod tests;

pub use file::FileStore;
pub use memory::MemoryStore;

use paramsync_types::{ParamValue, StoreError};

/// Key/value backend owned by one master.
pub trait ParamStore: Send + Sync {
    /// Every key currently present, as a snapshot.
    fn list_keys(&self) -> Result<Vec<String>, StoreError>;

    fn get(&self, key: &str) -> Result<ParamValue, StoreError>;

    fn set(&self, key: &str, value: ParamValue) -> Result<(), StoreError>;
}

/// Keys are absolute, slash-separated names: `/`-prefixed, no empty
/// segments, no whitespace.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = key.len() > 1
        && key.starts_with('/')
        && !key.ends_with('/')
        && !key.contains("//")
        && !key.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey { key: key.to_string() })
    }
}
