//! Local store errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a local parameter store.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// Key rejected by the store's naming rules
    #[error("Invalid key: {key:?}")]
    InvalidKey {
        /// The rejected key
        key: String,
    },

    /// Key is not present (e.g. deleted between enumeration and read)
    #[error("Key not found: {key}")]
    NotFound {
        /// The missing key
        key: String,
    },

    /// Backing file contents are not a parameter document
    #[error("Store file {path} is corrupt: {message}")]
    Corrupt {
        /// Path of the backing file
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// IO failure on the backing medium
    #[error("Store IO error: {message}")]
    Io {
        /// Description of the IO failure
        message: String,
    },
}

impl StoreError {
    /// Create an IO error from a std IO error.
    pub fn from_io_error(e: &std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}
