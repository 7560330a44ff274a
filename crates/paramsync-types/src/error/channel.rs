//! Publish/subscribe channel errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the broadcast transport.
///
/// A publish failure aborts the current tick; the next tick re-broadcasts
/// everything, so nothing is retried here.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ChannelError {
    /// Socket-level failure
    #[error("Channel IO error: {message}")]
    Io {
        /// Description of the IO failure
        message: String,
    },

    /// Record does not fit in a single datagram
    #[error("Record for {key} is {size} bytes, limit is {limit}")]
    Oversized {
        /// Key of the rejected record
        key: String,
        /// Serialized size in bytes
        size: usize,
        /// Transport limit in bytes
        limit: usize,
    },

    /// Subscriber fell behind and messages were discarded
    #[error("Subscriber lagged, {skipped} records dropped")]
    Lagged {
        /// Number of records lost
        skipped: u64,
    },

    /// Record could not be serialized for the wire
    #[error("Channel serialization error: {message}")]
    Serialize {
        /// Serializer diagnostic
        message: String,
    },
}

impl ChannelError {
    /// Create an IO error from a std IO error.
    pub fn from_io_error(e: &std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}
