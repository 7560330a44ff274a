//! Value encoding/decoding errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an inbound payload is not a well-formed value tree.
///
/// Receivers drop the message and keep going.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum DecodeError {
    /// Payload is not a valid encoding
    #[error("Malformed payload: {message}")]
    Malformed {
        /// Parser diagnostic
        message: String,
    },
}

/// Raised when a local value cannot be represented on the wire.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum EncodeError {
    /// Serializer rejected the value
    #[error("Unencodable value: {message}")]
    Unencodable {
        /// Serializer diagnostic
        message: String,
    },

    /// A plain JSON document has no parameter equivalent
    #[error("Unsupported JSON value at {path}: {message}")]
    UnsupportedJson {
        /// JSON pointer to the offending node
        path: String,
        /// What was wrong with it
        message: String,
    },
}

impl DecodeError {
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::Malformed { message: e.to_string() }
    }
}

impl EncodeError {
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::Unencodable { message: e.to_string() }
    }
}
