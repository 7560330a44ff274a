use serde::{Deserialize, Serialize};

/// The wire entity: one key and its encoded value.
///
/// This is the only thing ever published or received. Two records are
/// equal exactly when both key and payload bytes match, which is what the
/// receive side's novelty check relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedRecord {
    /// Hierarchical parameter name (e.g. "/robot/arm/gain")
    pub key: String,
    /// Transport-safe encoding of the value
    pub payload: String,
}

impl EncodedRecord {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { key: key.into(), payload: payload.into() }
    }
}
