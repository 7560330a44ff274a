use tracing::{debug, warn};

use paramsync_types::EncodedRecord;

use super::seen::Novelty;
use super::{codec, SyncContext};

/// What the receive path did with one inbound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Novel value written to the local store
    Applied,
    /// Same payload already applied; store untouched
    Duplicate,
    /// Key not admitted by the filter
    Filtered,
    /// Payload did not decode; dropped
    Malformed,
    /// Store refused the write; will be retried by a later broadcast
    Rejected,
}

impl SyncContext {
    pub fn apply_record(&self, record: &EncodedRecord) -> ApplyOutcome {
        let key = record.key.as_str();

        if !self.filter.admitted(key) {
            debug!("Ignoring filtered key {}", key);
            return ApplyOutcome::Filtered;
        }
        if self.seen.is_current(key, &record.payload) {
            return ApplyOutcome::Duplicate;
        }

        let value = match codec::decode(&record.payload) {
            Ok(value) => value,
            Err(e) => {
                debug!("Dropping {}: {}", key, e);
                return ApplyOutcome::Malformed;
            }
        };

        match self.seen.apply_if_novel(key, &record.payload, || self.store.set(key, value)) {
            Novelty::Applied => {
                debug!("Synchronising parameter [{}]", key);
                ApplyOutcome::Applied
            }
            Novelty::Duplicate => ApplyOutcome::Duplicate,
            Novelty::Failed(e) => {
                warn!("Local store rejected {}: {}", key, e);
                ApplyOutcome::Rejected
            }
        }
    }
}
