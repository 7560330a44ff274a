use tracing::{debug, warn};

use paramsync_types::{ChannelError, EncodedRecord};

use super::{codec, SyncContext};

/// What one poll-broadcast pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub published: usize,
    pub filtered: usize,
    pub skipped: usize,
}

impl SyncContext {
    /// Publish every admitted key in the local store, changed or not.
    ///
    /// Re-sending unchanged values is what recovers from lost datagrams; the
    /// receivers' seen-sets keep it from turning into store writes. A record
    /// the channel cannot carry is skipped; a socket failure aborts the rest
    /// of the pass.
    pub async fn poll_and_broadcast(&self) -> Result<TickReport, ChannelError> {
        let mut report = TickReport::default();

        let keys = match self.store.list_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Could not enumerate local parameters: {}", e);
                return Ok(report);
            }
        };

        for key in keys {
            if !self.filter.admitted(&key) {
                debug!("Not publishing filtered key {}", key);
                report.filtered += 1;
                continue;
            }

            let value = match self.store.get(&key) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping {}: {}", key, e);
                    report.skipped += 1;
                    continue;
                }
            };
            let payload = match codec::encode(&value) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Skipping {}: {}", key, e);
                    report.skipped += 1;
                    continue;
                }
            };

            self.seen.record(&key, &payload);
            debug!("Publishing: {}", key);
            match self.channel.publish(&EncodedRecord { key, payload }).await {
                Ok(()) => report.published += 1,
                Err(e @ (ChannelError::Oversized { .. } | ChannelError::Serialize { .. })) => {
                    warn!("Skipping record: {}", e);
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}
