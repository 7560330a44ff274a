use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use paramsync_types::{ChannelError, EncodedRecord};

use super::{ParamChannel, RecordSubscription};

/// Per-subscriber queue depth.
pub const LOCAL_BUS_CAPACITY: usize = 100;

/// In-process broadcast bus. Clones share the same topic, so several
/// masters in one process (or one test) can talk to each other.
#[derive(Debug, Clone)]
pub struct LocalBus {
    sender: broadcast::Sender<EncodedRecord>,
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalBus {
    pub fn new() -> Self {
        Self::with_capacity(LOCAL_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl ParamChannel for LocalBus {
    async fn publish(&self, record: &EncodedRecord) -> Result<(), ChannelError> {
        if self.sender.send(record.clone()).is_err() {
            trace!(key = %record.key, "No subscribers, record dropped");
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn RecordSubscription>, ChannelError> {
        Ok(Box::new(LocalSubscription { receiver: self.sender.subscribe() }))
    }
}

struct LocalSubscription {
    receiver: broadcast::Receiver<EncodedRecord>,
}

#[async_trait]
impl RecordSubscription for LocalSubscription {
    async fn recv(&mut self) -> Result<Option<EncodedRecord>, ChannelError> {
        match self.receiver.recv().await {
            Ok(record) => Ok(Some(record)),
            Err(broadcast::error::RecvError::Closed) => Ok(None),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                Err(ChannelError::Lagged { skipped })
            }
        }
    }
}
