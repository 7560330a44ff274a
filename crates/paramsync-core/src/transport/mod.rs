//! Broadcast channels carrying [`EncodedRecord`]s between masters.
//!
//! Every channel fans out to all subscribers, including the publisher's own
//! subscription; the receive side relies on the seen-set to ignore echoes.

mod local;
mod udp;

pub use local::{LocalBus, LOCAL_BUS_CAPACITY};
pub use udp::{UdpMulticast, MAX_DATAGRAM_BYTES};

use async_trait::async_trait;
use paramsync_types::{ChannelError, EncodedRecord};

#[async_trait]
pub trait ParamChannel: Send + Sync {
    /// Fire-and-forget publish. No acknowledgment, no retry.
    async fn publish(&self, record: &EncodedRecord) -> Result<(), ChannelError>;

    async fn subscribe(&self) -> Result<Box<dyn RecordSubscription>, ChannelError>;
}

#[async_trait]
pub trait RecordSubscription: Send {
    /// Next inbound record, or `None` once the channel is closed.
    ///
    /// Must be cancel-safe: the engine races it against the tick timer.
    async fn recv(&mut self) -> Result<Option<EncodedRecord>, ChannelError>;
}
