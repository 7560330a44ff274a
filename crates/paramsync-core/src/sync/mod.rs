//! Convergence protocol.
//!
//! ```text
//! tick:    store.list_keys ─► filter ─► encode ─► seen.record ─► channel.publish
//! inbound: channel.recv ─► filter ─► seen check ─► decode ─► store.set + seen update
//! ```
//!
//! Both paths share one [`SyncContext`]; [`SyncEngine`] drives them.

mod apply;
pub mod clock;
pub mod codec;
mod engine;
mod filter;
mod lifecycle;
mod pattern;
mod poll;
pub mod schedule;
mod seen;


pub use apply::ApplyOutcome;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::SyncEngine;
pub use filter::AdmissionFilter;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use pattern::Pattern;
pub use poll::TickReport;
pub use schedule::{PlainSleep, RateLimiter, TickScheduler};
pub use seen::{Novelty, SeenSet};

use std::sync::Arc;

use crate::store::ParamStore;
use crate::transport::ParamChannel;

/// State shared by the poll and apply paths of one master.
pub struct SyncContext {
    filter: AdmissionFilter,
    seen: SeenSet,
    store: Arc<dyn ParamStore>,
    channel: Arc<dyn ParamChannel>,
}

impl SyncContext {
    pub fn new(
        filter: AdmissionFilter,
        store: Arc<dyn ParamStore>,
        channel: Arc<dyn ParamChannel>,
    ) -> Self {
        Self { filter, seen: SeenSet::new(), store, channel }
    }

    pub fn filter(&self) -> &AdmissionFilter {
        &self.filter
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn store(&self) -> &Arc<dyn ParamStore> {
        &self.store
    }

    pub fn channel(&self) -> &Arc<dyn ParamChannel> {
        &self.channel
    }
}
