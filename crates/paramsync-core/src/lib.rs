//! # paramsync Core
//!
//! Keeps the local parameter stores of several independent masters
//! converged without shared storage: every tick each master publishes its
//! whole admitted key set, and every master applies whatever novel records
//! it hears back into its own store.
//!
//! ```text
//! paramsync-core/src/
//! ├── sync/        # filter, codec, seen-set, poll/apply, lifecycle, scheduling, engine
//! ├── store/       # ParamStore trait + memory and JSON-file backends
//! ├── transport/   # ParamChannel trait + in-process bus and UDP multicast
//! └── modules/     # config file loading
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp))]

pub mod modules;
pub mod store;
pub mod sync;
pub mod transport;

// Re-export commonly used types
pub use store::{FileStore, MemoryStore, ParamStore};
pub use sync::{
    AdmissionFilter, ApplyOutcome, Clock, LifecycleState, ManualClock, Pattern, SeenSet,
    SyncContext, SyncEngine, SystemClock, TickReport,
};
pub use transport::{LocalBus, ParamChannel, RecordSubscription, UdpMulticast};
