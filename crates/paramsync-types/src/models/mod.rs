//! Core domain models for paramsync.
//!
//! This module contains the data structures exchanged between the engine,
//! the stores and the transports.

mod config;
mod record;
mod value;


// Re-export all models
pub use config::{SyncConfig, TransportConfig, DEFAULT_MULTICAST_GROUP, DEFAULT_MULTICAST_PORT};
pub use record::EncodedRecord;
pub use value::ParamValue;
