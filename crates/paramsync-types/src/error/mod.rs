//! Typed error definitions for paramsync.
//!
//! Each failure class of the sync protocol has its own enum so callers can
//! apply the right recovery policy:
//!
//! - [`ConfigError`] is fatal at startup
//! - [`DecodeError`] drops the offending message
//! - [`StoreError`] skips the affected key
//! - [`ChannelError`] aborts the current tick only

mod channel;
mod codec;
mod config;
mod store;

pub use channel::ChannelError;
pub use codec::{DecodeError, EncodeError};
pub use config::ConfigError;
pub use store::StoreError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum SyncError {
    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Wraps a value encoding error
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Wraps a payload decoding error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Wraps a local store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Wraps a publish/subscribe error
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Standard Result type using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;
