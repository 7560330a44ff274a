//! # paramsync Types
//!
//! Core types, models, and error definitions for paramsync.
//!
//! This crate provides the foundational type system shared by the engine
//! and the daemon:
//!
//! - **`error`** - Typed error hierarchy for configuration, codec, store and channel failures
//! - **`models`** - Parameter values, wire records and the sync configuration
//!
//! ## Architecture Role
//!
//! `paramsync-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!      paramsync-types (this crate)
//!               │
//!               ▼
//!       paramsync-core
//!               │
//!               ▼
//!      paramsync-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ChannelError, ConfigError, DecodeError, EncodeError, Result, StoreError, SyncError};

// Re-export core model types
pub use models::{EncodedRecord, ParamValue, SyncConfig, TransportConfig};
