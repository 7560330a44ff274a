//! Sync daemon configuration.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default multicast group for the UDP channel.
pub const DEFAULT_MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 42, 99);
/// Default UDP port for the multicast channel.
pub const DEFAULT_MULTICAST_PORT: u16 = 7400;

/// Full sync configuration, fixed for the lifetime of the process.
///
/// Field aliases accept the parameter names used by older deployments
/// (`whitelist`, `blacklist`, `debug`, `use_cpp_time`, `rate`, `death_timer`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Patterns that override a deny match
    #[serde(default, alias = "whitelist")]
    pub allow_list: Vec<String>,
    /// Patterns that exclude keys from synchronization
    #[serde(default, alias = "blacklist")]
    pub deny_list: Vec<String>,
    /// Log per-key decisions at debug level
    #[serde(default, alias = "debug")]
    pub verbose: bool,
    /// Use a plain monotonic sleep instead of the clock-driven rate limiter
    #[serde(default, alias = "use_cpp_time")]
    pub use_alternate_timer: bool,
    /// Ticks per second
    #[serde(default = "default_tick_rate", alias = "rate")]
    pub tick_rate: f64,
    /// Seconds of broadcasting before switching to listen-only; `<= 0` disables
    #[serde(default = "default_max_lifetime", alias = "death_timer")]
    pub max_lifetime: f64,
    /// JSON file backing the local store; in-memory when absent
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Multicast channel settings
    #[serde(default)]
    pub transport: TransportConfig,
}

/// UDP multicast channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    #[serde(default = "default_group")]
    pub multicast_group: Ipv4Addr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Local interface address used to join the group
    #[serde(default = "default_interface")]
    pub interface: Ipv4Addr,
}

fn default_tick_rate() -> f64 {
    1.0
}

fn default_max_lifetime() -> f64 {
    -1.0
}

fn default_group() -> Ipv4Addr {
    DEFAULT_MULTICAST_GROUP
}

fn default_port() -> u16 {
    DEFAULT_MULTICAST_PORT
}

fn default_interface() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            multicast_group: default_group(),
            port: default_port(),
            interface: default_interface(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            deny_list: Vec::new(),
            verbose: false,
            use_alternate_timer: false,
            tick_rate: default_tick_rate(),
            max_lifetime: default_max_lifetime(),
            store_path: None,
            transport: TransportConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Check scalar fields. Pattern syntax is checked when the filter is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: "tick_rate".to_string(),
                message: format!("must be a positive number, got {}", self.tick_rate),
            });
        }
        if self.max_lifetime.is_nan() || self.max_lifetime == f64::INFINITY {
            return Err(ConfigError::ValidationError {
                field: "max_lifetime".to_string(),
                message: format!("must be finite, got {}", self.max_lifetime),
            });
        }
        if !self.transport.multicast_group.is_multicast() {
            return Err(ConfigError::ValidationError {
                field: "transport.multicast_group".to_string(),
                message: format!("{} is not a multicast address", self.transport.multicast_group),
            });
        }
        Ok(())
    }

    /// Nominal time between ticks (`1 / tick_rate`).
    ///
    /// Call [`validate`](Self::validate) first; a non-positive rate has no period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }

    /// Bounded broadcasting lifetime, or `None` when disabled.
    pub fn lifetime(&self) -> Option<Duration> {
        (self.max_lifetime > 0.0 && self.max_lifetime.is_finite())
            .then(|| Duration::from_secs_f64(self.max_lifetime))
    }
}
