//! Allow/deny admission policy.
//!
//! A key takes part in synchronization unless it matches the deny list,
//! and an allow-list match overrides a deny match:
//!
//! ```text
//! admitted = !matches_any(deny, key) || matches_any(allow, key)
//! ```

use paramsync_types::{ConfigError, SyncConfig};
use tracing::trace;

use super::pattern::Pattern;

#[derive(Debug, Clone, Default)]
pub struct AdmissionFilter {
    allow: Vec<Pattern>,
    deny: Vec<Pattern>,
}

impl AdmissionFilter {
    /// Compile both lists. The first pattern that fails to compile is reported.
    pub fn new(allow: &[String], deny: &[String]) -> Result<Self, ConfigError> {
        Ok(Self { allow: compile_list("allow_list", allow)?, deny: compile_list("deny_list", deny)? })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Self::new(&config.allow_list, &config.deny_list)
    }

    pub fn admitted(&self, key: &str) -> bool {
        let denied = self.is_denied(key);
        let admitted = !denied || self.is_allowed(key);
        trace!(key = %key, denied, admitted, "Admission check");
        admitted
    }

    pub fn is_denied(&self, key: &str) -> bool {
        self.deny.iter().any(|p| p.matches(key))
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.allow.iter().any(|p| p.matches(key))
    }

    pub fn allow_patterns(&self) -> &[Pattern] {
        &self.allow
    }

    pub fn deny_patterns(&self) -> &[Pattern] {
        &self.deny
    }
}

fn compile_list(list: &str, sources: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    sources
        .iter()
        .map(|source| {
            Pattern::compile(source).map_err(|e| ConfigError::InvalidPattern {
                list: list.to_string(),
                pattern: source.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}
