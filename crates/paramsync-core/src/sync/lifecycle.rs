use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Broadcast state of a master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Polling and broadcasting every tick, applying inbound records
    Running,
    /// Broadcast suspended for good; inbound records are still applied
    ListenOnly,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::ListenOnly => f.write_str("listen-only"),
        }
    }
}

/// Bounded-lifetime controller.
///
/// With a lifetime configured, the first observation strictly past
/// `started_at + lifetime` moves the master to [`LifecycleState::ListenOnly`].
/// There is no way back.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    started_at: Duration,
    lifetime: Option<Duration>,
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new(started_at: Duration, lifetime: Option<Duration>) -> Self {
        Self { started_at, lifetime, state: LifecycleState::Running }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_broadcasting(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Check the clock. Returns `true` only on the tick the transition happens.
    pub fn observe(&mut self, now: Duration) -> bool {
        let Some(lifetime) = self.lifetime else {
            return false;
        };
        if self.state == LifecycleState::Running && now.saturating_sub(self.started_at) > lifetime {
            self.state = LifecycleState::ListenOnly;
            return true;
        }
        false
    }
}
