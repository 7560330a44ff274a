//! Tick cadence.
//!
//! Both schedulers wait roughly one period per tick, best effort, and never
//! try to catch up after an overrun. [`RateLimiter`] keeps a fixed phase on a
//! [`Clock`] and so stalls while that clock is paused; [`PlainSleep`] always
//! sleeps on the process monotonic timer and keeps ticking regardless.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::clock::Clock;

#[async_trait]
pub trait TickScheduler: Send {
    async fn wait_next_tick(&mut self);

    fn period(&self) -> Duration;
}

/// Sleep a full period after every tick.
#[derive(Debug, Clone)]
pub struct PlainSleep {
    period: Duration,
}

impl PlainSleep {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl TickScheduler for PlainSleep {
    async fn wait_next_tick(&mut self) {
        tokio::time::sleep(self.period).await;
    }

    fn period(&self) -> Duration {
        self.period
    }
}

/// Wake at fixed multiples of the period on the given clock.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    period: Duration,
    cycle_start: Duration,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>, period: Duration) -> Self {
        let cycle_start = clock.now();
        Self { clock, period, cycle_start }
    }
}

#[async_trait]
impl TickScheduler for RateLimiter {
    async fn wait_next_tick(&mut self) {
        let deadline = self.cycle_start + self.period;
        let now = self.clock.now();
        if now >= deadline {
            // Overran: start the next cycle from here rather than bursting.
            self.cycle_start = now;
            tokio::task::yield_now().await;
            return;
        }
        self.clock.sleep_until(deadline).await;
        self.cycle_start = deadline;
    }

    fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::clock::ManualClock;

    #[tokio::test]
    async fn test_rate_limiter_waits_for_clock() {
        let clock = Arc::new(ManualClock::new());
        let mut limiter = RateLimiter::new(clock.clone(), Duration::from_secs(1));

        let waiter = tokio::spawn(async move {
            limiter.wait_next_tick().await;
            limiter
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        clock.advance(Duration::from_secs(1));
        let limiter = tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert_eq!(limiter.cycle_start, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_rate_limiter_does_not_catch_up() {
        let clock = Arc::new(ManualClock::new());
        let mut limiter = RateLimiter::new(clock.clone(), Duration::from_secs(1));

        clock.advance(Duration::from_millis(3500));
        limiter.wait_next_tick().await;
        assert_eq!(limiter.cycle_start, Duration::from_millis(3500));

        // Next deadline is a full period after the overrun, not an immediate burst.
        let waiter = tokio::spawn(async move { limiter.wait_next_tick().await });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        clock.advance(Duration::from_secs(1));
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_plain_sleep_completes_after_period() {
        let mut sleep = PlainSleep::new(Duration::from_millis(10));

        tokio::time::timeout(Duration::from_secs(1), sleep.wait_next_tick()).await.unwrap();
        assert_eq!(sleep.period(), Duration::from_millis(10));
    }
}
