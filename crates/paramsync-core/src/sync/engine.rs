//! Event loop for one master.
//!
//! A single task alternates between one poll-broadcast pass and handling
//! inbound records until the next tick is due. After the bounded lifetime
//! (if any) runs out, the pass is skipped but inbound handling continues.

use std::sync::Arc;
use tracing::{debug, info, warn};

use paramsync_types::{ChannelError, ConfigError, EncodedRecord, SyncConfig};

use super::clock::Clock;
use super::lifecycle::{Lifecycle, LifecycleState};
use super::schedule::{PlainSleep, RateLimiter, TickScheduler};
use super::{AdmissionFilter, ApplyOutcome, SyncContext, TickReport};
use crate::store::ParamStore;
use crate::transport::ParamChannel;

pub struct SyncEngine {
    ctx: Arc<SyncContext>,
    scheduler: Box<dyn TickScheduler>,
    clock: Arc<dyn Clock>,
    lifecycle: Lifecycle,
}

impl SyncEngine {
    pub fn new(
        ctx: Arc<SyncContext>,
        scheduler: Box<dyn TickScheduler>,
        clock: Arc<dyn Clock>,
        lifetime: Option<std::time::Duration>,
    ) -> Self {
        let lifecycle = Lifecycle::new(clock.now(), lifetime);
        Self { ctx, scheduler, clock, lifecycle }
    }

    /// Validate `config`, compile its filter and pick the scheduler it asks for.
    pub fn from_config(
        config: &SyncConfig,
        store: Arc<dyn ParamStore>,
        channel: Arc<dyn ParamChannel>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = AdmissionFilter::from_config(config)?;
        let period = config.tick_period();
        let scheduler: Box<dyn TickScheduler> = if config.use_alternate_timer {
            Box::new(PlainSleep::new(period))
        } else {
            Box::new(RateLimiter::new(clock.clone(), period))
        };
        let ctx = Arc::new(SyncContext::new(filter, store, channel));
        Ok(Self::new(ctx, scheduler, clock, config.lifetime()))
    }

    pub fn context(&self) -> &Arc<SyncContext> {
        &self.ctx
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// One poll-broadcast pass, or nothing once listen-only.
    pub async fn tick(&mut self) -> Result<TickReport, ChannelError> {
        if !self.lifecycle.is_broadcasting() {
            return Ok(TickReport::default());
        }
        self.ctx.poll_and_broadcast().await
    }

    /// Evaluate the bounded lifetime against the engine clock.
    pub fn check_lifecycle(&mut self) -> LifecycleState {
        if self.lifecycle.observe(self.clock.now()) {
            info!("Finished polling, now listen-only");
        }
        self.lifecycle.state()
    }

    pub fn handle_record(&self, record: &EncodedRecord) -> ApplyOutcome {
        self.ctx.apply_record(record)
    }

    /// Run until the inbound channel closes while listen-only.
    ///
    /// Publish failures abort only the current tick.
    pub async fn run(mut self) -> Result<(), ChannelError> {
        let mut inbound = self.ctx.channel().subscribe().await?;
        let mut inbound_open = true;

        info!(
            "Sync loop started (period {:?}, filter: {} allow / {} deny)",
            self.scheduler.period(),
            self.ctx.filter().allow_patterns().len(),
            self.ctx.filter().deny_patterns().len()
        );

        loop {
            match self.tick().await {
                Ok(report) if report.published > 0 || report.skipped > 0 => debug!(
                    "Tick: {} published, {} filtered, {} skipped",
                    report.published, report.filtered, report.skipped
                ),
                Ok(_) => {}
                Err(e) => warn!("Tick aborted: {}", e),
            }

            {
                // A failing subscription is not polled again until the next tick.
                let mut listening = inbound_open;
                let next_tick = self.scheduler.wait_next_tick();
                tokio::pin!(next_tick);
                loop {
                    tokio::select! {
                        _ = &mut next_tick => break,
                        received = inbound.recv(), if listening => match received {
                            Ok(Some(record)) => {
                                self.ctx.apply_record(&record);
                            }
                            Ok(None) => {
                                info!("Inbound channel closed");
                                inbound_open = false;
                                listening = false;
                            }
                            Err(e @ ChannelError::Lagged { .. }) => warn!("Inbound channel: {}", e),
                            Err(e) => {
                                warn!("Inbound channel error, pausing until next tick: {}", e);
                                listening = false;
                            }
                        },
                    }
                }
            }

            if self.check_lifecycle() == LifecycleState::ListenOnly && !inbound_open {
                info!("Nothing left to do, sync loop exiting");
                return Ok(());
            }
        }
    }
}
