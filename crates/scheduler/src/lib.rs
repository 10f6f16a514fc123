pub mod tick;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tracing::info;

use common::LoopState;
use marketdata::BarSource;
use notify::Notifier;
use registry::WatchRegistry;

/// Drives the periodic evaluation of every active watch.
///
/// The loop alternates between `Idle` (waiting for the next tick) and
/// `Evaluating` (one pass over the active watch set). Ticks never overlap:
/// the next tick is not started until the previous pass has applied its
/// batch of removals. Watches added mid-tick are picked up on the next one,
/// since each pass works from a snapshot taken at tick start.
pub struct Scheduler {
    registry: Arc<RwLock<WatchRegistry>>,
    source: Arc<dyn BarSource>,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<LoopState>>,
    tick_interval: Duration,
    check_timeout: Duration,
    max_concurrent: usize,
}

impl Scheduler {
    pub fn new(
        registry: Arc<RwLock<WatchRegistry>>,
        source: Arc<dyn BarSource>,
        notifier: Arc<dyn Notifier>,
        tick_interval: Duration,
        check_timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            registry,
            source,
            notifier,
            state: Arc::new(RwLock::new(LoopState::Idle)),
            tick_interval,
            check_timeout,
            max_concurrent,
        }
    }

    /// Handle to the Idle/Evaluating state for the status endpoint.
    pub fn state_handle(&self) -> Arc<RwLock<LoopState>> {
        self.state.clone()
    }

    /// Run until `shutdown` flips to true. Call from `tokio::spawn`.
    ///
    /// The first pass runs immediately; subsequent passes follow at the
    /// configured interval. A pass that overruns its slot delays the next
    /// tick instead of bursting to catch up.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.tick_interval.as_secs(),
            "Scheduler running"
        );

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    *self.state.write().await = LoopState::Evaluating;
                    self.run_tick().await;
                    *self.state.write().await = LoopState::Idle;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Scheduler shutting down");
                        return;
                    }
                }
            }
        }
    }
}
