use futures_util::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use common::{CrossDirection, Error, WatchSpec};
use strategy::{crossed, SmaIndicator};

use crate::Scheduler;

impl Scheduler {
    /// One full pass over the active watch set.
    ///
    /// Watches are evaluated concurrently, at most `max_concurrent` in
    /// flight. Triggered symbols are collected and removed from the
    /// registry in a single batch persist after the whole pass completes,
    /// so the store sees one writer and at most one rewrite per tick.
    pub async fn run_tick(&self) {
        let snapshot = self.registry.read().await.active();
        if snapshot.is_empty() {
            debug!("No active watches this tick");
            return;
        }
        debug!(watches = snapshot.len(), "Evaluating watch set");

        let triggered: Vec<String> = stream::iter(snapshot)
            .map(|(symbol, spec)| async move {
                // One budget for the symbol's whole fetch + notify round;
                // a hung endpoint costs this watch its tick, not the loop.
                match timeout(self.check_timeout, self.check_watch(&symbol, &spec)).await {
                    Ok(fired) => fired.then_some(symbol),
                    Err(_) => {
                        warn!(symbol, "Watch evaluation timed out — retrying next tick");
                        None
                    }
                }
            })
            .buffer_unordered(self.max_concurrent)
            .filter_map(|fired| async move { fired })
            .collect()
            .await;

        if triggered.is_empty() {
            return;
        }

        info!(count = triggered.len(), "Retiring triggered watches");
        let mut registry = self.registry.write().await;
        if let Err(e) = registry.remove_batch(triggered.iter().map(String::as_str)) {
            warn!(error = %e, "Failed to persist triggered-watch removals");
        }
    }

    /// Evaluate a single watch. Returns true when the watch fired and must
    /// be retired. Every failure is logged and absorbed here; one symbol
    /// can never poison the rest of the tick.
    async fn check_watch(&self, symbol: &str, spec: &WatchSpec) -> bool {
        // add() rejects period 0, but the backing file can be hand-edited
        if spec.period == 0 {
            warn!(symbol, "Watch has a non-positive period — skipping");
            return false;
        }

        let bars = match self.source.fetch(symbol, spec.interval, spec.period).await {
            Ok(bars) if bars.is_empty() => {
                debug!(symbol, "Bar source returned no data");
                return false;
            }
            Ok(bars) => bars,
            Err(e) => {
                warn!(symbol, error = %e, "Bar fetch failed — retrying next tick");
                return false;
            }
        };

        let indicator = SmaIndicator::new(spec.period, spec.price_field);
        let sma = match indicator.latest(&bars) {
            Ok(value) => value,
            Err(Error::InsufficientHistory { have, need }) => {
                debug!(symbol, have, need, "Not enough history yet");
                return false;
            }
            Err(e) => {
                warn!(symbol, error = %e, "SMA computation failed");
                return false;
            }
        };

        let close = bars[bars.len() - 1].close;
        if !crossed(close, sma, spec.condition) {
            return false;
        }

        let direction = CrossDirection::from(spec.condition);
        info!(symbol, close, sma, %direction, "Crossing detected");

        // At-most-once delivery: the watch is retired even when the webhook
        // call fails. The crossing may no longer hold by the next tick, so
        // the event is never retried.
        let message = format!("Alert: {symbol} - triggered {direction} SMA.");
        if let Err(e) = self.notifier.send(&spec.webhook_url, &message).await {
            warn!(symbol, error = %e, "Alert delivery failed — watch retired anyway");
        }

        true
    }
}
