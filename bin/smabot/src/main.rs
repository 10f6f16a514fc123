use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{AlertMode, Config};
use marketdata::{BarSource, YahooClient};
use notify::{ConsoleNotifier, Notifier, WebhookNotifier};
use registry::WatchRegistry;
use scheduler::Scheduler;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ───────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        interval_secs = cfg.poll_interval_secs,
        mode = %cfg.alert_mode,
        "SmaBot starting"
    );

    // ── Watch registry ───────────────────────────────────────────────────────
    let registry = WatchRegistry::open(&cfg.registry_path).unwrap_or_else(|e| {
        panic!(
            "Failed to open watch registry at '{}': {e}",
            cfg.registry_path
        )
    });
    info!(
        watches = registry.len(),
        path = %cfg.registry_path,
        "Watch registry loaded"
    );
    let registry = Arc::new(RwLock::new(registry));

    // ── Bar source ───────────────────────────────────────────────────────────
    let source: Arc<dyn BarSource> =
        Arc::new(YahooClient::new(Duration::from_secs(cfg.fetch_timeout_secs)));

    // ── Notifier (injected based on ALERT_MODE) ──────────────────────────────
    let notifier: Arc<dyn Notifier> = match cfg.alert_mode {
        AlertMode::Webhook => {
            info!("Webhook alert mode — using WebhookNotifier");
            Arc::new(WebhookNotifier::new(Duration::from_secs(
                cfg.fetch_timeout_secs,
            )))
        }
        AlertMode::Console => {
            info!("Console alert mode — alerts are logged, not delivered");
            Arc::new(ConsoleNotifier)
        }
    };

    // ── Scheduler ────────────────────────────────────────────────────────────
    let scheduler = Scheduler::new(
        registry.clone(),
        source,
        notifier,
        Duration::from_secs(cfg.poll_interval_secs),
        Duration::from_secs(cfg.check_timeout_secs),
        cfg.max_concurrent_checks,
    );
    let loop_state = scheduler.state_handle();

    // ── Management API ───────────────────────────────────────────────────────
    let api_state = api::AppState {
        registry: registry.clone(),
        loop_state,
        api_token: cfg.api_token.clone(),
    };

    // ── Spawn all tasks ──────────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(scheduler.run(shutdown_rx));
    tokio::spawn(api::serve(api_state, cfg.api_port));

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    let _ = shutdown_tx.send(true);
    info!("Shutdown signal received. Exiting.");
}
