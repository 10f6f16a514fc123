pub mod console;
pub mod webhook;

pub use console::ConsoleNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;

use common::Result;

/// Sink for alert delivery.
///
/// `WebhookNotifier` posts to a Discord-compatible webhook endpoint;
/// `ConsoleNotifier` logs the alert locally for dry runs. A failure is
/// reported to the caller but the scheduler only logs it — the triggered
/// watch is retired either way.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, endpoint: &str, message: &str) -> Result<()>;
}
