use async_trait::async_trait;
use tracing::info;

use common::Result;

use crate::Notifier;

/// Logs alerts instead of delivering them. Selected with `ALERT_MODE=console`
/// for dry runs; the watch lifecycle behaves exactly as in webhook mode.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, _endpoint: &str, message: &str) -> Result<()> {
        info!(target: "alert", "{message}");
        Ok(())
    }
}
