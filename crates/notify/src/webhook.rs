use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use common::{Error, Result};

use crate::Notifier;

/// Posts alerts to a Discord-compatible webhook endpoint.
///
/// The payload is `{"content": message}`. The endpoint is treated as an
/// opaque URL supplied per watch; it is never logged because webhook URLs
/// embed their own credential.
pub struct WebhookNotifier {
    http: Client,
}

impl WebhookNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: Client::builder()
                .use_rustls_tls()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, endpoint: &str, message: &str) -> Result<()> {
        let resp = self
            .http
            .post(endpoint)
            .json(&json!({ "content": message }))
            .send()
            .await
            .map_err(|e| Error::Notify(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!("HTTP {status}: {body}")));
        }

        debug!("Webhook alert delivered");
        Ok(())
    }
}
