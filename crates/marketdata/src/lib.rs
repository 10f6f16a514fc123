pub mod yahoo;

pub use yahoo::YahooClient;

use async_trait::async_trait;

use common::{Bar, Interval, Result};

/// Abstraction over the historical bar provider.
///
/// `YahooClient` implements this against the Yahoo Finance chart API.
/// Tests implement it with canned bar sequences.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch recent history for `symbol` at `interval`, aiming for at least
    /// `min_bars` bars, oldest first with strictly increasing timestamps.
    ///
    /// Returns an empty vector (not an error) when the provider has no data
    /// for the requested window. Fewer than `min_bars` bars is also not an
    /// error here; the indicator decides whether history suffices.
    async fn fetch(&self, symbol: &str, interval: Interval, min_bars: usize) -> Result<Vec<Bar>>;
}
