use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Bar, Error, Interval, Result};

use crate::BarSource;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo rejects requests without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; smabot/0.1)";

/// Bar provider backed by the Yahoo Finance chart API.
///
/// History is paged in bounded time windows: 7-day windows for sub-hour
/// intervals (Yahoo's intraday look-back limit) and 365-day windows
/// otherwise. Paging stops as soon as enough bars are collected or the
/// look-back limit is exhausted.
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new(timeout: StdDuration) -> Self {
        Self {
            http: Client::builder()
                .use_rustls_tls()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Look-back limit and paging window width for `interval`.
    fn window(interval: Interval) -> Duration {
        if interval.is_sub_hour() {
            Duration::days(7)
        } else {
            Duration::days(365)
        }
    }

    async fn fetch_window(
        &self,
        symbol: &str,
        interval: Interval,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>> {
        let url = format!(
            "{BASE_URL}/v8/finance/chart/{symbol}?period1={}&period2={}&interval={}",
            start.timestamp(),
            end.timestamp(),
            interval.as_str(),
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {status}: {body}")));
        }

        parse_chart(&body)
    }
}

#[async_trait]
impl BarSource for YahooClient {
    async fn fetch(&self, symbol: &str, interval: Interval, min_bars: usize) -> Result<Vec<Bar>> {
        let end = Utc::now();
        let window = Self::window(interval);
        let mut cursor = end - window;
        let mut bars: Vec<Bar> = Vec::new();

        while cursor < end {
            let chunk_end = std::cmp::min(end, cursor + window);
            let mut chunk = self
                .fetch_window(symbol, interval, cursor, chunk_end)
                .await?;
            bars.append(&mut chunk);
            cursor = chunk_end;

            if bars.len() >= min_bars {
                break;
            }
        }

        debug!(symbol, interval = %interval, bars = bars.len(), "History fetched");
        Ok(bars)
    }
}

/// Parse a chart API response into bars, oldest first.
///
/// A missing price slot becomes `f64::NAN` rather than dropping the bar, so
/// the SMA windows containing the gap stay undefined instead of silently
/// averaging over a shorter window.
fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let resp: ChartResponse =
        serde_json::from_str(body).map_err(|e| Error::Fetch(e.to_string()))?;

    let result = match resp.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.swap_remove(0))
        }
    }) {
        Some(r) => r,
        None => return Ok(Vec::new()), // no data for the requested window
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = match result.indicators.quote.into_iter().next() {
        Some(q) => q,
        None => return Ok(Vec::new()),
    };

    let bars = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let timestamp = Utc.timestamp_opt(ts, 0).single()?;
            Some(Bar {
                timestamp,
                open: price_at(&quote.open, i),
                high: price_at(&quote.high, i),
                low: price_at(&quote.low, i),
                close: price_at(&quote.close, i),
                volume: quote.volume.get(i).copied().flatten(),
            })
        })
        .collect();

    Ok(bars)
}

fn price_at(column: &[Option<f64>], i: usize) -> f64 {
    column.get(i).copied().flatten().unwrap_or(f64::NAN)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}
