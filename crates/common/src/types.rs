use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle interval a watch is evaluated on.
///
/// Serialized with the provider's short names ("1m", "5m", …), which are
/// also what the persisted registry file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    /// Query-string form understood by the bar provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
        }
    }

    /// Sub-hour intervals have a much shorter provider look-back limit.
    pub fn is_sub_hour(&self) -> bool {
        matches!(
            self,
            Interval::OneMinute | Interval::FiveMinutes | Interval::FifteenMinutes
        )
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which OHLC column feeds the moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceField {
    High,
    Low,
    Close,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceField::High => write!(f, "HIGH"),
            PriceField::Low => write!(f, "LOW"),
            PriceField::Close => write!(f, "CLOSE"),
        }
    }
}

/// Direction of the close-vs-SMA comparison a watch is armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Greater,
    Less,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Greater => write!(f, "greater"),
            Condition::Less => write!(f, "less"),
        }
    }
}

/// One OHLC(+volume) sample for a fixed interval.
///
/// Prices are plain `f64`; a sample the provider could not supply is carried
/// as `f64::NAN` rather than dropped, so gaps stay visible to the indicator.
/// Not every provider reports volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// The price column selected by `field`.
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// One watch entry. The symbol is the registry key, not a field here;
/// re-adding a symbol overwrites its previous spec.
///
/// Serde names match the registry file layout:
/// `{"AAPL": {"interval": "1d", "calculation_method": "CLOSE", "period": 20,
/// "check_condition": "greater", "webhook_url": "...", "active": true}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSpec {
    pub interval: Interval,
    #[serde(rename = "calculation_method")]
    pub price_field: PriceField,
    pub period: usize,
    #[serde(rename = "check_condition")]
    pub condition: Condition,
    pub webhook_url: String,
    /// Inactive watches stay in the registry but are skipped every tick.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Which side of the SMA the close ended up on, for alert wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    Above,
    Below,
}

impl From<Condition> for CrossDirection {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Greater => CrossDirection::Above,
            Condition::Less => CrossDirection::Below,
        }
    }
}

impl std::fmt::Display for CrossDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossDirection::Above => write!(f, "above"),
            CrossDirection::Below => write!(f, "below"),
        }
    }
}

/// Current state of the evaluation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    #[default]
    Idle,
    Evaluating,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopState::Idle => write!(f, "idle"),
            LoopState::Evaluating => write!(f, "evaluating"),
        }
    }
}

/// Whether alerts are delivered to the configured webhooks or only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMode {
    Webhook,
    Console,
}

impl std::fmt::Display for AlertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertMode::Webhook => write!(f, "webhook"),
            AlertMode::Console => write!(f, "console"),
        }
    }
}
