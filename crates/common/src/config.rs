use crate::AlertMode;

/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON file backing the watch registry.
    pub registry_path: String,

    // Scheduler
    pub poll_interval_secs: u64,
    pub check_timeout_secs: u64,
    pub max_concurrent_checks: usize,

    // Market data
    pub fetch_timeout_secs: u64,

    // Alerts
    pub alert_mode: AlertMode,

    // Management API
    pub api_port: u16,
    pub api_token: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let alert_mode = match optional_env("ALERT_MODE")
            .unwrap_or_else(|| "webhook".to_string())
            .to_lowercase()
            .as_str()
        {
            "webhook" => AlertMode::Webhook,
            "console" => AlertMode::Console,
            other => panic!("ERROR: ALERT_MODE must be 'webhook' or 'console', got: '{other}'"),
        };

        Config {
            registry_path: optional_env("REGISTRY_PATH")
                .unwrap_or_else(|| "watches.json".to_string()),
            poll_interval_secs: optional_env("POLL_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            check_timeout_secs: optional_env("CHECK_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_concurrent_checks: optional_env("MAX_CONCURRENT_CHECKS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            fetch_timeout_secs: optional_env("FETCH_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            alert_mode,
            api_port: optional_env("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            api_token: required_env("API_TOKEN"),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
