//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use domain::{DEFAULT_PAGINATION_LIMIT, MAX_PAGINATION_LIMIT, PaginationConfig};
use events::DispatchConfig;

/// Output format of the fmt tracing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8080`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `DATABASE_URL`: PostgreSQL URL; the in-memory repository is used when unset
/// - `REDIS_URL`: Redis URL; events go to an in-process broadcast channel when unset
/// - `REDIS_EVENTS_CHANNEL`: pub/sub channel name (default: `"events"`)
/// - `EVENTS_LOG_FILE_PATH`: durable event log (default: `"logs/events.log"`)
/// - `PAGINATION_DEFAULT_LIMIT` / `PAGINATION_MAX_LIMIT` (default: `10` / `100`)
/// - `PUBLISH_QUEUE_CAPACITY` (default: `1024`)
/// - `PUBLISH_TIMEOUT_MS` (default: `5000`)
///
/// Unparseable numeric values fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub redis_events_channel: String,
    pub events_log_file_path: PathBuf,
    pub pagination: PaginationConfig,
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.parse::<u64>().ok());

        let pagination = PaginationConfig::new(
            parsed("PAGINATION_DEFAULT_LIMIT")
                .map_or(defaults.pagination.default_limit, |v| v as usize),
            parsed("PAGINATION_MAX_LIMIT").map_or(defaults.pagination.max_limit, |v| v as usize),
        );

        let dispatch = DispatchConfig {
            capacity: parsed("PUBLISH_QUEUE_CAPACITY")
                .filter(|&v| v > 0)
                .map_or(defaults.dispatch.capacity, |v| v as usize),
            publish_timeout: parsed("PUBLISH_TIMEOUT_MS")
                .map_or(defaults.dispatch.publish_timeout, Duration::from_millis),
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT").map_or(defaults.log_format, |v| LogFormat::parse(&v)),
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            redis_url: lookup("REDIS_URL").filter(|v| !v.is_empty()),
            redis_events_channel: lookup("REDIS_EVENTS_CHANNEL")
                .unwrap_or(defaults.redis_events_channel),
            events_log_file_path: lookup("EVENTS_LOG_FILE_PATH")
                .map_or(defaults.events_log_file_path, PathBuf::from),
            pagination,
            dispatch,
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            redis_url: None,
            redis_events_channel: "events".to_string(),
            events_log_file_path: PathBuf::from("logs/events.log"),
            pagination: PaginationConfig::new(DEFAULT_PAGINATION_LIMIT, MAX_PAGINATION_LIMIT),
            dispatch: DispatchConfig::default(),
        }
    }
}
