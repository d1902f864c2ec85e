//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable               | Default        |
//! |------------------------|----------------|
//! | `LISTEN_ADDR`          | `0.0.0.0:5000` |
//! | `EVENT_BUS_CAPACITY`   | `1024`         |
//! | `PRUNE_EMPTY_ROOMS`    | `false`        |
//! | `LOG_FORMAT`           | `text`         |
//! | `REQUEST_TIMEOUT_SECS` | `30`           |

use std::net::SocketAddr;
use std::time::Duration;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`PokerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PokerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5000`).
    pub listen_addr: SocketAddr,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Drop rooms from the registry when their last participant leaves.
    /// Off by default: idle rooms live until the process restarts.
    pub prune_empty_rooms: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Upper bound on REST request handling time.
    pub request_timeout: Duration,
}

impl PokerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);
        let prune_empty_rooms = parse_env_bool("PRUNE_EMPTY_ROOMS", false);
        let log_format = parse_log_format(std::env::var("LOG_FORMAT").ok().as_deref());
        let request_timeout = Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30));

        Ok(Self {
            listen_addr,
            event_bus_capacity,
            prune_empty_rooms,
            log_format,
            request_timeout,
        })
    }
}

impl Default for PokerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            event_bus_capacity: 1024,
            prune_empty_rooms: false,
            log_format: LogFormat::Text,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    parse_bool(std::env::var(key).ok().as_deref(), default)
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_parsing_is_case_insensitive() {
        assert!(parse_bool(Some("TRUE"), false));
        assert!(parse_bool(Some("1"), false));
        assert!(!parse_bool(Some("False"), true));
        assert!(!parse_bool(Some("0"), true));
    }

    #[test]
    fn bool_parsing_falls_back_to_default() {
        assert!(parse_bool(None, true));
        assert!(!parse_bool(Some("maybe"), false));
    }

    #[test]
    fn log_format_defaults_to_text() {
        assert_eq!(parse_log_format(None), LogFormat::Text);
        assert_eq!(parse_log_format(Some("pretty")), LogFormat::Text);
        assert_eq!(parse_log_format(Some("JSON")), LogFormat::Json);
    }

    #[test]
    fn missing_numeric_env_uses_default() {
        let value: usize = parse_env("PLANNING_POKER_TEST_UNSET_VARIABLE", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn default_config_keeps_idle_rooms() {
        let config = PokerConfig::default();
        assert!(!config.prune_empty_rooms);
        assert_eq!(config.listen_addr.port(), 5000);
    }
}
