//! Configuration management for the MCP server.
//!
//! Values come from defaults, optionally overridden by `MCP_*` environment
//! variables (a `.env` file in the working directory is loaded first).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::dispatch::DispatchOptions;
use super::transport::TransportConfig;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Request execution limits.
    pub dispatch: DispatchConfig,

    /// Start-up registration behaviour.
    pub registry: RegistryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Request execution limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of requests handled concurrently on one connection.
    /// `1` processes requests strictly in arrival order.
    pub max_in_flight: usize,

    /// Time limit for a single handler invocation, in milliseconds.
    pub handler_timeout_ms: Option<u64>,
}

/// Start-up registration behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fail start-up when a tool name or resource URI is registered twice,
    /// instead of keeping the latest registration.
    pub reject_duplicates: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 1,
            handler_timeout_ms: None,
        }
    }
}

impl DispatchConfig {
    /// Dispatcher options derived from this configuration.
    pub fn options(&self) -> DispatchOptions {
        DispatchOptions {
            handler_timeout: self.handler_timeout_ms.map(Duration::from_millis),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mcp-apps-demo".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            dispatch: DispatchConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Load the logging section alone.
    ///
    /// Called before the subscriber is installed, so malformed values are
    /// only reported once [`Config::from_env`] runs with logging up.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Some(with_timestamps) = parse_var::<bool>("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = with_timestamps;
        }

        logging
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// Unparseable values are reported and the default is kept.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();
        config.transport = TransportConfig::from_env();

        if let Some(max) = parse_var::<usize>("MCP_MAX_IN_FLIGHT") {
            if max == 0 {
                warn!("MCP_MAX_IN_FLIGHT must be at least 1, keeping {}", config.dispatch.max_in_flight);
            } else {
                config.dispatch.max_in_flight = max;
            }
        }

        if let Some(ms) = parse_var::<u64>("MCP_HANDLER_TIMEOUT_MS") {
            config.dispatch.handler_timeout_ms = (ms > 0).then_some(ms);
        }

        if let Some(strict) = parse_var::<bool>("MCP_REJECT_DUPLICATES") {
            config.registry.reject_duplicates = strict;
            info!("Duplicate registrations rejected: {}", strict);
        }

        config
    }
}

/// Read and parse an environment variable, warning on malformed values.
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const KEYS: &[&str] = &[
        "MCP_SERVER_NAME",
        "MCP_LOG_LEVEL",
        "MCP_LOG_TIMESTAMPS",
        "MCP_MAX_IN_FLIGHT",
        "MCP_HANDLER_TIMEOUT_MS",
        "MCP_REJECT_DUPLICATES",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "mcp-apps-demo");
        assert_eq!(config.dispatch.max_in_flight, 1);
        assert!(config.dispatch.handler_timeout_ms.is_none());
        assert!(!config.registry.reject_duplicates);
        assert_eq!(config.dispatch.options(), DispatchOptions::default());
    }

    #[test]
    fn test_dispatch_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_MAX_IN_FLIGHT", "8");
            std::env::set_var("MCP_HANDLER_TIMEOUT_MS", "1500");
            std::env::set_var("MCP_REJECT_DUPLICATES", "true");
        }

        let config = Config::from_env();
        assert_eq!(config.dispatch.max_in_flight, 8);
        assert_eq!(
            config.dispatch.options().handler_timeout,
            Some(Duration::from_millis(1500))
        );
        assert!(config.registry.reject_duplicates);

        clear_env();
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_MAX_IN_FLIGHT", "0");
            std::env::set_var("MCP_HANDLER_TIMEOUT_MS", "soon");
            std::env::set_var("MCP_REJECT_DUPLICATES", "maybe");
        }

        let config = Config::from_env();
        assert_eq!(config.dispatch.max_in_flight, 1);
        assert!(config.dispatch.handler_timeout_ms.is_none());
        assert!(!config.registry.reject_duplicates);

        clear_env();
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "clock-server");
        }

        assert_eq!(Config::from_env().server.name, "clock-server");

        clear_env();
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        assert!(LoggingConfig::from_env().with_timestamps);

        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "debug");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "false");
        }

        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "debug");
        assert!(!logging.with_timestamps);
        assert!(!Config::from_env().logging.with_timestamps);

        clear_env();
    }
}
