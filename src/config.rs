//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub payout: PayoutConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Project URL of the backend (e.g. "https://xyz.supabase.co").
    /// Empty means no backend: the server falls back to in-memory data.
    #[serde(default)]
    pub url: String,

    /// API key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_statistics_function")]
    pub statistics_function: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub tables: TableConfig,
}

fn default_statistics_function() -> String {
    "get statistics".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            statistics_function: default_statistics_function(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            tables: TableConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Whether a backend URL has been configured
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Backend table names
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_linked_channels_table")]
    pub linked_channels: String,

    #[serde(default = "default_channel_views_table")]
    pub channel_views: String,

    #[serde(default = "default_balances_table")]
    pub balances: String,

    #[serde(default = "default_contracts_table")]
    pub contracts: String,
}

fn default_linked_channels_table() -> String {
    "user_requests".to_string()
}

fn default_channel_views_table() -> String {
    "channel_views".to_string()
}

fn default_balances_table() -> String {
    "balances".to_string()
}

fn default_contracts_table() -> String {
    "contracts".to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            linked_channels: default_linked_channels_table(),
            channel_views: default_channel_views_table(),
            balances: default_balances_table(),
            contracts: default_contracts_table(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Payout display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PayoutConfig {
    /// Minimum balance before a payment is issued, in cents
    #[serde(default = "default_threshold_cents")]
    pub threshold_cents: u64,

    #[serde(default = "default_payment_methods")]
    pub payment_methods: Vec<String>,
}

fn default_threshold_cents() -> u64 {
    10_000 // $100.00
}

fn default_payment_methods() -> Vec<String> {
    [
        "ACH (US)",
        "Local Bank Transfer",
        "International ACH (eCheck)",
        "Paper Check",
        "US Wire Transfer (Domestic)",
        "International Wire in Local Currency",
        "International Wire in USD",
        "PayPal",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            threshold_cents: default_threshold_cents(),
            payment_methods: default_payment_methods(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("creatordash").join("config.toml")),
            Some(PathBuf::from("/etc/creatordash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CREATORDASH_GATEWAY_URL") {
            self.gateway.url = url;
        }
        if let Ok(key) = std::env::var("CREATORDASH_GATEWAY_KEY") {
            self.gateway.api_key = key;
        }

        if let Ok(host) = std::env::var("CREATORDASH_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("CREATORDASH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(level) = std::env::var("CREATORDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CREATORDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Creatordash Configuration
#
# Environment variables override these settings:
# - CREATORDASH_GATEWAY_URL
# - CREATORDASH_GATEWAY_KEY
# - CREATORDASH_API_HOST
# - CREATORDASH_API_PORT
# - CREATORDASH_LOG_LEVEL
# - CREATORDASH_LOG_FORMAT

[gateway]
# Backend project URL. Leave empty to serve in-memory demo data.
url = ""

# Backend API key
api_key = ""

# Name of the edge function returning channel statistics
statistics_function = "get statistics"

# Per-request timeout (ms)
request_timeout_ms = 10000

# Attempts for timeouts, connection failures and rate limits
max_retries = 3

[gateway.tables]
linked_channels = "user_requests"
channel_views = "channel_views"
balances = "balances"
contracts = "contracts"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

[payout]
# Minimum payout threshold in cents
threshold_cents = 10000

payment_methods = [
    "ACH (US)",
    "Local Bank Transfer",
    "International ACH (eCheck)",
    "Paper Check",
    "US Wire Transfer (Domestic)",
    "International Wire in Local Currency",
    "International Wire in USD",
    "PayPal",
]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(!config.gateway.is_configured());
        assert_eq!(config.gateway.statistics_function, "get statistics");
        assert_eq!(config.gateway.tables.linked_channels, "user_requests");
        assert_eq!(config.api.addr(), "0.0.0.0:8090");
        assert_eq!(config.payout.threshold_cents, 10_000);
        assert_eq!(config.payout.payment_methods.len(), 8);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.api.port, 8090);
        assert_eq!(config.gateway.max_retries, 3);
        assert_eq!(config.gateway.tables.contracts, "contracts");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[gateway]\nurl = \"https://example.supabase.co\"\n\n[payout]\nthreshold_cents = 2500"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(config.gateway.is_configured());
        assert_eq!(config.gateway.request_timeout_ms, 10_000);
        assert_eq!(config.payout.threshold_cents, 2500);
        assert_eq!(config.payout.payment_methods.len(), 8);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
