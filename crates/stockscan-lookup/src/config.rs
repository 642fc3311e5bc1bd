//! # Lookup Configuration
//!
//! Configuration management for the lookup service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKSCAN_PROVIDER_URL=https://provider/productData                │
//! │     STOCKSCAN_MAX_RETRIES=2                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $STOCKSCAN_CONFIG, or                                              │
//! │     ~/.config/stockscan/lookup.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockscan.stockscan/lookup.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5s timeout, 0 retries, cache off, EAN-13 only                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # lookup.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [provider]
//! url = "https://provider.example.com/productData"
//! timeout_ms = 5000
//! max_connections = 32
//! request_encoding = "json"  # json | form
//!
//! [retry]
//! max_retries = 0
//!
//! [cache]
//! enabled = false
//! ttl_secs = 300
//! max_entries = 10000
//!
//! [barcode]
//! symbologies = ["ean13"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use stockscan_core::Symbology;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "STOCKSCAN_CONFIG";

/// Upper bound for `provider.max_connections`.
pub const MAX_CONNECTIONS_LIMIT: usize = 1024;

// =============================================================================
// Server Settings
// =============================================================================

/// Inbound HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Provider Settings
// =============================================================================

/// How the barcode is encoded in the outbound POST body.
///
/// The scanner app posted `barcode=<digits>` as a form; newer providers take
/// `{"barcode": "<digits>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestEncoding {
    #[default]
    Json,
    Form,
}

impl std::str::FromStr for RequestEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(RequestEncoding::Json),
            "form" | "urlencoded" => Ok(RequestEncoding::Form),
            other => Err(ConfigError::Invalid(format!(
                "Unknown request encoding: '{}'. Valid options: json, form",
                other
            ))),
        }
    }
}

/// The upstream product-data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Absolute http(s) URL the barcode is POSTed to.
    #[serde(default = "default_provider_url")]
    pub url: String,

    /// Budget for one attempt, including waiting for a connection slot.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP/TLS connect timeout.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum concurrent in-flight requests to the provider.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default)]
    pub request_encoding: RequestEncoding,
}

fn default_provider_url() -> String {
    "http://127.0.0.1:5000/productData".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

fn default_max_connections() -> usize {
    32
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            url: default_provider_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_connections: default_max_connections(),
            request_encoding: RequestEncoding::default(),
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// `max_connections` must be in `1..=MAX_CONNECTIONS_LIMIT`.
    pub fn check_max_connections(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CONNECTIONS_LIMIT).contains(&self.max_connections) {
            return Err(ConfigError::Invalid(format!(
                "provider.max_connections must be between 1 and {}, got {}",
                MAX_CONNECTIONS_LIMIT, self.max_connections
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Retry policy for timeouts and transport failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Extra attempts after the first. 0 means exactly one upstream call.
    #[serde(default)]
    pub max_retries: u32,

    /// Initial backoff duration (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration (milliseconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_initial_backoff() -> u64 {
    200
}

fn default_max_backoff() -> u64 {
    2000
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Idempotent cache of found products, keyed by barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_ttl() -> u64 {
    300
}

fn default_max_entries() -> usize {
    10_000
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: false,
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

// =============================================================================
// Barcode Settings
// =============================================================================

/// Which symbologies `POST /lookup` accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeSettings {
    #[serde(default = "default_symbologies")]
    pub symbologies: Vec<Symbology>,
}

fn default_symbologies() -> Vec<Symbology> {
    vec![Symbology::Ean13]
}

impl Default for BarcodeSettings {
    fn default() -> Self {
        BarcodeSettings {
            symbologies: default_symbologies(),
        }
    }
}

// =============================================================================
// Main Lookup Configuration
// =============================================================================

/// Complete lookup service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub barcode: BarcodeSettings,
}

impl LookupConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$STOCKSCAN_CONFIG`, or lookup.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading lookup config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.provider.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Provider URL must start with http:// or https://, got: {}",
                self.provider.url
            )));
        }

        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_ms must be greater than 0".into(),
            ));
        }

        self.provider.check_max_connections()?;

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigError::Invalid(
                "retry.initial_backoff_ms must not exceed retry.max_backoff_ms".into(),
            ));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be greater than 0 when the cache is enabled".into(),
            ));
        }

        if self.barcode.symbologies.is_empty() {
            return Err(ConfigError::Invalid(
                "barcode.symbologies must list at least one symbology".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable values are an error, not ignored.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(addr) = std::env::var("STOCKSCAN_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = env_parse("STOCKSCAN_PORT")? {
            debug!(port, "Overriding port from environment");
            self.server.port = port;
        }

        if let Ok(url) = std::env::var("STOCKSCAN_PROVIDER_URL") {
            debug!(url = %url, "Overriding provider URL from environment");
            self.provider.url = url;
        }

        if let Some(timeout) = env_parse("STOCKSCAN_PROVIDER_TIMEOUT_MS")? {
            self.provider.timeout_ms = timeout;
        }

        if let Some(max) = env_parse("STOCKSCAN_MAX_CONNECTIONS")? {
            self.provider.max_connections = max;
        }

        if let Ok(encoding) = std::env::var("STOCKSCAN_REQUEST_ENCODING") {
            self.provider.request_encoding = encoding.parse()?;
        }

        if let Some(retries) = env_parse("STOCKSCAN_MAX_RETRIES")? {
            debug!(retries, "Overriding retry count from environment");
            self.retry.max_retries = retries;
        }

        if let Some(enabled) = env_parse("STOCKSCAN_CACHE_ENABLED")? {
            self.cache.enabled = enabled;
        }

        if let Some(ttl) = env_parse("STOCKSCAN_CACHE_TTL_SECS")? {
            self.cache.ttl_secs = ttl;
        }

        if let Ok(list) = std::env::var("STOCKSCAN_SYMBOLOGIES") {
            self.barcode.symbologies = parse_symbologies(&list)?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockscan", "stockscan")
            .map(|dirs| dirs.config_dir().join("lookup.toml"))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid value for {}: '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

/// Parses a comma-separated symbology list such as `ean13,upc_a`.
pub fn parse_symbologies(list: &str) -> Result<Vec<Symbology>, ConfigError> {
    let mut symbologies = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let symbology: Symbology = part
            .parse()
            .map_err(|e: stockscan_core::ValidationError| ConfigError::Invalid(e.to_string()))?;
        if !symbologies.contains(&symbology) {
            symbologies.push(symbology);
        } else {
            warn!(%symbology, "Duplicate symbology in list");
        }
    }
    Ok(symbologies)
}
