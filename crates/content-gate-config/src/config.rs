// crates/content-gate-config/src/config.rs
// ============================================================================
// Module: Content Gate Configuration
// Description: Configuration loading and validation for the gate engine.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: content-gate-core, content-gate-http, content-gate-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to defaults, except that a gate
//! request can only be built once `gate.url` and `gate.target_date` are set
//! (from the file or from command-line overrides).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use content_gate_core::DEFAULT_REQUEST_TIMEOUT;
use content_gate_core::DeviceClass;
use content_gate_core::GateRequest;
use content_gate_http::HttpResolverConfig;
use content_gate_http::ProbeConfig;
use content_gate_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "content-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTENT_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum request timeout in milliseconds.
const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum cache key length in bytes.
const MAX_CACHE_KEY_BYTES: usize = 512;
/// Maximum probe endpoint length in bytes.
const MAX_ENDPOINT_BYTES: usize = 255;
/// Minimum redirect hop limit.
const MIN_REDIRECTS: usize = 1;
/// Maximum redirect hop limit.
const MAX_REDIRECTS: usize = 50;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentGateConfig {
    /// Gate request settings.
    #[serde(default)]
    pub gate: GateConfig,
    /// Durable store settings.
    #[serde(default)]
    pub store: SqliteStoreConfig,
    /// URL resolver settings.
    #[serde(default)]
    pub http: HttpResolverConfig,
    /// Connectivity probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Host device settings.
    #[serde(default)]
    pub device: DeviceConfig,
}

impl ContentGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_from(&resolved)
    }

    /// Loads configuration like [`Self::load`], but returns defaults when no
    /// path was given and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an existing or explicitly named file
    /// fails to load or validate.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        let resolved = resolve_path(path)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&resolved)
    }

    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates the file at `path`.
    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate.validate()?;
        validate_store_path(&self.store.path)?;
        validate_http(&self.http)?;
        validate_probe(&self.probe)?;
        Ok(())
    }
}

/// Gate request settings.
///
/// # Invariants
/// - `url`, when set, parses with an `http` or `https` scheme.
/// - `target_date`, when set, is an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Candidate destination URL.
    #[serde(default)]
    pub url: Option<String>,
    /// RFC 3339 instant before which external content is withheld.
    #[serde(default)]
    pub target_date: Option<String>,
    /// Whether the device-class checkpoint runs.
    #[serde(default = "default_check_device")]
    pub check_device: bool,
    /// Resolve timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Optional cache key; defaults to the URL.
    #[serde(default)]
    pub cache_key: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            url: None,
            target_date: None,
            check_device: default_check_device(),
            timeout_ms: default_timeout_ms(),
            cache_key: None,
        }
    }
}

impl GateConfig {
    /// Validates the gate settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a field is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            validate_gate_url(url)?;
        }
        self.parsed_target_date()?;
        validate_timeout_range("gate.timeout_ms", self.timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)?;
        if let Some(cache_key) = &self.cache_key {
            if cache_key.trim().is_empty() {
                return Err(ConfigError::Invalid("gate.cache_key must be non-empty".to_string()));
            }
            if cache_key.len() > MAX_CACHE_KEY_BYTES {
                return Err(ConfigError::Invalid(format!(
                    "gate.cache_key exceeds {MAX_CACHE_KEY_BYTES} bytes"
                )));
            }
        }
        Ok(())
    }

    /// Builds the gate request described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `url` or `target_date` is
    /// missing or invalid.
    pub fn to_request(&self) -> Result<GateRequest, ConfigError> {
        self.validate()?;
        let url = self
            .url
            .clone()
            .ok_or_else(|| ConfigError::Invalid("gate.url is required".to_string()))?;
        let target_date = self
            .parsed_target_date()?
            .ok_or_else(|| ConfigError::Invalid("gate.target_date is required".to_string()))?;
        let mut request = GateRequest::new(url, target_date)
            .with_device_check(self.check_device)
            .with_timeout(Duration::from_millis(self.timeout_ms));
        if let Some(cache_key) = &self.cache_key {
            request = request.with_cache_key(cache_key.clone());
        }
        Ok(request)
    }

    /// Parses `target_date` when present.
    fn parsed_target_date(&self) -> Result<Option<OffsetDateTime>, ConfigError> {
        self.target_date
            .as_deref()
            .map(|raw| {
                OffsetDateTime::parse(raw, &Rfc3339).map_err(|_| {
                    ConfigError::Invalid(
                        "gate.target_date must be an RFC 3339 timestamp".to_string(),
                    )
                })
            })
            .transpose()
    }
}

/// Host device settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Declared device class.
    #[serde(default)]
    pub class: DeviceClass,
}

/// Default for `gate.check_device`.
const fn default_check_device() -> bool {
    true
}

/// Default for `gate.timeout_ms`.
fn default_timeout_ms() -> u64 {
    u64::try_from(DEFAULT_REQUEST_TIMEOUT.as_millis()).unwrap_or(MAX_TIMEOUT_MS)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits, naming `field` in errors.
fn validate_path_limits(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the resolved config path against limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    validate_path_limits("config path", path)
}

/// Validates the store path against limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("store.path must be non-empty".to_string()));
    }
    validate_path_limits("store.path", path)
}

/// Validates the gate URL.
fn validate_gate_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|err| ConfigError::Invalid(format!("gate.url is not a valid URL: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!("gate.url scheme {other} is not supported"))),
    }
}

/// Validates a timeout value against bounds.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Validates resolver settings.
fn validate_http(config: &HttpResolverConfig) -> Result<(), ConfigError> {
    if !(MIN_REDIRECTS ..= MAX_REDIRECTS).contains(&config.max_redirects) {
        return Err(ConfigError::Invalid(format!(
            "http.max_redirects must be between {MIN_REDIRECTS} and {MAX_REDIRECTS}"
        )));
    }
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("http.user_agent must be non-empty".to_string()));
    }
    Ok(())
}

/// Validates probe settings.
fn validate_probe(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.endpoints.is_empty() {
        return Err(ConfigError::Invalid("probe.endpoints must be non-empty".to_string()));
    }
    for endpoint in &config.endpoints {
        if endpoint.trim().is_empty() || endpoint.len() > MAX_ENDPOINT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "probe.endpoints entries must be 1 to {MAX_ENDPOINT_BYTES} bytes"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
