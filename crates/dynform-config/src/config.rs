// crates/dynform-config/src/config.rs
// ============================================================================
// Module: Dynform Configuration
// Description: Configuration loading and validation for the form runtime.
// Purpose: Parse `dynform.toml` with hard limits and build runtime settings.
// Dependencies: dynform-core, dynform-providers, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is read from a TOML file resolved from an explicit path,
//! then the `DYNFORM_CONFIG` environment variable, then `dynform.toml` in
//! the working directory. Every section is optional and defaults to the
//! values the runtime uses without a file. Out-of-range values fail the load.
//!
//! ```toml
//! [transport]
//! timeout_ms = 5000
//! allowed_hosts = ["api.example.com"]
//!
//! [retry]
//! initial_interval_ms = 1000
//! max_retries = 3
//!
//! [events]
//! sink = "file"
//! path = "form-events.jsonl"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dynform_core::DEFAULT_INITIAL_INTERVAL;
use dynform_core::DEFAULT_MAX_RETRIES;
use dynform_core::FileEventSink;
use dynform_core::FormEventSink;
use dynform_core::NoopEventSink;
use dynform_core::RetryPolicy;
use dynform_core::StderrEventSink;
use dynform_providers::HttpTransportConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "dynform.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DYNFORM_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Accepted request timeout range in milliseconds.
const TIMEOUT_RANGE_MS: (u64, u64) = (100, 120_000);
/// Largest accepted response limit in bytes.
const MAX_RESPONSE_LIMIT: usize = 16 * 1024 * 1024;
/// Largest accepted retry count.
const MAX_RETRIES_LIMIT: u32 = 10;
/// Largest accepted retry interval in milliseconds.
const MAX_INTERVAL_LIMIT_MS: u64 = 300_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DynFormConfig {
    /// HTTP transport limits and URL policy.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Retry envelope for remote calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Event sink selection.
    #[serde(default)]
    pub events: EventsConfig,
}

impl DynFormConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transport.validate()?;
        self.retry.validate()?;
        self.events.validate()
    }

    /// Returns the HTTP transport settings.
    #[must_use]
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            allow_http: self.transport.allow_http,
            timeout_ms: self.transport.timeout_ms,
            max_response_bytes: self.transport.max_response_bytes,
            allowed_hosts: self.transport.allowed_hosts.clone(),
            user_agent: self.transport.user_agent.clone(),
        }
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_interval: Duration::from_millis(self.retry.initial_interval_ms),
            max_retries: self.retry.max_retries,
            max_interval: self.retry.max_interval_ms.map(Duration::from_millis),
        }
    }

    /// Opens the configured event sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the event file cannot be opened.
    pub fn event_sink(&self) -> Result<Arc<dyn FormEventSink>, ConfigError> {
        match self.events.sink {
            EventSinkKind::Stderr => Ok(Arc::new(StderrEventSink)),
            EventSinkKind::None => Ok(Arc::new(NoopEventSink)),
            EventSinkKind::File => {
                let path = self.events.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("events.path required for file sink".to_string())
                })?;
                let sink = FileEventSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Transport Config
// ============================================================================

/// `[transport]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    /// Allow cleartext HTTP.
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size in bytes.
    pub max_response_bytes: usize,
    /// Optional host allowlist.
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent for outbound requests.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let defaults = HttpTransportConfig::default();
        Self {
            allow_http: defaults.allow_http,
            timeout_ms: defaults.timeout_ms,
            max_response_bytes: defaults.max_response_bytes,
            allowed_hosts: defaults.allowed_hosts,
            user_agent: defaults.user_agent,
        }
    }
}

impl TransportConfig {
    /// Validates ranges and allowlist entries.
    fn validate(&self) -> Result<(), ConfigError> {
        let (min_timeout, max_timeout) = TIMEOUT_RANGE_MS;
        if !(min_timeout..=max_timeout).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "transport.timeout_ms must be between {min_timeout} and {max_timeout}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "transport.max_response_bytes must be between 1 and {MAX_RESPONSE_LIMIT}"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("transport.user_agent must be non-empty".to_string()));
        }
        if let Some(hosts) = &self.allowed_hosts {
            if hosts.is_empty() {
                return Err(ConfigError::Invalid(
                    "transport.allowed_hosts must list at least one host".to_string(),
                ));
            }
            if hosts.iter().any(|host| host.trim().is_empty() || host.contains('/')) {
                return Err(ConfigError::Invalid(
                    "transport.allowed_hosts entries must be bare host names".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Retry Config
// ============================================================================

/// `[retry]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds.
    pub initial_interval_ms: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Optional cap on a single delay, in milliseconds.
    pub max_interval_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: u64::try_from(DEFAULT_INITIAL_INTERVAL.as_millis()).unwrap_or(1_000),
            max_retries: DEFAULT_MAX_RETRIES,
            max_interval_ms: None,
        }
    }
}

impl RetryConfig {
    /// Validates retry bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "retry.max_retries must be at most {MAX_RETRIES_LIMIT}"
            )));
        }
        if self.initial_interval_ms > MAX_INTERVAL_LIMIT_MS {
            return Err(ConfigError::Invalid(format!(
                "retry.initial_interval_ms must be at most {MAX_INTERVAL_LIMIT_MS}"
            )));
        }
        if let Some(cap) = self.max_interval_ms
            && (cap < self.initial_interval_ms || cap > MAX_INTERVAL_LIMIT_MS)
        {
            return Err(ConfigError::Invalid(format!(
                "retry.max_interval_ms must be between retry.initial_interval_ms and {MAX_INTERVAL_LIMIT_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Events Config
// ============================================================================

/// Event sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Events are dropped.
    None,
}

/// `[events]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Sink kind.
    pub sink: EventSinkKind,
    /// Output file for the file sink.
    pub path: Option<PathBuf>,
}

impl EventsConfig {
    /// Validates sink and path consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (EventSinkKind::File, None) => {
                Err(ConfigError::Invalid("events.path required for file sink".to_string()))
            }
            (EventSinkKind::File, Some(path)) if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH => {
                Err(ConfigError::Invalid("events.path exceeds max length".to_string()))
            }
            (EventSinkKind::Stderr | EventSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "events.path is only valid with the file sink".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening a sink.
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

/// Resolves the config path from the argument or environment defaults.
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
