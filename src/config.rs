//! Configuration management and validation.
//!
//! Provides configuration structures for the HTTP server, the collection
//! service client and the CSV mapping pipeline, along with validation rules
//! applied before anything is started.

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PARAMETERS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_UPSTREAM_URL, UPSTREAM_CREATE_PATH, UPSTREAM_PUT_PATH,
};
use crate::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Time zone used to render observation timestamps
///
/// Always explicit: the process time zone is never consulted, so the same
/// upload renders identically on every host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputTimeZone {
    offset: FixedOffset,
}

impl OutputTimeZone {
    /// Coordinated Universal Time, rendered with a `Z` suffix
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Fixed offset east of UTC in seconds
    pub fn from_offset_seconds(seconds: i32) -> Result<Self> {
        FixedOffset::east_opt(seconds)
            .map(|offset| Self { offset })
            .ok_or_else(|| {
                Error::configuration(format!("Time zone offset {seconds}s is out of range"))
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn is_utc(&self) -> bool {
        self.offset.local_minus_utc() == 0
    }
}

impl Default for OutputTimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl FromStr for OutputTimeZone {
    type Err = Error;

    /// Parse `UTC`, `Z` or a `+HH:MM` / `-HH:MM` offset
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }

        let invalid = || {
            Error::configuration(format!(
                "Invalid time zone '{trimmed}' (expected 'UTC' or an offset like '+02:00')"
            ))
        };

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };

        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        Self::from_offset_seconds(sign * (hours * 3600 + minutes * 60))
    }
}

impl TryFrom<String> for OutputTimeZone {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputTimeZone> for String {
    fn from(tz: OutputTimeZone) -> Self {
        tz.to_string()
    }
}

impl fmt::Display for OutputTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_utc() {
            write!(f, "UTC")
        } else {
            write!(f, "{}", self.offset)
        }
    }
}

/// Authentication strategy for the collection service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Static development credential, no real authentication
    Development,
    /// Production credentials (not available yet)
    Production,
}

impl AuthMode {
    /// Whether an authenticator exists for this mode
    pub fn is_implemented(self) -> bool {
        matches!(self, AuthMode::Development)
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Development => write!(f, "development"),
            AuthMode::Production => write!(f, "production"),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Overall deadline for one request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Collection service client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the collection service
    pub base_url: String,

    /// Path registering new series
    pub create_path: String,

    /// Path receiving observations
    pub put_path: String,

    /// Timeout for a single request in seconds
    pub timeout_secs: u64,

    /// Authentication strategy
    pub auth_mode: AuthMode,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            create_path: UPSTREAM_CREATE_PATH.to_string(),
            put_path: UPSTREAM_PUT_PATH.to_string(),
            timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            auth_mode: AuthMode::Development,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL for registering series
    pub fn create_url(&self) -> String {
        join_url(&self.base_url, &self.create_path)
    }

    /// Full URL for submitting observations
    pub fn put_url(&self) -> String {
        join_url(&self.base_url, &self.put_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// CSV mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Time zone used to render observation timestamps
    pub time_zone: OutputTimeZone,

    /// Parameters mapped when a request names none
    pub default_parameters: Vec<String>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            time_zone: OutputTimeZone::utc(),
            default_parameters: DEFAULT_PARAMETERS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Global configuration for boatload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub mapping: MappingConfig,
}

impl Config {
    /// Set the server bind address
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Self {
        self.server.bind_addr = bind_addr.into();
        self
    }

    /// Set the maximum upload size in megabytes
    pub fn with_max_upload_mb(mut self, megabytes: usize) -> Result<Self> {
        self.server.max_upload_bytes = megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
            Error::configuration(format!("Maximum upload size of {megabytes} MiB is too large"))
        })?;
        Ok(self)
    }

    /// Set the overall request deadline
    pub fn with_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.server.request_timeout_secs = seconds;
        self
    }

    /// Set the collection service base URL
    pub fn with_upstream_url(mut self, base_url: impl Into<String>) -> Self {
        self.upstream.base_url = base_url.into();
        self
    }

    /// Set the collection service authentication strategy
    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.upstream.auth_mode = auth_mode;
        self
    }

    /// Set the output time zone for observation timestamps
    pub fn with_time_zone(mut self, time_zone: OutputTimeZone) -> Self {
        self.mapping.time_zone = time_zone;
        self
    }

    /// Set the parameters mapped when a request names none
    pub fn with_default_parameters(mut self, parameters: Vec<String>) -> Self {
        self.mapping.default_parameters = parameters;
        self
    }

    /// Validate the configuration before starting anything
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration: {:?}", self);

        self.server.bind_addr.parse::<SocketAddr>().map_err(|e| {
            Error::configuration(format!(
                "Invalid bind address '{}': {}",
                self.server.bind_addr, e
            ))
        })?;

        if self.server.max_upload_bytes == 0 {
            return Err(Error::configuration(
                "Maximum upload size must be greater than 0",
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(Error::configuration(
                "Request timeout must be greater than 0 seconds",
            ));
        }

        if !(self.upstream.base_url.starts_with("http://")
            || self.upstream.base_url.starts_with("https://"))
        {
            return Err(Error::configuration(format!(
                "Upstream URL must start with http:// or https://: '{}'",
                self.upstream.base_url
            )));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(Error::configuration(
                "Upstream timeout must be greater than 0 seconds",
            ));
        }

        if !self.upstream.auth_mode.is_implemented() {
            return Err(Error::configuration(format!(
                "Authentication mode '{}' is not implemented",
                self.upstream.auth_mode
            )));
        }

        if self.mapping.default_parameters.is_empty()
            || self
                .mapping
                .default_parameters
                .iter()
                .any(|p| p.trim().is_empty())
        {
            return Err(Error::configuration(
                "Default parameters must be a non-empty list of column names",
            ));
        }

        Ok(())
    }
}
