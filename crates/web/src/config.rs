//! Host configuration from `VETCARD_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use vetcard_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "VETCARD_BIND_ADDR";
pub const API_URL_VAR: &str = "VETCARD_API_URL";
pub const SESSION_FILE_VAR: &str = "VETCARD_SESSION_FILE";
pub const LOG_FORMAT_VAR: &str = "VETCARD_LOG_FORMAT";
pub const HTTP_TIMEOUT_VAR: &str = "VETCARD_HTTP_TIMEOUT_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_addr: SocketAddr,
    /// Backend base URL; `None` serves the built-in demo backend.
    pub api_url: Option<String>,
    /// Where the session is persisted; `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
    pub log_format: LogFormat,
    pub http_timeout: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_url: None,
            session_file: None,
            log_format: LogFormat::Json,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| ConfigError::invalid(BIND_ADDR_VAR, format!("'{bind}' is not a socket address")))?;

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|e: vetcard_observability::ParseLogFormatError| {
                    ConfigError::invalid(LOG_FORMAT_VAR, e.to_string())
                })?,
            None => LogFormat::default(),
        };

        let timeout_secs = match get(HTTP_TIMEOUT_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid(HTTP_TIMEOUT_VAR, format!("'{raw}' is not a whole number")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            bind_addr,
            api_url: get(API_URL_VAR),
            session_file: get(SESSION_FILE_VAR).map(PathBuf::from),
            log_format,
            http_timeout: Duration::from_secs(timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.http_timeout.as_secs();
        if !(1..=MAX_TIMEOUT_SECS).contains(&secs) || self.http_timeout.subsec_nanos() != 0 {
            return Err(ConfigError::invalid(
                HTTP_TIMEOUT_VAR,
                format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
            ));
        }

        if let Some(url) = &self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid(API_URL_VAR, "must be an http(s) URL"));
            }
        }

        Ok(())
    }
}
