//! # Logging & Tracing Infrastructure
//!
//! Provides structured logging with the `tracing` crate, supporting:
//! - Pretty, compact and JSON output formats
//! - Module-level filtering
//! - Redaction helpers for credentials, emails and paths
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug);
//!
//! init_logging(config)?;
//! tracing::info!("Uploader started");
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Minimum severity emitted by the uploader's own crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Map a `-v` repeat count onto a level, starting from `Info`.
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Single-line format for terminals and cron logs
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(Error::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_auth=debug,core_sync=trace")
    pub filter: Option<String>,
    /// Display target module in logs
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Enable or disable thread info
    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the logging system
///
/// This should be called once during application startup. Subsequent calls
/// will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The custom filter string does not parse
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom_filter) => custom_filter.clone(),
        // Our crates at the requested level, dependencies at warn
        None => {
            let level = config.level.as_filter_str();
            let ours = [
                "image_uploader",
                "core_runtime",
                "core_auth",
                "core_sync",
                "provider_fileserver",
                "bridge_desktop",
            ]
            .iter()
            .map(|krate| format!("{}={}", krate, level))
            .collect::<Vec<_>>()
            .join(",");
            format!("warn,{},h2=warn,hyper=warn,reqwest=warn", ours)
        }
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Helper function to redact sensitive field values
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("access_token", "eyJhbGci"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("file", "12345.jpg"), "12345.jpg");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "password",
        "secret",
        "api_key",
        "authorization",
        "bearer",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else if value.contains('@') && value.contains('.') {
        // Likely an email, keep the first char
        match value.find('@') {
            Some(at_pos) => format!("{}***@[REDACTED]", &value[..1.min(at_pos)]),
            None => value.to_string(),
        }
    } else {
        value.to_string()
    }
}

/// Strip full file paths to basename only
///
/// ```
/// use core_runtime::logging::strip_path;
///
/// assert_eq!(strip_path("/srv/images/12345.jpg"), "12345.jpg");
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(LogLevel::Debug)
            .with_filter("core_auth=trace")
            .with_target(false)
            .with_thread_info(true);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.filter, Some("core_auth=trace".to_string()));
        assert!(!config.display_target);
        assert!(config.display_thread_info);
    }

    #[test]
    fn test_default_format_is_compact() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
        assert_eq!(LoggingConfig::default().level, LogLevel::Info);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(5), LogLevel::Trace);
        assert!(LogLevel::Debug < LogLevel::Warn);
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert_eq!(
            redact_if_sensitive("access_token", "secret123"),
            "[REDACTED]"
        );
        assert_eq!(redact_if_sensitive("Authorization", "Bearer x"), "[REDACTED]");
        assert_eq!(redact_if_sensitive("password", "pass"), "[REDACTED]");

        let redacted = redact_if_sensitive("username", "user@example.com");
        assert!(redacted.starts_with('u'));
        assert!(redacted.contains("[REDACTED]"));

        assert_eq!(redact_if_sensitive("file", "12345.jpg"), "12345.jpg");
    }

    #[test]
    fn test_strip_path() {
        assert_eq!(strip_path("/srv/images/12345.jpg"), "12345.jpg");
        assert_eq!(strip_path("C:\\Images\\tn_12345.jpg"), "tn_12345.jpg");
        assert_eq!(strip_path("12345.jpg"), "12345.jpg");
        assert_eq!(strip_path("/var/log/"), "");
    }

    #[test]
    fn test_build_filter() {
        let config = LoggingConfig::default().with_level(LogLevel::Debug);
        let filter = build_filter(&config).unwrap().to_string();

        assert!(filter.contains("core_sync=debug"));
        assert!(filter.contains("reqwest=warn"));
    }

    #[test]
    fn test_build_custom_filter() {
        let config = LoggingConfig::default().with_filter("core_auth=trace,core_sync=debug");
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("core_auth=trace"));
    }

    #[test]
    fn test_invalid_custom_filter() {
        let config = LoggingConfig::default().with_filter("core_auth=loud");
        assert!(matches!(build_filter(&config), Err(Error::Config(_))));
    }
}
