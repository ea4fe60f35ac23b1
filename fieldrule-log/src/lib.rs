//! Logging setup for fieldrule
//!
//! The engine only emits `tracing` events: `trace` for each rule it
//! evaluates, `debug` for a violation and `warn` for a broken rule
//! definition. This crate installs a subscriber for applications that do
//! not bring their own.
//!
//! # Examples
//!
//! ```no_run
//! use fieldrule_log::*;
//!
//! // JSON to STDOUT at INFO, unless the environment says otherwise
//! let _guard = LogConfig::from_env().init().unwrap();
//!
//! info!("validation service started");
//! ```
//!
//! ```no_run
//! use fieldrule_log::*;
//!
//! let _guard = LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .with_colors(true)
//!     .init()
//!     .unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `FIELDRULE_LOG_LEVEL=trace|debug|info|warn|error` - Set log level
//! - `FIELDRULE_LOG_FORMAT=json|plain|pretty|compact` - Set output format
//! - `FIELDRULE_LOG_COLOR=1|0` - Enable/disable colors
//! - `RUST_LOG` - Full filter directives, overriding the level

use std::env;
use std::io;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use tracing::{debug, error, info, trace, warn};

pub const ENV_LEVEL: &str = "FIELDRULE_LOG_LEVEL";
pub const ENV_FORMAT: &str = "FIELDRULE_LOG_FORMAT";
pub const ENV_COLOR: &str = "FIELDRULE_LOG_COLOR";

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Every evaluated rule
    Trace,
    /// Violations
    Debug,
    Info,
    /// Broken rule definitions
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Convert to string for EnvFilter
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (default) - structured, machine-readable
    Json,
    /// Plain text format - simple, human-readable
    Plain,
    /// Pretty format - colored, formatted for development
    Pretty,
    /// Compact format - minimal output
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "plain" => Some(LogFormat::Plain),
            "pretty" => Some(LogFormat::Pretty),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

/// Output destination for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

#[derive(Error, Debug)]
pub enum LogError {
    #[error("invalid log filter `{filter}`: {reason}")]
    Filter { filter: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Output destination
    pub output: LogOutput,
    /// Include target (module path)
    pub targets: bool,
    /// Enable ANSI colors (for terminal output)
    pub colors: bool,
    /// Custom filter directives (overrides level if set)
    pub env_filter: Option<String>,
}

impl LogConfig {
    /// Create a new logging configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from `FIELDRULE_LOG_*` variables.
    ///
    /// Unset or unrecognised values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let level = lookup(ENV_LEVEL)
            .and_then(|s| LogLevel::parse(&s))
            .unwrap_or(defaults.level);

        let format = lookup(ENV_FORMAT)
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(defaults.format);

        let colors = lookup(ENV_COLOR)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.colors);

        Self {
            level,
            format,
            colors,
            ..defaults
        }
    }

    /// Set log level
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set output format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set output destination
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Enable or disable target (module path)
    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    /// Enable or disable ANSI colors
    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set custom filter directives, e.g. `"fieldrule_core=trace"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter, LogError> {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).map_err(|e| LogError::Filter {
                filter: directives.clone(),
                reason: e.to_string(),
            }),
            // RUST_LOG wins over the configured level
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))),
        }
    }

    /// Install the global subscriber.
    ///
    /// Returns a guard that must be kept alive for the duration of the
    /// program; dropping it flushes buffered output.
    pub fn init(self) -> Result<WorkerGuard, LogError> {
        let filter = self.filter()?;
        let (writer, guard) = match self.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::Stderr => tracing_appender::non_blocking(io::stderr()),
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_target(self.targets),
                )
                .try_init(),
            LogFormat::Plain => registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_ansi(self.colors),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_ansi(self.colors),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_ansi(self.colors),
                )
                .try_init(),
        };

        installed.map_err(|_| LogError::AlreadyInitialized)?;
        Ok(guard)
    }
}

impl Default for LogConfig {
    /// JSON to STDOUT at INFO level
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            targets: true,
            colors: false,
            env_filter: None,
        }
    }
}
