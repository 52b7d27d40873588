//! Logging setup using tracing.
//!
//! [`init`] installs a global `tracing-subscriber` registry once per process.
//! [`get_logger`] hands out named [`Logger`] handles and initializes logging
//! from the environment when nothing has been configured yet.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::str::FromStr;
use tracing::Span;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "BASE_LOG_LEVEL";

/// Environment variable holding the output format (`console` or `json`).
pub const LOG_FORMAT_ENV: &str = "BASE_LOG_FORMAT";

/// Name used by [`get_logger`] when no name is given.
pub const ROOT_LOGGER: &str = "root";

static INITIALIZED: OnceCell<bool> = OnceCell::new();

/// Verbosity of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `Debug` when `debug` is set, `Info` otherwise.
    pub fn from_debug(debug: bool) -> Self {
        if debug {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(Error::config(format!("unknown log level '{s}'"))),
        }
    }
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one line per event.
    #[default]
    Console,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" | "text" | "pretty" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            _ => Err(Error::config(format!("unknown log format '{s}'"))),
        }
    }
}

/// Logging configuration.
///
/// Deserializable so host applications can embed it in their own config files:
///
/// ```json
/// { "level": "debug", "format": "json" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level. `RUST_LOG` overrides it when set.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
    /// Whether to include the event target (module path) in logs.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Console,
            include_location: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Default configuration at debug or info level.
    pub fn debug(debug: bool) -> Self {
        Self {
            level: LogLevel::from_debug(debug),
            ..Self::default()
        }
    }

    /// Read the configuration from `BASE_LOG_LEVEL` and `BASE_LOG_FORMAT`.
    ///
    /// Unset variables keep their defaults; unparseable values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(LOG_LEVEL_ENV) {
            config.level = value.parse().map_err(|_| {
                Error::config(format!("invalid {LOG_LEVEL_ENV} value '{value}'"))
            })?;
        }

        if let Some(value) = lookup(LOG_FORMAT_ENV) {
            config.format = value.parse().map_err(|_| {
                Error::config(format!("invalid {LOG_FORMAT_ENV} value '{value}'"))
            })?;
        }

        Ok(config)
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initialize logging with the given configuration.
///
/// Only the first call in a process has an effect. Returns `true` when this
/// call installed the global subscriber, `false` when logging was already
/// initialized or another global subscriber was set elsewhere.
pub fn init(config: LogConfig) -> bool {
    let mut installed = false;
    INITIALIZED.get_or_init(|| {
        installed = install(&config);
        true
    });
    installed
}

/// Whether [`init`] has run in this process.
pub fn is_initialized() -> bool {
    INITIALIZED.get().is_some()
}

fn install(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.directive()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Console => {
            let fmt_layer = fmt::layer()
                .with_target(config.with_target)
                .with_level(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            registry.with(fmt_layer).try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_level(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            registry.with(fmt_layer).try_init()
        }
    };

    result.is_ok()
}

/// Get a named logger, initializing logging from the environment if needed.
///
/// An invalid environment configuration falls back to the defaults rather
/// than failing the caller.
pub fn get_logger(name: Option<&str>) -> Logger {
    if !is_initialized() {
        init(LogConfig::from_env().unwrap_or_default());
    }

    Logger::new(name.unwrap_or(ROOT_LOGGER))
}

/// A named structured logger.
///
/// Events are emitted inside an info-level span carrying the logger name, so
/// the name is attached to every record the fmt layer writes.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    span: Span,
}

impl Logger {
    /// Create a logger without touching the global logging setup.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("logger", logger = %name);
        Self { name, span }
    }

    /// Logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Span that events from this logger are attached to.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `f` with this logger's span entered.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.span.in_scope(f)
    }

    /// Emit a debug event. Use [`log_debug!`](crate::log_debug) to attach fields.
    pub fn debug(&self, message: &str) {
        crate::log_debug!(self, "{}", message);
    }

    pub fn info(&self, message: &str) {
        crate::log_info!(self, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        crate::log_warn!(self, "{}", message);
    }

    pub fn error(&self, message: &str) {
        crate::log_error!(self, "{}", message);
    }
}

#[doc(hidden)]
pub use tracing as __tracing;

/// Emit a debug event with structured fields through a [`Logger`].
///
/// Takes the logger followed by the usual `tracing` field and message syntax.
///
/// # Example
///
/// ```rust,ignore
/// use base_util::{get_logger, log_debug};
///
/// let logger = get_logger(Some("ingest"));
/// log_debug!(logger, rows = 120, source = %path.display(), "Loaded batch");
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::__tracing::debug!(parent: $crate::log::Logger::span(&$logger), $($arg)+)
    };
}

/// Emit an info event with structured fields through a [`Logger`].
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::__tracing::info!(parent: $crate::log::Logger::span(&$logger), $($arg)+)
    };
}

/// Emit a warn event with structured fields through a [`Logger`].
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::__tracing::warn!(parent: $crate::log::Logger::span(&$logger), $($arg)+)
    };
}

/// Emit an error event with structured fields through a [`Logger`].
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log::__tracing::error!(parent: $crate::log::Logger::span(&$logger), $($arg)+)
    };
}
