//! Shared utilities used across projects.
//!
//! This crate provides:
//! - Logging setup with tracing and named structured loggers
//! - Scoped temporary directories that never escape the platform temp root
//! - RAII-based timing that logs elapsed durations
//! - Argument/result logging for function calls
//! - Random identifier generation

pub mod debug;
pub mod error;
pub mod id;
pub mod log;
pub mod tempdir;
pub mod timer;

pub use debug::log_call;
pub use error::{Error, Result};
pub use id::Identifier;
pub use log::{get_logger, init, LogConfig, LogFormat, LogLevel, Logger};
pub use tempdir::{sweep_live, temp_root, TempDirScope, TempDirectory};
pub use timer::Timer;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
