//! RAII-based timer that logs the elapsed time of a scope.
//!
//! # Example
//!
//! ```rust,ignore
//! use base_util::timer::Timer;
//!
//! fn rebuild_index() {
//!     let _timer = Timer::new(Some("Rebuilt index"), None);
//!     // ... work ...
//!     // `timed_duration` is logged when _timer is dropped
//! }
//! ```

use crate::log::{get_logger, Logger};
use std::time::{Duration, Instant};

/// Message logged when none is given.
pub const DEFAULT_MESSAGE: &str = "Timed duration";

/// Logger name used when no logger is given.
pub const DEFAULT_LOGGER: &str = "Timer";

/// RAII guard that measures a scope and logs its duration.
///
/// On drop (or [`Timer::stop`]) emits one debug event with the message and a
/// `timed_duration` field holding the elapsed seconds rounded to 3 decimals.
pub struct Timer {
    msg: String,
    logger: Logger,
    start: Instant,
    stopped: bool,
}

impl Timer {
    /// Create a timer. The clock starts immediately.
    pub fn new(msg: Option<&str>, logger: Option<Logger>) -> Self {
        let msg = msg
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MESSAGE)
            .to_string();
        let logger = logger.unwrap_or_else(|| get_logger(Some(DEFAULT_LOGGER)));

        Self {
            msg,
            logger,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Time `f` and log its duration under `msg`.
    pub fn time<R>(msg: &str, f: impl FnOnce() -> R) -> R {
        let _timer = Self::new(Some(msg), None);
        f()
    }

    /// Reset the start of the measurement to now.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Message that will be logged.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Get the elapsed time so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds rounded to 3 decimal places.
    pub fn elapsed_secs(&self) -> f64 {
        round_secs(self.elapsed())
    }

    /// Log the duration now and return it.
    pub fn stop(mut self) -> Duration {
        let duration = self.elapsed();
        self.log(duration);
        duration
    }

    fn log(&mut self, duration: Duration) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        crate::log_debug!(
            self.logger,
            timed_duration = round_secs(duration),
            "{}",
            self.msg
        );
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.elapsed();
        self.log(duration);
    }
}

fn round_secs(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0).round() / 1000.0
}

/// Convenience macro for timing a block of code.
///
/// # Example
///
/// ```rust,ignore
/// use base_util::time_block;
///
/// let rows = time_block!("Loaded rows", {
///     load_rows()
/// });
/// ```
#[macro_export]
macro_rules! time_block {
    ($msg:expr, $block:expr) => {{
        let _timer = $crate::timer::Timer::new(Some($msg), None);
        $block
    }};
}
