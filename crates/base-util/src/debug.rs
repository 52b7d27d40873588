//! Argument and result logging for function calls.

use crate::log::{get_logger, Logger};
use std::fmt::Debug;

/// Logger name used by [`debug_call!`] when no logger is given.
pub const DEFAULT_LOGGER: &str = "Argument logger";

/// Log `args` at debug level, run `f` on them, then log its result and return it.
///
/// `args` is handed to `f` after logging so each argument is evaluated once.
pub fn log_call<A, R, F>(logger: &Logger, func_name: &str, args: A, f: F) -> R
where
    A: Debug,
    R: Debug,
    F: FnOnce(A) -> R,
{
    crate::log_debug!(
        logger,
        args = ?args,
        "Logging arguments for {}",
        func_name
    );

    let results = f(args);

    crate::log_debug!(
        logger,
        results = ?results,
        "\u{21B3} Logging results for {}",
        func_name
    );

    results
}

/// Default logger for [`log_call`].
pub fn default_logger() -> Logger {
    get_logger(Some(DEFAULT_LOGGER))
}

/// Call a function and log its arguments and result.
///
/// Arguments must be plain identifiers; they are moved into the call.
///
/// # Example
///
/// ```rust,ignore
/// use base_util::debug_call;
///
/// let (a, b) = (2, 3);
/// let total = debug_call!(add(a, b));
/// ```
#[macro_export]
macro_rules! debug_call {
    ($func:ident ( $($arg:ident),* $(,)? )) => {
        $crate::debug_call!(&$crate::debug::default_logger(), $func($($arg),*))
    };
    ($logger:expr, $func:ident ( $($arg:ident),* $(,)? )) => {
        $crate::debug::log_call(
            $logger,
            stringify!($func),
            ($($arg,)*),
            |($($arg,)*)| $func($($arg),*),
        )
    };
}
