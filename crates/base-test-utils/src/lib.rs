//! Testing utilities for base-util.
//!
//! - **Log capture**: run code under a thread-local JSON subscriber and
//!   inspect every record it wrote.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use base_test_utils::capture_json;
//!
//! let records = capture_json(|| tracing::debug!(rows = 3, "Loaded"));
//! assert_eq!(records[0]["fields"]["rows"], 3);
//! ```

pub mod logs;

pub use logs::{capture_json, SharedBuffer};
