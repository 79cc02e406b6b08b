//! Time Windows
//!
//! Provides an ordered, timestamp-keyed sample buffer that ages out
//! entries older than a retention duration.

mod window;

pub use window::TimeWindow;

use serde::{Deserialize, Serialize};

/// One timestamped observation of a signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    /// Seconds, caller-supplied and non-decreasing
    pub timestamp: f64,
    pub value: T,
}

impl<T> Sample<T> {
    pub fn new(timestamp: f64, value: T) -> Self {
        Self { timestamp, value }
    }
}
