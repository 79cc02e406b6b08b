//! Time Window Implementation

use crate::Sample;
use std::collections::VecDeque;

/// Ordered sample buffer that evicts by age rather than by count
#[derive(Debug, Clone)]
pub struct TimeWindow<T> {
    /// Samples, oldest first
    samples: VecDeque<Sample<T>>,
    /// Retention duration in seconds
    retention: f64,
}

impl<T> TimeWindow<T> {
    /// Create an empty window with the given retention (seconds)
    pub fn new(retention: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            retention,
        }
    }

    /// Retention duration in seconds
    pub fn retention(&self) -> f64 {
        self.retention
    }

    /// Append a sample at the tail. Timestamps are expected to be non-decreasing.
    pub fn add(&mut self, timestamp: f64, value: T) {
        self.samples.push_back(Sample::new(timestamp, value));
    }

    /// Evict from the head while the oldest sample is older than `cutoff`
    pub fn trim_older_than(&mut self, cutoff: f64) {
        while self
            .samples
            .front()
            .is_some_and(|sample| sample.timestamp < cutoff)
        {
            self.samples.pop_front();
        }
    }

    /// Trim relative to `now` using the configured retention
    pub fn trim_to(&mut self, now: f64) {
        self.trim_older_than(now - self.retention);
    }

    /// Iterate over retained samples, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample<T>> + ExactSizeIterator {
        self.samples.iter()
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&Sample<T>> {
        self.samples.back()
    }

    /// Samples strictly newer than `timestamp`, oldest first
    pub fn since(&self, timestamp: f64) -> impl Iterator<Item = &Sample<T>> {
        let start = self.samples.partition_point(|s| s.timestamp <= timestamp);
        self.samples.range(start..)
    }

    /// Samples no older than `duration` before the newest sample, oldest first
    pub fn trailing(&self, duration: f64) -> impl Iterator<Item = &Sample<T>> {
        let cutoff = self
            .last()
            .map(|s| s.timestamp - duration)
            .unwrap_or(f64::INFINITY);
        let start = self.samples.partition_point(|s| s.timestamp < cutoff);
        self.samples.range(start..)
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T: Clone> TimeWindow<T> {
    /// Retained samples, oldest first
    pub fn all(&self) -> Vec<Sample<T>> {
        self.samples.iter().cloned().collect()
    }

    /// Retained values without timestamps, oldest first
    pub fn values_only(&self) -> Vec<T> {
        self.samples.iter().map(|s| s.value.clone()).collect()
    }
}
