//! Error Types

use thiserror::Error;

/// Configuration rejected by [`ScoringConfig::validate`](crate::ScoringConfig::validate)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Value must be strictly positive
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// Value must not be negative
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// Tier boundaries must be ascending
    #[error("{field} thresholds must be ascending: {values:?}")]
    UnorderedTiers {
        field: &'static str,
        values: [f64; 3],
    },

    /// A lower bound exceeds its upper bound
    #[error("{field}: lower bound {low} exceeds upper bound {high}")]
    InvertedRange {
        field: &'static str,
        low: f64,
        high: f64,
    },
}

/// Notification could not be delivered
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// Receiver is not keeping up
    #[error("notification channel is full")]
    Full,

    /// Receiver has gone away
    #[error("notification channel is closed")]
    Closed,

    /// Sink-specific failure
    #[error("notification sink failed: {0}")]
    Other(String),
}
