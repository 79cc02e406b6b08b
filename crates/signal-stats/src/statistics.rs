//! Dispersion Statistics

use crate::temporal::rates_of_change;
use serde::{Deserialize, Serialize};
use time_window::Sample;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator), 0 for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (m2 / (values.len() - 1) as f64).sqrt()
}

/// Summary statistics for one signal over a window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalStatistics {
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean absolute rate of change (units per second)
    pub mean_abs_rate: f64,
    /// Largest absolute rate of change
    pub max_abs_rate: f64,
    /// Largest positive rate of change
    pub max_rise_rate: f64,
    /// Elapsed time covered by the samples (seconds)
    pub span: f64,
}

impl SignalStatistics {
    /// Compute statistics from timestamped samples
    pub fn compute(samples: &[Sample<f64>]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let rates = rates_of_change(samples);
        let abs_rates: Vec<f64> = rates.iter().map(|r| r.abs()).collect();
        let max_abs_rate = abs_rates.iter().cloned().fold(0.0, f64::max);
        let max_rise_rate = rates.iter().cloned().fold(0.0, f64::max);

        let span = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0.0),
            _ => 0.0,
        };

        Self {
            mean: mean(&values),
            std_dev: sample_std_dev(&values),
            min,
            max,
            mean_abs_rate: mean(&abs_rates),
            max_abs_rate,
            max_rise_rate,
            span,
        }
    }
}
