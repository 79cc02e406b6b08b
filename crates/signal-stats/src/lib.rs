//! Signal Statistics
//!
//! Numeric helpers over time windows. Sample spacing is irregular, so
//! anything involving rates or durations works from timestamps rather than
//! sample counts.

mod statistics;
mod temporal;

pub use statistics::{mean, sample_std_dev, SignalStatistics};
pub use temporal::{
    interval_rates, moving_average, rates_of_change, rising_edges, time_weighted_share,
    transitions,
};
