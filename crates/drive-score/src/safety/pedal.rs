//! Aggressive accelerator use, read from the eco pedal window

use super::{Detection, Freshness};
use crate::config::ScoringConfig;
use crate::event::{EventKind, Severity};
use crate::store::EcoWindows;
use signal_stats::{interval_rates, rates_of_change, time_weighted_share, SignalStatistics};
use time_window::Sample;

/// Heavy-use rules in priority order, over samples not yet charged.
///
/// Returns the severity, the share of the pedal penalty and a message.
fn heavy_use(samples: &[Sample<f64>], config: &ScoringConfig) -> Option<(Severity, f64, String)> {
    if samples.len() < 2 {
        return None;
    }

    let stats = SignalStatistics::compute(samples);
    let extreme_share = time_weighted_share(samples, |&pos| pos >= config.pedal_extreme_pct);
    let sudden_changes = if config.pedal_sudden_change_rate > 0.0 {
        rates_of_change(samples)
            .iter()
            .filter(|r| r.abs() >= config.pedal_sudden_change_rate)
            .count()
    } else {
        0
    };

    if extreme_share >= config.pedal_extreme_share {
        Some((
            Severity::High,
            0.8,
            format!(
                "pedal above {:.0}% for {:.0}% of the last {:.0}s",
                config.pedal_extreme_pct,
                extreme_share * 100.0,
                stats.span
            ),
        ))
    } else if config.pedal_sudden_change_count > 0
        && sudden_changes >= config.pedal_sudden_change_count
    {
        Some((
            Severity::Medium,
            0.6,
            format!("{sudden_changes} sudden pedal changes"),
        ))
    } else if stats.mean >= config.pedal_erratic_mean_pct
        && stats.std_dev >= config.pedal_erratic_std_pct
    {
        Some((
            Severity::Medium,
            0.5,
            format!(
                "erratic heavy pedal, mean {:.0}% spread {:.0}%",
                stats.mean, stats.std_dev
            ),
        ))
    } else if stats.mean >= config.pedal_sustained_mean_pct {
        Some((
            Severity::Low,
            0.4,
            format!("sustained heavy pedal, mean {:.0}%", stats.mean),
        ))
    } else {
        None
    }
}

pub(super) fn detect(
    eco: &EcoWindows,
    config: &ScoringConfig,
    window: Freshness,
) -> Option<Detection> {
    let samples: Vec<Sample<f64>> = eco
        .pedal_position
        .trailing(config.pedal_analysis_sec)
        .copied()
        .collect();
    if samples.len() < 2 {
        return None;
    }

    let rises = interval_rates(&samples);
    let max_rise = rises.iter().map(|r| r.value).fold(0.0, f64::max);

    let penalty = config.pedal_penalty;
    let (severity, penalty, message) =
        if config.pedal_slam_rate > 0.0 && max_rise >= config.pedal_slam_rate {
            // A slam claims the span even when an earlier recompute charged it
            let peak = window.new_run_peak(&rises, |rate| rate >= config.pedal_slam_rate)?;
            let factor = ((peak - config.pedal_slam_rate) / config.pedal_slam_rate)
                .max(0.0)
                .min(1.0);
            (
                Severity::High,
                penalty * (0.6 + 0.4 * factor),
                format!("pedal slammed at {peak:.0} %/s"),
            )
        } else {
            let (severity, share, message) = heavy_use(window.unpaid(&samples)?, config)?;
            (severity, penalty * share, message)
        };

    (penalty > 0.0).then(|| Detection {
        kind: EventKind::AggressivePedal,
        severity,
        penalty,
        message,
    })
}
