//! Jerky steering over a short trailing span

use super::{Detection, Freshness};
use crate::config::ScoringConfig;
use crate::event::{EventKind, Severity};
use crate::store::SafetyWindows;
use signal_stats::{interval_rates, mean, moving_average, rates_of_change, sample_std_dev};
use time_window::Sample;

/// One completed swing between two turning points
#[derive(Debug, Clone, Copy, PartialEq)]
struct Reversal {
    /// Angle swept (deg)
    magnitude: f64,
    /// Time from the previous turning point to this one (s)
    span: f64,
}

/// Turning points of the trace, ignoring wiggles smaller than `noise`
fn find_reversals(trace: &[Sample<f64>], noise: f64) -> Vec<Reversal> {
    let mut reversals = Vec::new();
    let Some(first) = trace.first() else {
        return reversals;
    };

    let mut anchor = *first;
    let mut peak = *first;
    let mut direction = 0.0_f64;

    for &sample in &trace[1..] {
        if direction == 0.0 {
            let delta = sample.value - anchor.value;
            if delta.abs() >= noise && delta != 0.0 {
                direction = delta.signum();
                peak = sample;
            }
            continue;
        }

        if (sample.value - peak.value) * direction > 0.0 {
            peak = sample;
        } else if (peak.value - sample.value) * direction >= noise {
            reversals.push(Reversal {
                magnitude: (peak.value - anchor.value).abs(),
                span: peak.timestamp - anchor.timestamp,
            });
            anchor = peak;
            peak = sample;
            direction = -direction;
        }
    }

    reversals
}

/// Penalty share for a rate spike, rising with how far the rate overshoots
fn spike_factor(rate: f64, config: &ScoringConfig) -> f64 {
    let headroom = config.max_steering_rate_dps - config.steering_spike_rate_dps;
    if headroom > 0.0 {
        ((rate - config.steering_spike_rate_dps) / headroom)
            .max(0.0)
            .min(1.0)
    } else {
        0.0
    }
}

/// Oscillation rules in priority order, over an already smoothed trace.
///
/// Returns the severity, the share of the steering penalty and a message.
fn oscillation(
    trace: &[Sample<f64>],
    config: &ScoringConfig,
) -> Option<(Severity, f64, String)> {
    if trace.len() < 3 {
        return None;
    }

    let abs_rates: Vec<f64> = rates_of_change(trace).iter().map(|r| r.abs()).collect();
    let mean_rate = mean(&abs_rates);
    let smoothed: Vec<f64> = trace.iter().map(|s| s.value).collect();
    let angle_std = sample_std_dev(&smoothed);
    let span = trace[trace.len() - 1].timestamp - trace[0].timestamp;

    let reversals = find_reversals(trace, config.steering_noise_deg);
    let significant = reversals
        .iter()
        .filter(|r| r.magnitude >= config.steering_significant_deg)
        .count();
    let rapid = reversals
        .iter()
        .filter(|r| {
            r.magnitude >= config.steering_significant_deg
                && r.span <= config.steering_rapid_span_sec
        })
        .count();
    let frequency = if span > 0.0 {
        reversals.len() as f64 / span
    } else {
        0.0
    };

    if reversals.len() >= 3 && frequency >= config.steering_reversal_freq_hz {
        Some((
            Severity::High,
            0.8,
            format!("rapid steering reversals at {frequency:.1} Hz"),
        ))
    } else if angle_std > config.steering_angle_std_deg
        && mean_rate > config.steering_elevated_rate_dps
    {
        Some((
            Severity::Medium,
            0.7,
            format!("erratic steering, angle spread {angle_std:.0} deg"),
        ))
    } else if significant >= 3 || rapid >= 2 {
        Some((
            Severity::Medium,
            0.6,
            format!("{significant} large steering swings ({rapid} rapid)"),
        ))
    } else if reversals.len() >= 4 && mean_rate > config.steering_moderate_rate_dps {
        Some((
            Severity::Low,
            0.4,
            format!("sustained steering oscillation, {} reversals", reversals.len()),
        ))
    } else {
        None
    }
}

pub(super) fn detect(
    safety: &SafetyWindows,
    config: &ScoringConfig,
    window: Freshness,
) -> Option<Detection> {
    let raw: Vec<Sample<f64>> = safety
        .steering_angle
        .trailing(config.steering_analysis_sec)
        .copied()
        .collect();
    if raw.len() < 3 {
        return None;
    }

    let values: Vec<f64> = raw.iter().map(|s| s.value).collect();
    let trace: Vec<Sample<f64>> = raw
        .iter()
        .zip(moving_average(&values, config.steering_smoothing_samples))
        .map(|(s, smoothed)| Sample::new(s.timestamp, smoothed))
        .collect();

    let abs_rates: Vec<Sample<f64>> = interval_rates(&trace)
        .into_iter()
        .map(|r| Sample::new(r.timestamp, r.value.abs()))
        .collect();
    let max_rate = abs_rates.iter().map(|r| r.value).fold(0.0, f64::max);

    let penalty = config.steering_penalty;
    let (severity, penalty, message) = if max_rate > config.steering_spike_rate_dps {
        // A spike claims the span even when an earlier recompute charged it
        let peak = window
            .new_run_peak(&abs_rates, |rate| rate > config.steering_spike_rate_dps)?;
        let factor = spike_factor(peak, config);
        let severity = if factor >= 0.5 {
            Severity::Critical
        } else {
            Severity::High
        };
        (
            severity,
            penalty * (0.6 + 0.4 * factor.powf(config.steering_exponent)),
            format!("steering rate spike of {peak:.0} deg/s"),
        )
    } else {
        let (severity, share, message) = oscillation(window.unpaid(&trace)?, config)?;
        (severity, penalty * share, message)
    };

    (penalty > 0.0).then(|| Detection {
        kind: EventKind::JerkySteering,
        severity,
        penalty,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::store::SignalWindowStore;

    fn trace(values: &[f64], dt: f64) -> Vec<Sample<f64>> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as f64 * dt, v))
            .collect()
    }

    fn store_with_angles(angles: &[f64], dt: f64) -> SignalWindowStore {
        let mut store = SignalWindowStore::with_retention(60.0, 10.0);
        for (i, &angle) in angles.iter().enumerate() {
            store.update(&Snapshot {
                wheel_speed_kmh: 50.0,
                steering_angle_deg: angle,
                ..Snapshot::at(i as f64 * dt)
            });
        }
        store
    }

    #[test]
    fn test_reversals_ignore_noise() {
        let wiggle = trace(&[0.0, 1.0, 0.0, 1.0, 0.0], 0.1);
        assert!(find_reversals(&wiggle, 2.0).is_empty());

        let swing = trace(&[0.0, 20.0, 40.0, 10.0, -20.0, 10.0], 0.1);
        let reversals = find_reversals(&swing, 2.0);
        assert_eq!(reversals.len(), 2);
        assert!((reversals[0].magnitude - 40.0).abs() < 1e-9);
        assert!((reversals[1].magnitude - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_steady_steering_is_quiet() {
        let config = ScoringConfig::default();
        let store = store_with_angles(&[5.0; 30], 0.1);
        assert!(detect(store.safety(), &config, Freshness::OPEN).is_none());
    }

    #[test]
    fn test_gradual_turn_is_quiet() {
        let config = ScoringConfig::default();
        let angles: Vec<f64> = (0..30).map(|i| i as f64 * 2.0).collect();
        let store = store_with_angles(&angles, 0.1);
        assert!(detect(store.safety(), &config, Freshness::OPEN).is_none());
    }

    #[test]
    fn test_rate_spike() {
        let config = ScoringConfig::default();
        let mut angles = vec![0.0; 10];
        angles.extend([200.0; 10]);
        let store = store_with_angles(&angles, 0.1);

        // Smoothed step of 200/3 deg per 0.1 s; the spread and average
        // rate would also read as erratic, the spike takes precedence
        let detection = detect(store.safety(), &config, Freshness::OPEN).unwrap();
        assert_eq!(detection.kind, EventKind::JerkySteering);
        assert_eq!(detection.severity, Severity::Critical);
        let factor = (2000.0 / 3.0 - 300.0) / (756.0 - 300.0);
        let expected = config.steering_penalty * (0.6 + 0.4 * factor);
        assert!((detection.penalty - expected).abs() < 1e-6);
    }

    #[test]
    fn test_spike_seen_only_once() {
        let config = ScoringConfig::default();
        let mut angles = vec![0.0; 10];
        angles.extend([200.0; 5]);
        let store = store_with_angles(&angles, 0.1);

        // Step begins at 1.0 s and a recompute at 1.05 s already judged it.
        // The rest of the smoothed ramp must not read as erratic steering.
        let later = Freshness {
            since: 1.05,
            charged: 1.05,
        };
        assert!(detect(store.safety(), &config, later).is_none());
    }

    #[test]
    fn test_sawing_wheel_detected() {
        let config = ScoringConfig::default();
        let angles: Vec<f64> = (0..30)
            .map(|i| (200.0 * (i as f64 * 0.1 * 15.0).sin()).max(-103.0).min(103.0))
            .collect();
        let store = store_with_angles(&angles, 0.1);

        let detection = detect(store.safety(), &config, Freshness::OPEN).unwrap();
        assert_eq!(detection.severity, Severity::Critical);
        assert!(detection.message.starts_with("steering rate spike"));
    }

    fn triangle(amplitude: f64, n: usize) -> Vec<Sample<f64>> {
        let cycle = [0.0, amplitude, 0.0, -amplitude];
        let values: Vec<f64> = (0..n).map(|i| cycle[i % 4]).collect();
        trace(&values, 0.1)
    }

    fn share(trace: &[Sample<f64>], config: &ScoringConfig) -> Option<f64> {
        oscillation(trace, config).map(|(_, share, _)| share)
    }

    #[test]
    fn test_reversal_frequency() {
        let config = ScoringConfig::default();
        // Ten 20 deg reversals in 2 s
        let (severity, share, _) = oscillation(&triangle(10.0, 21), &config).unwrap();
        assert_eq!(severity, Severity::High);
        assert_eq!(share, 0.8);
    }

    #[test]
    fn test_erratic_angle() {
        let config = ScoringConfig::default();
        // Sweep across 160 deg at 80 deg/s, no reversal
        let values: Vec<f64> = (0..21).map(|i| -80.0 + 8.0 * i as f64).collect();
        assert_eq!(share(&trace(&values, 0.1), &config), Some(0.7));
    }

    #[test]
    fn test_rapid_swings() {
        let config = ScoringConfig::default();
        // Out 40 deg and back within 0.4 s, then held
        let mut values = vec![0.0, 20.0, 40.0, 20.0, 0.0];
        values.extend([10.0; 16]);
        let (severity, share, _) = oscillation(&trace(&values, 0.1), &config).unwrap();
        assert_eq!(severity, Severity::Medium);
        assert_eq!(share, 0.6);
    }

    #[test]
    fn test_sustained_oscillation() {
        let config = ScoringConfig {
            steering_reversal_freq_hz: 10.0,
            ..Default::default()
        };
        let (severity, share, _) = oscillation(&triangle(10.0, 21), &config).unwrap();
        assert_eq!(severity, Severity::Low);
        assert_eq!(share, 0.4);
    }

    #[test]
    fn test_rule_priority() {
        // Wide, fast sawing matches every oscillation rule
        let wide = triangle(40.0, 21);
        assert_eq!(share(&wide, &ScoringConfig::default()), Some(0.8));

        // Without the frequency rule, erratic angle outranks the swing rules
        let config = ScoringConfig {
            steering_reversal_freq_hz: 10.0,
            ..Default::default()
        };
        assert_eq!(share(&wide, &config), Some(0.7));
    }

    #[test]
    fn test_spike_factor_guard() {
        let config = ScoringConfig {
            steering_spike_rate_dps: 800.0,
            ..Default::default()
        };
        assert_eq!(spike_factor(900.0, &config), 0.0);
    }
}
