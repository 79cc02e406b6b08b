//! Aggressive cornering with speed-dependent thresholds

use super::Detection;
use crate::config::ScoringConfig;
use crate::event::{EventKind, Severity};
use crate::store::SafetyWindows;

/// Lateral-g and yaw-rate limits at a given speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CorneringThresholds {
    pub lateral_g: f64,
    pub yaw_rate: f64,
}

impl CorneringThresholds {
    /// Interpolate linearly between the low- and high-speed anchors, then
    /// bound each threshold by its configured min and max
    pub fn at_speed(speed: f64, config: &ScoringConfig) -> Self {
        let low = config.corner_low_speed_kmh;
        let high = config.corner_high_speed_kmh;
        let ratio = if high - low > 0.0 {
            ((speed - low) / (high - low)).max(0.0).min(1.0)
        } else if speed >= high {
            1.0
        } else {
            0.0
        };

        let lateral_g = config.lat_g_threshold_low_speed
            + (config.lat_g_threshold_high_speed - config.lat_g_threshold_low_speed) * ratio;
        let yaw_rate = config.yaw_threshold_low_speed
            + (config.yaw_threshold_high_speed - config.yaw_threshold_low_speed) * ratio;

        Self {
            lateral_g: lateral_g.max(config.lat_g_threshold_min).min(config.max_lat_g),
            yaw_rate: yaw_rate.max(config.yaw_threshold_min).min(config.max_yaw_rate),
        }
    }
}

/// Overshoot of `value` past `threshold`, normalised by the headroom to `max`
fn overshoot(value: f64, threshold: f64, max: f64) -> f64 {
    let headroom = max - threshold;
    if headroom > 0.0 {
        ((value - threshold) / headroom).max(0.0)
    } else {
        0.0
    }
}

/// Worst cornering sample among those newer than `since` taken above the
/// driving speed
pub(super) fn detect(
    safety: &SafetyWindows,
    config: &ScoringConfig,
    since: f64,
) -> Option<Detection> {
    let samples = safety
        .lateral_g
        .since(since)
        .zip(safety.yaw_rate.since(since))
        .zip(safety.speed.since(since));

    let mut worst: Option<(f64, f64, f64)> = None;
    for ((lat, yaw), speed) in samples {
        if speed.value <= config.min_driving_speed_kmh {
            continue;
        }
        let lat_g = lat.value.abs();
        let yaw_rate = yaw.value.abs();
        let thresholds = CorneringThresholds::at_speed(speed.value, config);
        if lat_g <= thresholds.lateral_g && yaw_rate <= thresholds.yaw_rate {
            continue;
        }

        let factor = overshoot(lat_g, thresholds.lateral_g, config.max_lat_g).max(overshoot(
            yaw_rate,
            thresholds.yaw_rate,
            config.max_yaw_rate,
        ));
        if worst.map_or(true, |(f, _, _)| factor > f) {
            worst = Some((factor, lat_g, yaw_rate));
        }
    }

    let (factor, lat_g, yaw_rate) = worst?;
    let penalty = config.cornering_penalty * factor.powf(config.cornering_exponent);
    if !(penalty > 0.0) {
        return None;
    }

    let severity = if factor >= 0.5 {
        Severity::Critical
    } else if factor >= 0.2 {
        Severity::High
    } else {
        Severity::Medium
    };

    Some(Detection {
        kind: EventKind::AggressiveCornering,
        severity,
        penalty,
        message: format!(
            "aggressive cornering: lateral {:.1} m/s^2, yaw {:.1} deg/s",
            lat_g, yaw_rate
        ),
    })
}
