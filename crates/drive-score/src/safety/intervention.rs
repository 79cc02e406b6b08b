//! Stability control and ABS activations

use super::Detection;
use crate::config::ScoringConfig;
use crate::event::{EventKind, Severity};
use crate::store::SafetyWindows;
use time_window::TimeWindow;

/// Whether `flag` switched on at any sample newer than `since` taken
/// above `min_speed`.
///
/// A sample with no predecessor in the window is compared against "off".
/// `speed` must hold one sample per flag sample.
fn activated_since(
    flag: &TimeWindow<bool>,
    speed: &TimeWindow<f64>,
    since: f64,
    min_speed: f64,
) -> bool {
    let mut previous = false;
    for (sample, speed) in flag.iter().zip(speed.iter()) {
        if sample.timestamp > since && sample.value && !previous && speed.value > min_speed {
            return true;
        }
        previous = sample.value;
    }
    false
}

pub(super) fn detect(
    safety: &SafetyWindows,
    config: &ScoringConfig,
    since: f64,
) -> Option<Detection> {
    let systems: Vec<&str> = [
        ("traction control", &safety.traction_control),
        ("ABS/EBD", &safety.abs_ebd),
    ]
    .into_iter()
    .filter(|(_, flag)| {
        activated_since(flag, &safety.speed, since, config.min_driving_speed_kmh)
    })
    .map(|(name, _)| name)
    .collect();

    if systems.is_empty() || !(config.intervention_penalty > 0.0) {
        return None;
    }

    Some(Detection {
        kind: EventKind::SystemIntervention,
        severity: Severity::Critical,
        penalty: config.intervention_penalty,
        message: format!("{} intervened", systems.join(" and ")),
    })
}
