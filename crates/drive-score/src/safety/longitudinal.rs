//! Hard acceleration and hard braking

use super::Detection;
use crate::config::ScoringConfig;
use crate::event::{EventKind, Severity};
use crate::store::SafetyWindows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Moderate,
    Hard,
    Extreme,
}

impl Tier {
    /// Highest tier whose threshold `magnitude` exceeds
    fn classify(magnitude: f64, thresholds: [f64; 3]) -> Option<Self> {
        let [moderate, hard, extreme] = thresholds;
        if magnitude > extreme {
            Some(Self::Extreme)
        } else if magnitude > hard {
            Some(Self::Hard)
        } else if magnitude > moderate {
            Some(Self::Moderate)
        } else {
            None
        }
    }

    fn severity(self) -> Severity {
        match self {
            Self::Moderate => Severity::Medium,
            Self::Hard => Severity::High,
            Self::Extreme => Severity::Critical,
        }
    }

    fn pick(self, penalties: [f64; 3]) -> f64 {
        match self {
            Self::Moderate => penalties[0],
            Self::Hard => penalties[1],
            Self::Extreme => penalties[2],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Moderate => "moderate",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        }
    }
}

/// Hard braking and hard acceleration among samples newer than `since`,
/// in that order.
///
/// Each direction is classified on its own peak so that each can be gated
/// on its own cooldown. Samples taken at or below the driving speed are
/// ignored.
pub(super) fn detect(
    safety: &SafetyWindows,
    config: &ScoringConfig,
    since: f64,
) -> [Option<Detection>; 2] {
    let (peak_accel, peak_brake) = safety
        .longitudinal_g
        .since(since)
        .zip(safety.speed.since(since))
        .filter(|(_, speed)| speed.value > config.min_driving_speed_kmh)
        .fold((0.0_f64, 0.0_f64), |(accel, brake), (g, _)| {
            (accel.max(g.value), brake.max(-g.value))
        });

    let braking = Tier::classify(
        peak_brake,
        [
            config.brake_moderate_mps2,
            config.brake_hard_mps2,
            config.brake_extreme_mps2,
        ],
    )
    .map(|tier| Detection {
        kind: EventKind::HardBraking,
        severity: tier.severity(),
        penalty: tier.pick([
            config.brake_moderate_penalty,
            config.brake_hard_penalty,
            config.brake_extreme_penalty,
        ]),
        message: format!("{} braking at {:.1} m/s^2", tier.as_str(), peak_brake),
    });

    let acceleration = Tier::classify(
        peak_accel,
        [
            config.accel_moderate_mps2,
            config.accel_hard_mps2,
            config.accel_extreme_mps2,
        ],
    )
    .map(|tier| Detection {
        kind: EventKind::HardAcceleration,
        severity: tier.severity(),
        penalty: tier.pick([
            config.accel_moderate_penalty,
            config.accel_hard_penalty,
            config.accel_extreme_penalty,
        ]),
        message: format!("{} acceleration at {:.1} m/s^2", tier.as_str(), peak_accel),
    });

    [braking, acceleration]
}
