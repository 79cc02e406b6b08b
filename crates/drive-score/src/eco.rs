//! Eco Score Calculator
//!
//! Weighted combination of four sub-scores over the eco window:
//! acceleration smoothness, RPM efficiency, idling discipline and gear
//! selection. Each sub-score is clamped to [0, 1] before weighting.
//! Crossing an advisory threshold produces an event but never moves the
//! score.

use crate::config::ScoringConfig;
use crate::event::{DrivingEvent, EventKind, Severity};
use crate::snapshot::GearPosition;
use crate::store::EcoWindows;
use serde::{Deserialize, Serialize};
use signal_stats::{
    mean, rates_of_change, rising_edges, sample_std_dev, time_weighted_share, transitions,
};
use tracing::debug;

/// Sub-scores of one eco recompute, each on 0-100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EcoBreakdown {
    pub acceleration: f64,
    pub rpm: f64,
    pub idling: f64,
    pub gear: f64,
}

/// Result of one eco recompute
#[derive(Debug, Clone, PartialEq)]
pub struct EcoEvaluation {
    /// Score in [0, 100]
    pub score: f64,
    pub breakdown: EcoBreakdown,
    /// Advisory events (zero penalty)
    pub events: Vec<DrivingEvent>,
}

/// Stateless eco scorer; every recompute reads only the eco windows
#[derive(Debug, Clone, Copy, Default)]
pub struct EcoScoreCalculator;

impl EcoScoreCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, eco: &EcoWindows, config: &ScoringConfig, now: f64) -> EcoEvaluation {
        let mut events = Vec::new();

        let acceleration = acceleration_smoothness(eco, config, now, &mut events);
        let rpm = rpm_efficiency(eco, config, now, &mut events);
        let idling = idling_discipline(eco, config, now, &mut events);
        let gear = gear_discipline(eco, config, now, &mut events);

        let weighted = config.w_accel_overall * acceleration
            + config.w_rpm_overall * rpm
            + config.w_idle_overall * idling
            + config.w_gear_overall * gear;
        let score = (weighted * 100.0).max(0.0).min(100.0);

        let breakdown = EcoBreakdown {
            acceleration: acceleration * 100.0,
            rpm: rpm * 100.0,
            idling: idling * 100.0,
            gear: gear * 100.0,
        };
        debug!(
            timestamp = now,
            score,
            acceleration = breakdown.acceleration,
            rpm = breakdown.rpm,
            idling = breakdown.idling,
            gear = breakdown.gear,
            "eco score"
        );

        EcoEvaluation {
            score,
            breakdown,
            events,
        }
    }
}

/// `max(0, 1 - k * metric)`
fn linear_score(k: f64, metric: f64) -> f64 {
    (1.0 - k * metric).max(0.0)
}

fn unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}

fn acceleration_smoothness(
    eco: &EcoWindows,
    config: &ScoringConfig,
    now: f64,
    events: &mut Vec<DrivingEvent>,
) -> f64 {
    let torque_jerk = sample_std_dev(&rates_of_change(&eco.torque_request.all()));
    let pedal_jerk = sample_std_dev(&rates_of_change(&eco.pedal_position.all()));
    let speed = eco.speed.all();
    let speed_variation = sample_std_dev(&eco.speed.values_only());
    let aggressive = rates_of_change(&speed)
        .iter()
        .filter(|r| r.abs() > config.aggressive_speed_change_kmhps)
        .count();

    let score = config.w_torque_jerk * linear_score(config.k_torque_jerk, torque_jerk)
        + config.w_pedal_jerk * linear_score(config.k_pedal_jerk, pedal_jerk)
        + config.w_speed_variation * linear_score(config.k_speed_variation, speed_variation)
        + config.w_aggressive_events * linear_score(config.k_aggressive_events, aggressive as f64);

    if aggressive > 0 {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::AggressiveSpeedChange,
            Severity::Medium,
            format!("{aggressive} aggressive speed changes in the last minute"),
        ));
    }
    if torque_jerk > config.advisory_torque_jerk {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::TorqueJerk,
            Severity::Low,
            format!("abrupt torque requests (jerk {torque_jerk:.1})"),
        ));
    }
    if pedal_jerk > config.advisory_pedal_jerk {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::PedalJerk,
            Severity::Low,
            format!("jerky accelerator input (jerk {pedal_jerk:.1})"),
        ));
    }
    if speed_variation > config.advisory_speed_variation_kmh {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::SpeedVariation,
            Severity::Low,
            format!("speed varying by {speed_variation:.1} km/h, try to hold it steady"),
        ));
    }

    unit(score)
}

fn rpm_efficiency(
    eco: &EcoWindows,
    config: &ScoringConfig,
    now: f64,
    events: &mut Vec<DrivingEvent>,
) -> f64 {
    let ratios: Vec<f64> = eco
        .rpm
        .iter()
        .zip(eco.speed.iter())
        .filter(|(_, speed)| speed.value > config.min_speed_for_rpm_ratio_kmh)
        .map(|(rpm, speed)| rpm.value / speed.value)
        .collect();
    let rpm_ratio = mean(&ratios);
    let high_rpm_share =
        time_weighted_share(&eco.rpm.all(), |&rpm| rpm > config.high_rpm_threshold);

    let score = config.w_rpm_ratio * linear_score(config.k_rpm_ratio, rpm_ratio)
        + config.w_high_rpm * linear_score(config.k_high_rpm, high_rpm_share);

    if high_rpm_share > config.advisory_high_rpm_share {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::HighRpm,
            Severity::Medium,
            format!(
                "{:.0}% of the last minute above {:.0} rpm, shift up earlier",
                high_rpm_share * 100.0,
                config.high_rpm_threshold
            ),
        ));
    }
    if rpm_ratio > config.advisory_rpm_ratio {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::HighRpmRatio,
            Severity::Low,
            format!("engine speed high for road speed ({rpm_ratio:.0} rpm per km/h)"),
        ));
    }

    unit(score)
}

/// Stationary time split by engine speed tier (seconds)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct IdleTime {
    engine_off: f64,
    normal: f64,
    high: f64,
    excessive: f64,
}

impl IdleTime {
    fn total(&self) -> f64 {
        self.engine_off + self.normal + self.high + self.excessive
    }

    /// Stationary time with the engine running
    fn running(&self) -> f64 {
        self.normal + self.high + self.excessive
    }
}

fn idle_time(eco: &EcoWindows, config: &ScoringConfig) -> (IdleTime, f64) {
    let mut idle = IdleTime::default();
    let mut window = 0.0;

    let samples: Vec<_> = eco.speed.iter().zip(eco.rpm.iter()).collect();
    for pair in samples.windows(2) {
        let (prev_speed, _) = pair[0];
        let (speed, rpm) = pair[1];
        let dt = speed.timestamp - prev_speed.timestamp;
        if dt <= 0.0 {
            continue;
        }
        window += dt;
        if speed.value >= config.stationary_speed_kmh {
            continue;
        }

        let rpm = rpm.value;
        if rpm < config.idle_engine_off_rpm {
            idle.engine_off += dt;
        } else if rpm <= config.idle_normal_max_rpm {
            idle.normal += dt;
        } else if rpm <= config.idle_high_max_rpm {
            idle.high += dt;
        } else {
            idle.excessive += dt;
        }
    }

    (idle, window)
}

fn idling_discipline(
    eco: &EcoWindows,
    config: &ScoringConfig,
    now: f64,
    events: &mut Vec<DrivingEvent>,
) -> f64 {
    let (idle, window) = idle_time(eco, config);
    let activations = rising_edges(&eco.idle_stop.values_only());

    if activations > 0 {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::IdleStop,
            Severity::Low,
            format!("idle-stop engaged {activations} time(s), saving fuel"),
        ));
    }

    let running_share = if window > 0.0 {
        idle.running() / window
    } else {
        0.0
    };
    if running_share > config.advisory_idle_share {
        events.push(DrivingEvent::advisory(
            now,
            EventKind::ExcessiveIdling,
            Severity::Medium,
            format!(
                "idling with the engine running for {:.0}% of the last minute",
                running_share * 100.0
            ),
        ));
    }

    let stationary = idle.total();
    if !(stationary > 0.0) {
        return 1.0;
    }

    let base = (config.idle_reward_engine_off * idle.engine_off
        + config.idle_reward_normal * idle.normal
        + config.idle_reward_high * idle.high
        + config.idle_reward_excessive * idle.excessive)
        / stationary;
    let bonus = if config.idle_stop_assumed_stop_sec > 0.0 {
        config.idle_stop_bonus
            * (activations as f64 * config.idle_stop_assumed_stop_sec / stationary).min(1.0)
    } else {
        0.0
    };

    unit(base + bonus)
}

fn gear_discipline(
    eco: &EcoWindows,
    config: &ScoringConfig,
    now: f64,
    events: &mut Vec<DrivingEvent>,
) -> f64 {
    let gears: Vec<GearPosition> = eco.gear.values_only();
    let changes = transitions(&gears);
    let threshold = config.gear_change_threshold;

    if threshold == 0 || changes <= threshold {
        return 1.0;
    }

    events.push(DrivingEvent::advisory(
        now,
        EventKind::FrequentGearChange,
        Severity::Low,
        format!("{changes} gear changes in the last minute"),
    ));

    let excess = (changes - threshold) as f64 / threshold as f64;
    unit(1.0 - excess)
}
