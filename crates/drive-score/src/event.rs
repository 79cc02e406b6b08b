//! Driving events and score notifications

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // Eco advisories (never affect the score)
    AggressiveSpeedChange,
    TorqueJerk,
    PedalJerk,
    SpeedVariation,
    HighRpm,
    HighRpmRatio,
    ExcessiveIdling,
    IdleStop,
    FrequentGearChange,

    // Safety events (carry a penalty)
    HardAcceleration,
    HardBraking,
    AggressiveCornering,
    JerkySteering,
    SystemIntervention,
    AggressivePedal,
}

impl EventKind {
    /// Stable identifier for logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AggressiveSpeedChange => "aggressive_speed_change",
            Self::TorqueJerk => "torque_jerk",
            Self::PedalJerk => "pedal_jerk",
            Self::SpeedVariation => "speed_variation",
            Self::HighRpm => "high_rpm",
            Self::HighRpmRatio => "high_rpm_ratio",
            Self::ExcessiveIdling => "excessive_idling",
            Self::IdleStop => "idle_stop",
            Self::FrequentGearChange => "frequent_gear_change",
            Self::HardAcceleration => "hard_acceleration",
            Self::HardBraking => "hard_braking",
            Self::AggressiveCornering => "aggressive_cornering",
            Self::JerkySteering => "jerky_steering",
            Self::SystemIntervention => "system_intervention",
            Self::AggressivePedal => "aggressive_pedal",
        }
    }

    /// Human-readable label, as used in trip summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::AggressiveSpeedChange => "Aggressive acceleration or deceleration",
            Self::TorqueJerk => "Abrupt torque requests",
            Self::PedalJerk => "Jerky accelerator input",
            Self::SpeedVariation => "Unsteady speed",
            Self::HighRpm => "Revving engine at high RPM",
            Self::HighRpmRatio => "High RPM for road speed",
            Self::ExcessiveIdling => "Excessive idling",
            Self::IdleStop => "Idle-stop engaged",
            Self::FrequentGearChange => "Shifting gears repeatedly",
            Self::HardAcceleration => "Hard acceleration",
            Self::HardBraking => "Hard braking",
            Self::AggressiveCornering => "Aggressive cornering",
            Self::JerkySteering => "Jerky steering",
            Self::SystemIntervention => "Stability or ABS intervention",
            Self::AggressivePedal => "Aggressive pedal use",
        }
    }

    /// Whether events of this kind deduct from the safety score
    pub fn is_safety(&self) -> bool {
        matches!(
            self,
            Self::HardAcceleration
                | Self::HardBraking
                | Self::AggressiveCornering
                | Self::JerkySteering
                | Self::SystemIntervention
                | Self::AggressivePedal
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected condition, with the penalty it contributed (0 for advisories)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingEvent {
    pub timestamp: f64,
    pub kind: EventKind,
    pub severity: Severity,
    pub penalty: f64,
    pub message: String,
}

impl DrivingEvent {
    pub fn advisory(
        timestamp: f64,
        kind: EventKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            severity,
            penalty: 0.0,
            message: message.into(),
        }
    }
}

/// Payload handed to the notification sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreNotification {
    pub timestamp: f64,
    /// Latest known eco score
    pub eco_score: f64,
    /// Latest known safety score
    pub safety_score: f64,
    /// Triggering condition; empty for a routine periodic update
    pub reason: String,
}

impl ScoreNotification {
    pub fn is_routine(&self) -> bool {
        self.reason.is_empty()
    }
}
