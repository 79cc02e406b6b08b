//! Vehicle signal snapshots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transmission gear indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GearPosition {
    #[default]
    Park,
    Reverse,
    Neutral,
    Drive,
    Sport,
    Low,
}

impl GearPosition {
    /// Map a numeric CVT position code from the bus
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Park),
            1 => Some(Self::Reverse),
            2 => Some(Self::Neutral),
            3 => Some(Self::Drive),
            4 => Some(Self::Sport),
            5 => Some(Self::Low),
            _ => None,
        }
    }

    /// Single-letter indicator as shown on the cluster
    pub fn letter(&self) -> char {
        match self {
            Self::Park => 'P',
            Self::Reverse => 'R',
            Self::Neutral => 'N',
            Self::Drive => 'D',
            Self::Sport => 'S',
            Self::Low => 'L',
        }
    }
}

impl fmt::Display for GearPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for GearPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P" | "PARK" => Ok(Self::Park),
            "R" | "REVERSE" => Ok(Self::Reverse),
            "N" | "NEUTRAL" => Ok(Self::Neutral),
            "D" | "DRIVE" => Ok(Self::Drive),
            "S" | "SPORT" => Ok(Self::Sport),
            "L" | "LOW" => Ok(Self::Low),
            other => Err(format!("unknown gear indicator: {other}")),
        }
    }
}

/// One timestamped bundle of decoded vehicle signals
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Seconds, non-decreasing across a trip
    pub timestamp: f64,
    /// Driver-requested torque (Nm)
    pub driver_torque_request: f64,
    /// Accelerator pedal position (%)
    pub accel_pedal_pct: f64,
    /// Wheel speed (km/h)
    pub wheel_speed_kmh: f64,
    /// Engine speed (rpm)
    pub engine_rpm: f64,
    pub gear: GearPosition,
    /// Idle-stop in progress
    pub idle_stop_active: bool,
    /// Longitudinal acceleration (m/s^2), negative when braking
    pub longitudinal_accel_mps2: f64,
    /// Lateral acceleration (m/s^2)
    pub lateral_accel_mps2: f64,
    /// Yaw rate (deg/s)
    pub yaw_rate_dps: f64,
    /// Steering wheel angle (deg)
    pub steering_angle_deg: f64,
    /// VSA / traction control active
    pub traction_control_active: bool,
    /// ABS / EBD active
    pub abs_ebd_active: bool,
}

/// Partial signal update; `None` leaves the current value in place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotUpdate {
    pub driver_torque_request: Option<f64>,
    pub accel_pedal_pct: Option<f64>,
    pub wheel_speed_kmh: Option<f64>,
    pub engine_rpm: Option<f64>,
    pub gear: Option<GearPosition>,
    pub idle_stop_active: Option<bool>,
    pub longitudinal_accel_mps2: Option<f64>,
    pub lateral_accel_mps2: Option<f64>,
    pub yaw_rate_dps: Option<f64>,
    pub steering_angle_deg: Option<f64>,
    pub traction_control_active: Option<bool>,
    pub abs_ebd_active: Option<bool>,
}

impl Snapshot {
    /// Snapshot with every signal at its default
    pub fn at(timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Defaults overlaid with `update`
    pub fn with_update(timestamp: f64, update: &SnapshotUpdate) -> Self {
        let mut snapshot = Self::at(timestamp);
        snapshot.apply(timestamp, update);
        snapshot
    }

    /// Move to `timestamp` and overwrite only the provided signals
    pub fn apply(&mut self, timestamp: f64, update: &SnapshotUpdate) {
        self.timestamp = timestamp;

        if let Some(v) = update.driver_torque_request {
            self.driver_torque_request = v;
        }
        if let Some(v) = update.accel_pedal_pct {
            self.accel_pedal_pct = v;
        }
        if let Some(v) = update.wheel_speed_kmh {
            self.wheel_speed_kmh = v;
        }
        if let Some(v) = update.engine_rpm {
            self.engine_rpm = v;
        }
        if let Some(v) = update.gear {
            self.gear = v;
        }
        if let Some(v) = update.idle_stop_active {
            self.idle_stop_active = v;
        }
        if let Some(v) = update.longitudinal_accel_mps2 {
            self.longitudinal_accel_mps2 = v;
        }
        if let Some(v) = update.lateral_accel_mps2 {
            self.lateral_accel_mps2 = v;
        }
        if let Some(v) = update.yaw_rate_dps {
            self.yaw_rate_dps = v;
        }
        if let Some(v) = update.steering_angle_deg {
            self.steering_angle_deg = v;
        }
        if let Some(v) = update.traction_control_active {
            self.traction_control_active = v;
        }
        if let Some(v) = update.abs_ebd_active {
            self.abs_ebd_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let snapshot = Snapshot::at(1.5);
        assert_eq!(snapshot.timestamp, 1.5);
        assert_eq!(snapshot.gear, GearPosition::Park);
        assert_eq!(snapshot.wheel_speed_kmh, 0.0);
        assert!(!snapshot.abs_ebd_active);
    }

    #[test]
    fn test_partial_update_keeps_other_signals() {
        let mut snapshot = Snapshot::with_update(
            0.0,
            &SnapshotUpdate {
                wheel_speed_kmh: Some(50.0),
                engine_rpm: Some(1800.0),
                gear: Some(GearPosition::Drive),
                ..Default::default()
            },
        );

        snapshot.apply(
            0.1,
            &SnapshotUpdate {
                engine_rpm: Some(2000.0),
                ..Default::default()
            },
        );

        assert_eq!(snapshot.timestamp, 0.1);
        assert_eq!(snapshot.engine_rpm, 2000.0);
        assert_eq!(snapshot.wheel_speed_kmh, 50.0);
        assert_eq!(snapshot.gear, GearPosition::Drive);
    }

    #[test]
    fn test_gear_parsing() {
        assert_eq!("D".parse::<GearPosition>(), Ok(GearPosition::Drive));
        assert_eq!(" p ".parse::<GearPosition>(), Ok(GearPosition::Park));
        assert!("X".parse::<GearPosition>().is_err());
        assert_eq!(GearPosition::from_code(3), Some(GearPosition::Drive));
        assert_eq!(GearPosition::from_code(15), None);
        assert_eq!(GearPosition::Sport.to_string(), "S");
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{ "timestamp": 2.0, "wheel_speed_kmh": 42.0, "gear": "Drive" }"#)
                .unwrap();
        assert_eq!(snapshot.wheel_speed_kmh, 42.0);
        assert_eq!(snapshot.gear, GearPosition::Drive);
        assert_eq!(snapshot.engine_rpm, 0.0);
    }
}
