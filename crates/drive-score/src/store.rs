//! Per-signal time windows, grouped by retention

use crate::snapshot::{GearPosition, Snapshot};
use crate::ScoringConfig;
use time_window::TimeWindow;

/// Long-retention signals feeding the eco score
#[derive(Debug, Clone)]
pub struct EcoWindows {
    pub torque_request: TimeWindow<f64>,
    pub pedal_position: TimeWindow<f64>,
    pub speed: TimeWindow<f64>,
    pub rpm: TimeWindow<f64>,
    pub gear: TimeWindow<GearPosition>,
    pub idle_stop: TimeWindow<bool>,
}

impl EcoWindows {
    fn new(retention: f64) -> Self {
        Self {
            torque_request: TimeWindow::new(retention),
            pedal_position: TimeWindow::new(retention),
            speed: TimeWindow::new(retention),
            rpm: TimeWindow::new(retention),
            gear: TimeWindow::new(retention),
            idle_stop: TimeWindow::new(retention),
        }
    }

    fn push(&mut self, snapshot: &Snapshot) {
        let t = snapshot.timestamp;
        self.torque_request.add(t, snapshot.driver_torque_request);
        self.pedal_position.add(t, snapshot.accel_pedal_pct);
        self.speed.add(t, snapshot.wheel_speed_kmh);
        self.rpm.add(t, snapshot.engine_rpm);
        self.gear.add(t, snapshot.gear);
        self.idle_stop.add(t, snapshot.idle_stop_active);
    }

    fn trim(&mut self, cutoff: f64) {
        self.torque_request.trim_older_than(cutoff);
        self.pedal_position.trim_older_than(cutoff);
        self.speed.trim_older_than(cutoff);
        self.rpm.trim_older_than(cutoff);
        self.gear.trim_older_than(cutoff);
        self.idle_stop.trim_older_than(cutoff);
    }

    fn clear(&mut self) {
        self.torque_request.clear();
        self.pedal_position.clear();
        self.speed.clear();
        self.rpm.clear();
        self.gear.clear();
        self.idle_stop.clear();
    }
}

/// Short-retention signals feeding the safety score
#[derive(Debug, Clone)]
pub struct SafetyWindows {
    pub longitudinal_g: TimeWindow<f64>,
    pub lateral_g: TimeWindow<f64>,
    pub yaw_rate: TimeWindow<f64>,
    pub steering_angle: TimeWindow<f64>,
    pub speed: TimeWindow<f64>,
    pub traction_control: TimeWindow<bool>,
    pub abs_ebd: TimeWindow<bool>,
}

impl SafetyWindows {
    fn new(retention: f64) -> Self {
        Self {
            longitudinal_g: TimeWindow::new(retention),
            lateral_g: TimeWindow::new(retention),
            yaw_rate: TimeWindow::new(retention),
            steering_angle: TimeWindow::new(retention),
            speed: TimeWindow::new(retention),
            traction_control: TimeWindow::new(retention),
            abs_ebd: TimeWindow::new(retention),
        }
    }

    fn push(&mut self, snapshot: &Snapshot) {
        let t = snapshot.timestamp;
        self.longitudinal_g.add(t, snapshot.longitudinal_accel_mps2);
        self.lateral_g.add(t, snapshot.lateral_accel_mps2);
        self.yaw_rate.add(t, snapshot.yaw_rate_dps);
        self.steering_angle.add(t, snapshot.steering_angle_deg);
        self.speed.add(t, snapshot.wheel_speed_kmh);
        self.traction_control.add(t, snapshot.traction_control_active);
        self.abs_ebd.add(t, snapshot.abs_ebd_active);
    }

    fn trim(&mut self, cutoff: f64) {
        self.longitudinal_g.trim_older_than(cutoff);
        self.lateral_g.trim_older_than(cutoff);
        self.yaw_rate.trim_older_than(cutoff);
        self.steering_angle.trim_older_than(cutoff);
        self.speed.trim_older_than(cutoff);
        self.traction_control.trim_older_than(cutoff);
        self.abs_ebd.trim_older_than(cutoff);
    }

    fn clear(&mut self) {
        self.longitudinal_g.clear();
        self.lateral_g.clear();
        self.yaw_rate.clear();
        self.steering_angle.clear();
        self.speed.clear();
        self.traction_control.clear();
        self.abs_ebd.clear();
    }

    /// True once the five signals the safety detectors read have data
    pub fn has_core_signals(&self) -> bool {
        self.longitudinal_g.last().is_some()
            && self.lateral_g.last().is_some()
            && self.yaw_rate.last().is_some()
            && self.steering_angle.last().is_some()
            && self.speed.last().is_some()
    }

    /// Latest speed, 0 when nothing has been observed
    pub fn current_speed(&self) -> f64 {
        self.speed.last().map(|s| s.value).unwrap_or(0.0)
    }
}

/// One time window per tracked signal, in an eco group and a safety group.
///
/// Every window of a group is trimmed against the same reference
/// timestamp, so windows within a group always cover the same span.
#[derive(Debug, Clone)]
pub struct SignalWindowStore {
    eco: EcoWindows,
    safety: SafetyWindows,
    eco_retention: f64,
    safety_retention: f64,
}

impl SignalWindowStore {
    /// Create an empty store using the configured retentions
    pub fn new(config: &ScoringConfig) -> Self {
        Self::with_retention(config.eco_window_sec, config.safety_window_sec)
    }

    pub fn with_retention(eco_retention: f64, safety_retention: f64) -> Self {
        Self {
            eco: EcoWindows::new(eco_retention),
            safety: SafetyWindows::new(safety_retention),
            eco_retention,
            safety_retention,
        }
    }

    /// Append every tracked signal of `snapshot`, then age out both groups
    pub fn update(&mut self, snapshot: &Snapshot) {
        self.eco.push(snapshot);
        self.safety.push(snapshot);

        self.eco.trim(snapshot.timestamp - self.eco_retention);
        self.safety.trim(snapshot.timestamp - self.safety_retention);
    }

    pub fn eco(&self) -> &EcoWindows {
        &self.eco
    }

    pub fn safety(&self) -> &SafetyWindows {
        &self.safety
    }

    /// Drop every sample (start of a new trip)
    pub fn clear(&mut self) {
        self.eco.clear();
        self.safety.clear();
    }
}
