//! Built-in five-minute test drive
//!
//! Deterministic signal generator cycling through smooth driving, efficient
//! and inefficient RPM, idling with and without idle-stop, and injected
//! safety events. The second half of the drive repeats the first with
//! slightly different event magnitudes.

use drive_score::{GearPosition, Snapshot};

/// Bus sample period (seconds)
pub const SAMPLE_PERIOD: f64 = 0.1;

/// `lo <= t < hi`
fn phase(t: f64, lo: f64, hi: f64) -> bool {
    lo <= t && t < hi
}

/// `lo < t < hi`
fn burst(t: f64, lo: f64, hi: f64) -> bool {
    lo < t && t < hi
}

fn clamp_angle(angle: f64) -> f64 {
    angle.max(-103.0).min(103.0)
}

/// Signals of the test drive at time `t`
pub fn snapshot_at(t: f64) -> Snapshot {
    // Background: gently varying urban driving
    let mut s = Snapshot {
        wheel_speed_kmh: 60.0 + (t / 10.0).sin() * 20.0,
        engine_rpm: 1800.0 + (t / 8.0).sin() * 300.0,
        driver_torque_request: 50.0 + (t / 7.0).sin() * 30.0,
        accel_pedal_pct: 30.0 + (t / 6.0).sin() * 15.0,
        steering_angle_deg: (t / 5.0).sin() * 20.0,
        gear: GearPosition::Drive,
        ..Snapshot::at(t)
    };

    // Smooth driving
    if phase(t, 0.0, 30.0) || phase(t, 150.0, 180.0) {
        s.driver_torque_request = 40.0 + (t / 15.0).sin() * 20.0;
        s.accel_pedal_pct = 25.0 + (t / 12.0).sin() * 10.0;
        s.wheel_speed_kmh = 40.0 + (t / 10.0).sin() * 10.0;
        s.engine_rpm = 1500.0 + (t / 10.0).sin() * 200.0;
    }

    // Efficient cruising
    if phase(t, 30.0, 60.0) || phase(t, 180.0, 210.0) {
        s.engine_rpm = 1500.0;
        s.wheel_speed_kmh = 50.0;
        s.driver_torque_request = 30.0;
        s.accel_pedal_pct = 20.0;
    }

    // Revving in a low gear
    if phase(t, 60.0, 90.0) || phase(t, 210.0, 240.0) {
        s.engine_rpm = 4000.0;
        s.wheel_speed_kmh = 45.0;
        s.driver_torque_request = 70.0;
        s.accel_pedal_pct = 60.0;
    }

    // Idling, then idle-stop
    if phase(t, 90.0, 95.0) || phase(t, 240.0, 245.0) {
        s.wheel_speed_kmh = 0.05;
        s.engine_rpm = 800.0;
        s.driver_torque_request = 0.0;
        s.accel_pedal_pct = 0.0;
    }
    if phase(t, 95.0, 100.0) || phase(t, 245.0, 250.0) {
        s.wheel_speed_kmh = 0.05;
        s.engine_rpm = 0.0;
        s.idle_stop_active = true;
        s.driver_torque_request = 0.0;
        s.accel_pedal_pct = 0.0;
    }

    // Hard braking and acceleration
    if burst(t, 10.0, 10.2) {
        s.longitudinal_accel_mps2 = -8.0;
    }
    if burst(t, 11.0, 11.2) {
        s.longitudinal_accel_mps2 = 6.0;
    }
    if burst(t, 160.0, 160.2) {
        s.longitudinal_accel_mps2 = -7.5;
    }
    if burst(t, 161.0, 161.2) {
        s.longitudinal_accel_mps2 = 6.8;
    }

    // Fast corners
    if burst(t, 40.0, 40.3) {
        s.lateral_accel_mps2 = 4.5;
        s.yaw_rate_dps = 35.0;
        s.wheel_speed_kmh = 70.0;
    }
    if burst(t, 190.0, 190.3) {
        s.lateral_accel_mps2 = 4.0;
        s.yaw_rate_dps = 30.0;
        s.wheel_speed_kmh = 60.0;
    }

    // Sawing at the wheel
    if burst(t, 45.0, 45.1) {
        s.steering_angle_deg = clamp_angle(200.0 * (t * 15.0).sin());
    }
    if burst(t, 195.0, 195.1) {
        s.steering_angle_deg = clamp_angle(250.0 * (t * 12.0).sin());
    }

    // Stability systems
    if burst(t, 70.0, 70.3) {
        s.abs_ebd_active = true;
    }
    if burst(t, 220.0, 220.3) {
        s.traction_control_active = true;
    }

    // A cluster of mixed events within two seconds
    if burst(t, 120.0, 120.2) {
        s.longitudinal_accel_mps2 = 4.0;
    }
    if burst(t, 120.5, 120.7) {
        s.steering_angle_deg = clamp_angle(150.0 * (t * 10.0).sin());
    }
    if burst(t, 121.0, 121.3) {
        s.longitudinal_accel_mps2 = -6.0;
    }
    if burst(t, 121.5, 121.8) {
        s.lateral_accel_mps2 = 3.5;
        s.yaw_rate_dps = 25.0;
        s.wheel_speed_kmh = 40.0;
    }
    if burst(t, 122.0, 122.2) {
        s.abs_ebd_active = true;
    }

    s
}

/// Iterator over the test drive at the bus sample period
#[derive(Debug, Clone)]
pub struct Scenario {
    ticks: usize,
    tick: usize,
}

impl Scenario {
    /// Drive lasting `duration` seconds, inclusive of both ends
    pub fn new(duration: f64) -> Self {
        let ticks = (duration.max(0.0) / SAMPLE_PERIOD).round() as usize + 1;
        Self { ticks, tick: 0 }
    }
}

impl Iterator for Scenario {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.tick >= self.ticks {
            return None;
        }
        // Derive time from the tick count so it does not drift
        let t = self.tick as f64 * SAMPLE_PERIOD;
        self.tick += 1;
        Some(snapshot_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ticks - self.tick;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scenario {}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_score::{EventKind, NullSink, ScoringConfig, ScoringEngine};

    #[test]
    fn test_scenario_length() {
        assert_eq!(Scenario::new(300.0).len(), 3001);
        assert_eq!(Scenario::new(0.0).count(), 1);
    }

    #[test]
    fn test_phases() {
        assert_eq!(snapshot_at(70.0).engine_rpm, 4000.0);
        assert!(snapshot_at(97.0).idle_stop_active);
        assert_eq!(snapshot_at(10.1).longitudinal_accel_mps2, -8.0);
        assert!(snapshot_at(70.1).abs_ebd_active);
        assert!(!snapshot_at(70.5).abs_ebd_active);
    }

    #[test]
    fn test_full_drive_scores() {
        let mut engine = ScoringEngine::with_sink(ScoringConfig::default(), Box::new(NullSink));
        for snapshot in Scenario::new(300.0) {
            let update = engine.ingest(&snapshot);
            for score in [update.eco, update.safety].into_iter().flatten() {
                assert!((0.0..=100.0).contains(&score));
            }
        }

        let summary = engine.summary();
        assert!(summary.count(EventKind::HardBraking) >= 1);
        assert!(summary.count(EventKind::SystemIntervention) >= 2);
        assert!(summary.count(EventKind::HighRpm) >= 1);
        assert!(summary.min_safety.unwrap() < 100.0);
        assert!((summary.duration() - 300.0).abs() < 1e-6);
    }
}
