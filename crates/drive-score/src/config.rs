//! Scoring configuration

use crate::error::ConfigError;
use crate::event::EventKind;
use serde::{Deserialize, Serialize};

/// Every tunable knob of the scoring engine.
///
/// Fields missing from a deserialized source keep their default, so a
/// config file only needs to name what it overrides. In code, use struct
/// update syntax: `ScoringConfig { safety_window_sec: 5.0, ..Default::default() }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    // --- Windows and schedule (seconds) ---
    /// Retention of the eco signal group
    pub eco_window_sec: f64,
    /// Retention of the safety signal group, and the safety penalty epoch
    pub safety_window_sec: f64,
    /// Minimum time between eco recomputes
    pub eco_calc_interval_sec: f64,
    /// Minimum time between safety recomputes
    pub safety_calc_interval_sec: f64,

    // --- Eco: acceleration smoothness ---
    /// Speed change rate counted as aggressive (km/h per second)
    pub aggressive_speed_change_kmhps: f64,
    pub k_torque_jerk: f64,
    pub k_pedal_jerk: f64,
    pub k_speed_variation: f64,
    pub k_aggressive_events: f64,
    pub w_torque_jerk: f64,
    pub w_pedal_jerk: f64,
    pub w_speed_variation: f64,
    pub w_aggressive_events: f64,

    // --- Eco: RPM efficiency ---
    /// Samples at or below this speed are skipped for the RPM/speed ratio (km/h)
    pub min_speed_for_rpm_ratio_kmh: f64,
    /// RPM above which time counts as high-RPM driving
    pub high_rpm_threshold: f64,
    pub k_rpm_ratio: f64,
    pub k_high_rpm: f64,
    pub w_rpm_ratio: f64,
    pub w_high_rpm: f64,

    // --- Eco: idling ---
    /// Speed below which the vehicle counts as stationary (km/h)
    pub stationary_speed_kmh: f64,
    /// RPM below which a stationary engine counts as off
    pub idle_engine_off_rpm: f64,
    /// Upper RPM bound of a normal idle
    pub idle_normal_max_rpm: f64,
    /// Upper RPM bound of a high idle; anything above is excessive
    pub idle_high_max_rpm: f64,
    pub idle_reward_engine_off: f64,
    pub idle_reward_normal: f64,
    pub idle_reward_high: f64,
    pub idle_reward_excessive: f64,
    /// Maximum bonus for idle-stop activations (fraction of the sub-score)
    pub idle_stop_bonus: f64,
    /// Stationary time one idle-stop activation is assumed to cover (seconds)
    pub idle_stop_assumed_stop_sec: f64,

    // --- Eco: gear selection ---
    /// Gear changes per eco window tolerated before penalising
    pub gear_change_threshold: usize,

    // --- Eco: overall weights ---
    pub w_accel_overall: f64,
    pub w_rpm_overall: f64,
    pub w_idle_overall: f64,
    pub w_gear_overall: f64,

    // --- Eco: advisory thresholds (notifications only) ---
    pub advisory_torque_jerk: f64,
    pub advisory_pedal_jerk: f64,
    pub advisory_speed_variation_kmh: f64,
    pub advisory_high_rpm_share: f64,
    pub advisory_rpm_ratio: f64,
    pub advisory_idle_share: f64,

    // --- Safety: gating ---
    /// Safety detectors stay silent at or below this speed (km/h)
    pub min_driving_speed_kmh: f64,

    // --- Safety: longitudinal g (m/s^2) ---
    pub accel_moderate_mps2: f64,
    pub accel_hard_mps2: f64,
    pub accel_extreme_mps2: f64,
    pub accel_moderate_penalty: f64,
    pub accel_hard_penalty: f64,
    pub accel_extreme_penalty: f64,
    pub brake_moderate_mps2: f64,
    pub brake_hard_mps2: f64,
    pub brake_extreme_mps2: f64,
    pub brake_moderate_penalty: f64,
    pub brake_hard_penalty: f64,
    pub brake_extreme_penalty: f64,

    // --- Safety: cornering ---
    /// Speed at which the low-speed thresholds apply (km/h)
    pub corner_low_speed_kmh: f64,
    /// Speed from which the high-speed thresholds apply (km/h)
    pub corner_high_speed_kmh: f64,
    pub lat_g_threshold_low_speed: f64,
    pub lat_g_threshold_high_speed: f64,
    pub lat_g_threshold_min: f64,
    pub max_lat_g: f64,
    pub yaw_threshold_low_speed: f64,
    pub yaw_threshold_high_speed: f64,
    pub yaw_threshold_min: f64,
    pub max_yaw_rate: f64,
    pub cornering_penalty: f64,
    pub cornering_exponent: f64,

    // --- Safety: steering ---
    /// Trailing span of steering samples analysed (seconds)
    pub steering_analysis_sec: f64,
    /// Moving-average width applied before analysis (samples)
    pub steering_smoothing_samples: usize,
    /// Angle changes smaller than this are noise (deg)
    pub steering_noise_deg: f64,
    /// Swing amplitude of a significant reversal (deg)
    pub steering_significant_deg: f64,
    /// Maximum duration of a rapid reversal (seconds)
    pub steering_rapid_span_sec: f64,
    pub steering_spike_rate_dps: f64,
    pub max_steering_rate_dps: f64,
    pub steering_reversal_freq_hz: f64,
    pub steering_angle_std_deg: f64,
    pub steering_elevated_rate_dps: f64,
    pub steering_moderate_rate_dps: f64,
    pub steering_penalty: f64,
    pub steering_exponent: f64,

    // --- Safety: system intervention ---
    pub intervention_penalty: f64,

    // --- Safety: pedal ---
    /// Trailing span of pedal samples analysed (seconds)
    pub pedal_analysis_sec: f64,
    /// Pedal rise rate counted as a slam (% per second)
    pub pedal_slam_rate: f64,
    pub pedal_extreme_pct: f64,
    /// Share of the analysed span spent at an extreme position
    pub pedal_extreme_share: f64,
    pub pedal_sudden_change_rate: f64,
    pub pedal_sudden_change_count: usize,
    pub pedal_erratic_mean_pct: f64,
    pub pedal_erratic_std_pct: f64,
    pub pedal_sustained_mean_pct: f64,
    pub pedal_penalty: f64,

    // --- Safety: cooldowns (seconds) ---
    pub longitudinal_cooldown_sec: f64,
    pub cornering_cooldown_sec: f64,
    pub steering_cooldown_sec: f64,
    pub intervention_cooldown_sec: f64,
    pub pedal_cooldown_sec: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            eco_window_sec: 60.0,
            safety_window_sec: 10.0,
            eco_calc_interval_sec: 1.0,
            safety_calc_interval_sec: 0.2,

            aggressive_speed_change_kmhps: 5.0,
            k_torque_jerk: 0.01,
            k_pedal_jerk: 0.05,
            k_speed_variation: 0.001,
            k_aggressive_events: 0.5,
            w_torque_jerk: 0.25,
            w_pedal_jerk: 0.25,
            w_speed_variation: 0.25,
            w_aggressive_events: 0.25,

            min_speed_for_rpm_ratio_kmh: 5.0,
            high_rpm_threshold: 2500.0,
            k_rpm_ratio: 0.002,
            k_high_rpm: 0.5,
            w_rpm_ratio: 0.7,
            w_high_rpm: 0.3,

            stationary_speed_kmh: 0.1,
            idle_engine_off_rpm: 300.0,
            idle_normal_max_rpm: 900.0,
            idle_high_max_rpm: 1200.0,
            idle_reward_engine_off: 1.0,
            idle_reward_normal: 0.7,
            idle_reward_high: 0.3,
            idle_reward_excessive: 0.0,
            idle_stop_bonus: 0.1,
            idle_stop_assumed_stop_sec: 30.0,

            gear_change_threshold: 10,

            w_accel_overall: 0.35,
            w_rpm_overall: 0.25,
            w_idle_overall: 0.25,
            w_gear_overall: 0.15,

            advisory_torque_jerk: 5.0,
            advisory_pedal_jerk: 5.0,
            advisory_speed_variation_kmh: 5.0,
            advisory_high_rpm_share: 0.05,
            advisory_rpm_ratio: 40.0,
            advisory_idle_share: 0.1,

            min_driving_speed_kmh: 5.0,

            accel_moderate_mps2: 2.9,
            accel_hard_mps2: 3.9,
            accel_extreme_mps2: 5.9,
            accel_moderate_penalty: 8.0,
            accel_hard_penalty: 15.0,
            accel_extreme_penalty: 30.0,
            brake_moderate_mps2: 3.5,
            brake_hard_mps2: 5.8,
            brake_extreme_mps2: 7.5,
            brake_moderate_penalty: 10.0,
            brake_hard_penalty: 20.0,
            brake_extreme_penalty: 40.0,

            corner_low_speed_kmh: 0.0,
            corner_high_speed_kmh: 100.0,
            lat_g_threshold_low_speed: 2.9,
            lat_g_threshold_high_speed: 4.9,
            lat_g_threshold_min: 0.5,
            max_lat_g: 9.8,
            yaw_threshold_low_speed: 20.0,
            yaw_threshold_high_speed: 40.0,
            yaw_threshold_min: 5.0,
            max_yaw_rate: 80.0,
            cornering_penalty: 35.0,
            cornering_exponent: 1.0,

            steering_analysis_sec: 2.0,
            steering_smoothing_samples: 3,
            steering_noise_deg: 2.0,
            steering_significant_deg: 30.0,
            steering_rapid_span_sec: 0.5,
            steering_spike_rate_dps: 300.0,
            max_steering_rate_dps: 756.0,
            steering_reversal_freq_hz: 1.5,
            steering_angle_std_deg: 25.0,
            steering_elevated_rate_dps: 60.0,
            steering_moderate_rate_dps: 30.0,
            steering_penalty: 15.0,
            steering_exponent: 1.0,

            intervention_penalty: 70.0,

            pedal_analysis_sec: 3.0,
            pedal_slam_rate: 150.0,
            pedal_extreme_pct: 90.0,
            pedal_extreme_share: 0.6,
            pedal_sudden_change_rate: 60.0,
            pedal_sudden_change_count: 4,
            pedal_erratic_mean_pct: 60.0,
            pedal_erratic_std_pct: 20.0,
            pedal_sustained_mean_pct: 75.0,
            pedal_penalty: 12.0,

            longitudinal_cooldown_sec: 2.0,
            cornering_cooldown_sec: 2.0,
            steering_cooldown_sec: 2.0,
            intervention_cooldown_sec: 3.0,
            pedal_cooldown_sec: 3.0,
        }
    }
}

impl ScoringConfig {
    /// Stricter thresholds for fleet coaching
    pub fn strict() -> Self {
        Self {
            accel_moderate_mps2: 2.5,
            accel_hard_mps2: 3.4,
            accel_extreme_mps2: 5.0,
            brake_moderate_mps2: 3.0,
            brake_hard_mps2: 5.0,
            brake_extreme_mps2: 6.5,
            lat_g_threshold_low_speed: 2.5,
            lat_g_threshold_high_speed: 4.0,
            high_rpm_threshold: 2200.0,
            gear_change_threshold: 8,
            ..Default::default()
        }
    }

    /// More tolerant thresholds for spirited private driving
    pub fn lenient() -> Self {
        Self {
            accel_moderate_mps2: 3.5,
            accel_hard_mps2: 4.5,
            accel_extreme_mps2: 6.5,
            brake_moderate_mps2: 4.0,
            brake_hard_mps2: 6.5,
            brake_extreme_mps2: 8.0,
            lat_g_threshold_low_speed: 3.5,
            lat_g_threshold_high_speed: 5.5,
            high_rpm_threshold: 3000.0,
            gear_change_threshold: 14,
            ..Default::default()
        }
    }

    /// Cooldown applying to a safety event kind; advisories have none
    pub fn cooldown_for(&self, kind: EventKind) -> f64 {
        match kind {
            EventKind::HardAcceleration | EventKind::HardBraking => {
                self.longitudinal_cooldown_sec
            }
            EventKind::AggressiveCornering => self.cornering_cooldown_sec,
            EventKind::JerkySteering => self.steering_cooldown_sec,
            EventKind::SystemIntervention => self.intervention_cooldown_sec,
            EventKind::AggressivePedal => self.pedal_cooldown_sec,
            _ => 0.0,
        }
    }

    /// Reject values the engine cannot run on sensibly.
    ///
    /// The engine itself tolerates any configuration (zero-width ranges
    /// yield zero contribution); this is for hosts loading external files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("eco_window_sec", self.eco_window_sec),
            ("safety_window_sec", self.safety_window_sec),
            ("eco_calc_interval_sec", self.eco_calc_interval_sec),
            ("safety_calc_interval_sec", self.safety_calc_interval_sec),
            ("steering_analysis_sec", self.steering_analysis_sec),
            ("pedal_analysis_sec", self.pedal_analysis_sec),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("cornering_penalty", self.cornering_penalty),
            ("steering_penalty", self.steering_penalty),
            ("intervention_penalty", self.intervention_penalty),
            ("pedal_penalty", self.pedal_penalty),
            ("accel_moderate_penalty", self.accel_moderate_penalty),
            ("accel_hard_penalty", self.accel_hard_penalty),
            ("accel_extreme_penalty", self.accel_extreme_penalty),
            ("brake_moderate_penalty", self.brake_moderate_penalty),
            ("brake_hard_penalty", self.brake_hard_penalty),
            ("brake_extreme_penalty", self.brake_extreme_penalty),
            ("longitudinal_cooldown_sec", self.longitudinal_cooldown_sec),
            ("cornering_cooldown_sec", self.cornering_cooldown_sec),
            ("steering_cooldown_sec", self.steering_cooldown_sec),
            ("intervention_cooldown_sec", self.intervention_cooldown_sec),
            ("pedal_cooldown_sec", self.pedal_cooldown_sec),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let tiers = [
            (
                "accel",
                [self.accel_moderate_mps2, self.accel_hard_mps2, self.accel_extreme_mps2],
            ),
            (
                "brake",
                [self.brake_moderate_mps2, self.brake_hard_mps2, self.brake_extreme_mps2],
            ),
            (
                "idle_rpm",
                [self.idle_engine_off_rpm, self.idle_normal_max_rpm, self.idle_high_max_rpm],
            ),
        ];
        for (field, values) in tiers {
            if !(values[0] <= values[1] && values[1] <= values[2]) {
                return Err(ConfigError::UnorderedTiers { field, values });
            }
        }

        if self.corner_low_speed_kmh > self.corner_high_speed_kmh {
            return Err(ConfigError::InvertedRange {
                field: "corner_speed_kmh",
                low: self.corner_low_speed_kmh,
                high: self.corner_high_speed_kmh,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
        assert!(ScoringConfig::strict().validate().is_ok());
        assert!(ScoringConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = ScoringConfig::default();
        let overall = config.w_accel_overall
            + config.w_rpm_overall
            + config.w_idle_overall
            + config.w_gear_overall;
        assert!((overall - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = ScoringConfig {
            safety_window_sec: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "safety_window_sec",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_rejects_unordered_tiers() {
        let config = ScoringConfig {
            brake_hard_mps2: 9.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnorderedTiers { field: "brake", .. })
        ));
    }

    #[test]
    fn test_partial_override_from_json() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "safety_window_sec": 5.0, "gear_change_threshold": 4 }"#)
                .unwrap();
        assert_eq!(config.safety_window_sec, 5.0);
        assert_eq!(config.gear_change_threshold, 4);
        assert_eq!(config.eco_window_sec, 60.0);
    }
}
