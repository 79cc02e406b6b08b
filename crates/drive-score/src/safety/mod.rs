//! Safety Score Calculator
//!
//! Five independent detectors feed a cumulative penalty that resets at the
//! start of every safety window. Within a window, a detector that fires is
//! held off by its cooldown; a condition re-detected during the cooldown is
//! logged and contributes nothing.
//!
//! Samples are charged at most once. The batch detectors only read samples
//! newer than the previous recompute. The trailing-span detectors (steering
//! and pedal) only charge a spike that began after the previous recompute,
//! and their other rules only read samples newer than their last charge.
//! Neither bound is cleared by a window reset.

mod cornering;
mod intervention;
mod longitudinal;
mod pedal;
mod steering;

use crate::config::ScoringConfig;
use crate::cooldown::CooldownTracker;
use crate::event::{DrivingEvent, EventKind, Severity};
use crate::store::{EcoWindows, SafetyWindows};
use crate::TIME_EPSILON;
use std::collections::HashMap;
use time_window::Sample;
use tracing::{debug, info};

/// A condition reported by one detector, before gating
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub kind: EventKind,
    pub severity: Severity,
    pub penalty: f64,
    pub message: String,
}

impl Detection {
    fn into_event(self, timestamp: f64) -> DrivingEvent {
        DrivingEvent {
            timestamp,
            kind: self.kind,
            severity: self.severity,
            penalty: self.penalty,
            message: self.message,
        }
    }
}

/// Which part of a trailing span a detector may still charge
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Freshness {
    /// Previous recompute
    pub since: f64,
    /// Last recompute that charged this detector
    pub charged: f64,
}

impl Freshness {
    #[cfg(test)]
    pub const OPEN: Self = Self {
        since: f64::NEG_INFINITY,
        charged: f64::NEG_INFINITY,
    };

    /// Tail of `samples` newer than the last charge, provided it holds at
    /// least one sample that arrived after the previous recompute
    pub fn unpaid<'a>(&self, samples: &'a [Sample<f64>]) -> Option<&'a [Sample<f64>]> {
        let start = samples.partition_point(|s| s.timestamp <= self.charged);
        let tail = &samples[start..];
        (tail.last()?.timestamp > self.since).then_some(tail)
    }

    /// Peak of the runs of consecutive `rates` matching `hit` that began
    /// after the previous recompute.
    ///
    /// A run already under way at the previous recompute was judged then.
    pub fn new_run_peak(&self, rates: &[Sample<f64>], hit: impl Fn(f64) -> bool) -> Option<f64> {
        let mut peak: Option<f64> = None;
        let mut in_run = false;
        let mut run_is_new = false;
        for rate in rates {
            if !hit(rate.value) {
                in_run = false;
                continue;
            }
            if !in_run {
                in_run = true;
                run_is_new = rate.timestamp > self.since;
            }
            if run_is_new {
                peak = Some(peak.map_or(rate.value, |p| p.max(rate.value)));
            }
        }
        peak
    }
}

/// Result of one safety recompute
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyEvaluation {
    /// Score in [0, 100]
    pub score: f64,
    /// Penalty accumulated since the current window started
    pub cumulative_penalty: f64,
    /// Whether this recompute started a new safety window
    pub window_reset: bool,
    /// Events that fired (and were charged) this cycle
    pub events: Vec<DrivingEvent>,
}

/// Stateful safety scorer: cumulative penalty, window epoch and cooldowns
#[derive(Debug, Clone, Default)]
pub struct SafetyScoreCalculator {
    cumulative_penalty: f64,
    window_start: Option<f64>,
    last_evaluated: Option<f64>,
    cooldowns: CooldownTracker,
    /// Last charge per kind; survives window resets
    last_charged: HashMap<EventKind, f64>,
}

impl SafetyScoreCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty accumulated in the current window
    pub fn cumulative_penalty(&self) -> f64 {
        self.cumulative_penalty
    }

    /// Start of the current safety window, once the first recompute ran
    pub fn window_start(&self) -> Option<f64> {
        self.window_start
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Recompute the safety score at `now`.
    ///
    /// Instantaneous detectors (longitudinal g, cornering, intervention)
    /// look at every sample newer than the previous recompute and skip
    /// samples taken at or below the driving speed. Steering and pedal
    /// analyse a short trailing span and run only while the latest speed
    /// is above it.
    pub fn evaluate(
        &mut self,
        safety: &SafetyWindows,
        eco: &EcoWindows,
        config: &ScoringConfig,
        now: f64,
    ) -> SafetyEvaluation {
        let window_reset = self.roll_window(config, now);
        let since = self.last_evaluated.replace(now).unwrap_or(f64::NEG_INFINITY);

        let mut events = Vec::new();

        if !safety.has_core_signals() {
            return SafetyEvaluation {
                score: 100.0,
                cumulative_penalty: self.cumulative_penalty,
                window_reset,
                events,
            };
        }

        let speed = safety.current_speed();
        let driving = speed > config.min_driving_speed_kmh;
        if !driving {
            debug!(speed, "below driving speed, steering and pedal detectors idle");
        }

        let [braking, acceleration] = longitudinal::detect(safety, config, since);
        let steering_window = self.freshness(EventKind::JerkySteering, since);
        let pedal_window = self.freshness(EventKind::AggressivePedal, since);
        let detections = [
            braking,
            acceleration,
            cornering::detect(safety, config, since),
            driving
                .then(|| steering::detect(safety, config, steering_window))
                .flatten(),
            intervention::detect(safety, config, since),
            driving
                .then(|| pedal::detect(eco, config, pedal_window))
                .flatten(),
        ];

        for detection in detections.into_iter().flatten() {
            let kind = detection.kind;
            if !self.cooldowns.is_ready(kind, now, config.cooldown_for(kind)) {
                debug!(
                    kind = kind.as_str(),
                    penalty = detection.penalty,
                    last_fired = ?self.cooldowns.last_fired(kind),
                    "detection suppressed by cooldown"
                );
                continue;
            }

            self.cooldowns.record_fire(kind, now);
            self.last_charged.insert(kind, now);
            self.cumulative_penalty += detection.penalty;
            info!(
                timestamp = now,
                kind = kind.as_str(),
                severity = detection.severity.as_str(),
                penalty = detection.penalty,
                cumulative = self.cumulative_penalty,
                "{}",
                detection.message
            );
            events.push(detection.into_event(now));
        }

        let score = (100.0 - self.cumulative_penalty).max(0.0).min(100.0);
        SafetyEvaluation {
            score,
            cumulative_penalty: self.cumulative_penalty,
            window_reset,
            events,
        }
    }

    /// Forget all state (start of a new trip)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn freshness(&self, kind: EventKind, since: f64) -> Freshness {
        Freshness {
            since,
            charged: self
                .last_charged
                .get(&kind)
                .copied()
                .unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Start a new penalty epoch when the current one has run its length
    fn roll_window(&mut self, config: &ScoringConfig, now: f64) -> bool {
        match self.window_start {
            None => {
                self.window_start = Some(now);
                false
            }
            Some(start) if now - start + TIME_EPSILON >= config.safety_window_sec => {
                info!(
                    timestamp = now,
                    previous_penalty = self.cumulative_penalty,
                    "safety window reset"
                );
                self.cumulative_penalty = 0.0;
                self.cooldowns.clear();
                self.window_start = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}
