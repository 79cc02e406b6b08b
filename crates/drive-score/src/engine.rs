//! Scoring Engine
//!
//! Owns the window store, both calculators and the notification sink, and
//! decides on each snapshot which scores are due.

use crate::config::ScoringConfig;
use crate::eco::{EcoBreakdown, EcoScoreCalculator};
use crate::event::{DrivingEvent, ScoreNotification};
use crate::notify::{LogSink, NotificationSink};
use crate::safety::SafetyScoreCalculator;
use crate::snapshot::Snapshot;
use crate::store::SignalWindowStore;
use crate::summary::TripSummary;
use crate::TIME_EPSILON;
use metrics::{counter, gauge};
use tracing::{info, warn};

/// Outcome of one `ingest` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreUpdate {
    /// Eco score, when it was recomputed by this call
    pub eco: Option<f64>,
    /// Safety score, when it was recomputed by this call
    pub safety: Option<f64>,
    /// Events raised by this call, advisory and penalised
    pub events: Vec<DrivingEvent>,
}

impl ScoreUpdate {
    pub fn is_empty(&self) -> bool {
        self.eco.is_none() && self.safety.is_none()
    }
}

/// Windowed eco and safety scoring for one vehicle.
///
/// Expects snapshots one at a time in non-decreasing timestamp order. Use
/// one engine per vehicle; nothing is shared between instances.
pub struct ScoringEngine {
    config: ScoringConfig,
    store: SignalWindowStore,
    eco: EcoScoreCalculator,
    safety: SafetyScoreCalculator,
    sink: Box<dyn NotificationSink>,
    last_eco_calc: f64,
    last_safety_calc: f64,
    latest_eco: f64,
    latest_safety: f64,
    latest_breakdown: EcoBreakdown,
    summary: TripSummary,
}

impl ScoringEngine {
    /// Engine publishing to the log
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_sink(config, Box::new(LogSink))
    }

    pub fn with_sink(config: ScoringConfig, sink: Box<dyn NotificationSink>) -> Self {
        info!(
            eco_window = config.eco_window_sec,
            safety_window = config.safety_window_sec,
            eco_interval = config.eco_calc_interval_sec,
            safety_interval = config.safety_calc_interval_sec,
            "scoring engine created"
        );

        Self {
            store: SignalWindowStore::new(&config),
            eco: EcoScoreCalculator::new(),
            safety: SafetyScoreCalculator::new(),
            sink,
            last_eco_calc: 0.0,
            last_safety_calc: 0.0,
            latest_eco: 100.0,
            latest_safety: 100.0,
            latest_breakdown: EcoBreakdown::default(),
            summary: TripSummary::new(),
            config,
        }
    }

    /// Feed one snapshot; returns the scores recomputed by this call
    pub fn ingest(&mut self, snapshot: &Snapshot) -> ScoreUpdate {
        let now = snapshot.timestamp;
        self.store.update(snapshot);
        self.summary.observe(now);

        let mut update = ScoreUpdate::default();

        if now - self.last_eco_calc + TIME_EPSILON >= self.config.eco_calc_interval_sec {
            let result = self.eco.evaluate(self.store.eco(), &self.config, now);
            self.last_eco_calc = now;
            self.latest_eco = result.score;
            self.latest_breakdown = result.breakdown;
            self.summary.record_eco(result.score);
            gauge!("drive_score_eco").set(result.score);

            update.eco = Some(result.score);
            update.events.extend(result.events);
        }

        if now - self.last_safety_calc + TIME_EPSILON >= self.config.safety_calc_interval_sec {
            let result =
                self.safety
                    .evaluate(self.store.safety(), self.store.eco(), &self.config, now);
            self.last_safety_calc = now;
            self.latest_safety = result.score;
            self.summary.record_safety(result.score);
            gauge!("drive_score_safety").set(result.score);

            update.safety = Some(result.score);
            update.events.extend(result.events);
        }

        if !update.is_empty() {
            for event in &update.events {
                self.summary.record_event(event);
                counter!("drive_score_events_total", "kind" => event.kind.as_str()).increment(1);
                self.publish(now, event.message.clone());
            }
            self.publish(now, String::new());
        }

        update
    }

    fn publish(&mut self, timestamp: f64, reason: String) {
        let notification = ScoreNotification {
            timestamp,
            eco_score: self.latest_eco,
            safety_score: self.latest_safety,
            reason,
        };
        if let Err(err) = self.sink.publish(&notification) {
            counter!("drive_score_sink_failures_total").increment(1);
            warn!(error = %err, timestamp, "dropped score notification");
        }
    }

    /// Latest known (eco, safety) scores
    pub fn latest_scores(&self) -> (f64, f64) {
        (self.latest_eco, self.latest_safety)
    }

    /// Sub-scores of the latest eco recompute
    pub fn latest_breakdown(&self) -> EcoBreakdown {
        self.latest_breakdown
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn store(&self) -> &SignalWindowStore {
        &self.store
    }

    pub fn summary(&self) -> &TripSummary {
        &self.summary
    }

    /// Start a new trip with the same configuration and sink
    pub fn reset(&mut self) {
        self.store.clear();
        self.safety.reset();
        self.last_eco_calc = 0.0;
        self.last_safety_calc = 0.0;
        self.latest_eco = 100.0;
        self.latest_safety = 100.0;
        self.latest_breakdown = EcoBreakdown::default();
        self.summary = TripSummary::new();
        info!("scoring engine reset");
    }
}
