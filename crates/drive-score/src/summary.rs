//! End-of-trip summary

use crate::event::{DrivingEvent, EventKind, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the violation table handed to coaching tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: EventKind,
    pub label: String,
    pub count: usize,
    /// Worst severity observed for this kind
    pub severity: Severity,
}

/// Running totals over one trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub eco_evaluations: usize,
    pub safety_evaluations: usize,
    eco_total: f64,
    safety_total: f64,
    pub min_safety: Option<f64>,
    pub latest_eco: Option<f64>,
    pub latest_safety: Option<f64>,
    event_counts: BTreeMap<EventKind, (usize, Severity)>,
}

impl TripSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn observe(&mut self, timestamp: f64) {
        self.first_timestamp.get_or_insert(timestamp);
        self.last_timestamp = Some(timestamp);
    }

    pub(crate) fn record_eco(&mut self, score: f64) {
        self.eco_evaluations += 1;
        self.eco_total += score;
        self.latest_eco = Some(score);
    }

    pub(crate) fn record_safety(&mut self, score: f64) {
        self.safety_evaluations += 1;
        self.safety_total += score;
        self.latest_safety = Some(score);
        self.min_safety = Some(self.min_safety.map_or(score, |min| min.min(score)));
    }

    pub(crate) fn record_event(&mut self, event: &DrivingEvent) {
        let entry = self
            .event_counts
            .entry(event.kind)
            .or_insert((0, event.severity));
        entry.0 += 1;
        entry.1 = entry.1.max(event.severity);
    }

    /// Trip duration covered by ingested snapshots (seconds)
    pub fn duration(&self) -> f64 {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    /// Mean of every eco recompute, if any ran
    pub fn mean_eco(&self) -> Option<f64> {
        (self.eco_evaluations > 0).then(|| self.eco_total / self.eco_evaluations as f64)
    }

    /// Mean of every safety recompute, if any ran
    pub fn mean_safety(&self) -> Option<f64> {
        (self.safety_evaluations > 0).then(|| self.safety_total / self.safety_evaluations as f64)
    }

    /// How often `kind` fired
    pub fn count(&self, kind: EventKind) -> usize {
        self.event_counts.get(&kind).map_or(0, |(count, _)| *count)
    }

    /// Total number of safety events charged during the trip
    pub fn safety_event_count(&self) -> usize {
        self.event_counts
            .iter()
            .filter(|(kind, _)| kind.is_safety())
            .map(|(_, (count, _))| count)
            .sum()
    }

    /// Every kind that fired, most frequent first
    pub fn violations(&self) -> Vec<Violation> {
        let mut rows: Vec<Violation> = self
            .event_counts
            .iter()
            .map(|(&kind, &(count, severity))| Violation {
                kind,
                label: kind.label().to_string(),
                count,
                severity,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(b.severity.cmp(&a.severity)));
        rows
    }
}
