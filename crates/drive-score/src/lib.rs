//! Driving Behaviour Scoring
//!
//! Turns a stream of vehicle signal snapshots into two independent scores:
//! - Eco score: sliding-window efficiency (acceleration smoothness, RPM
//!   efficiency, idling, gear selection)
//! - Safety score: penalty accumulated per safety window from hard
//!   longitudinal g, aggressive cornering, jerky steering, stability/ABS
//!   interventions and aggressive pedal use
//!
//! The engine never reads wall-clock time; every timestamp comes from the
//! snapshots. Notifications go to an injected [`NotificationSink`].

pub mod config;
pub mod cooldown;
pub mod eco;
pub mod engine;
pub mod error;
pub mod event;
pub mod notify;
pub mod safety;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use config::ScoringConfig;
pub use cooldown::CooldownTracker;
pub use eco::{EcoBreakdown, EcoEvaluation, EcoScoreCalculator};
pub use engine::{ScoreUpdate, ScoringEngine};
pub use error::{ConfigError, SinkError};
pub use event::{DrivingEvent, EventKind, ScoreNotification, Severity};
pub use notify::{ChannelSink, LogSink, NotificationSink, NullSink};
pub use safety::{Detection, SafetyEvaluation, SafetyScoreCalculator};
pub use snapshot::{GearPosition, Snapshot, SnapshotUpdate};
pub use store::{EcoWindows, SafetyWindows, SignalWindowStore};
pub use summary::{TripSummary, Violation};

/// Tolerance for schedule comparisons on accumulated float timestamps
pub(crate) const TIME_EPSILON: f64 = 1e-6;
