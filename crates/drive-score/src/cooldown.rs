//! Per-event-kind cooldown timers

use crate::event::EventKind;
use std::collections::HashMap;

/// Tracks when each event kind last fired, on the caller's clock.
///
/// A kind with no entry has never fired in the current safety window and
/// is never in cooldown.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    last_fired: HashMap<EventKind, f64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `kind` may fire at `now` given its cooldown duration
    pub fn is_ready(&self, kind: EventKind, now: f64, cooldown: f64) -> bool {
        match self.last_fired.get(&kind) {
            Some(&last) => now - last >= cooldown,
            None => true,
        }
    }

    /// Record that `kind` fired at `now`
    pub fn record_fire(&mut self, kind: EventKind, now: f64) {
        self.last_fired.insert(kind, now);
    }

    /// Timestamp of the last firing of `kind`, if any
    pub fn last_fired(&self, kind: EventKind) -> Option<f64> {
        self.last_fired.get(&kind).copied()
    }

    /// Forget every timer (safety window reset)
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_fired_is_ready() {
        let tracker = CooldownTracker::new();
        assert!(tracker.is_ready(EventKind::HardBraking, 0.0, 2.0));
        assert!(tracker.last_fired(EventKind::HardBraking).is_none());
    }

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let mut tracker = CooldownTracker::new();
        tracker.record_fire(EventKind::HardBraking, 5.0);

        assert!(!tracker.is_ready(EventKind::HardBraking, 6.0, 2.0));
        assert!(tracker.is_ready(EventKind::HardBraking, 7.0, 2.0));
        // Kinds are independent
        assert!(tracker.is_ready(EventKind::HardAcceleration, 6.0, 2.0));
    }

    #[test]
    fn test_clear_resets_timers() {
        let mut tracker = CooldownTracker::new();
        tracker.record_fire(EventKind::JerkySteering, 1.0);
        tracker.clear();
        assert!(tracker.is_ready(EventKind::JerkySteering, 1.1, 2.0));
    }
}
