//! Notification port
//!
//! The engine hands every notification to a [`NotificationSink`]. Delivery
//! is best effort: a failed publish is logged and dropped by the engine and
//! never affects scoring.

use crate::error::SinkError;
use crate::event::ScoreNotification;
use tokio::sync::mpsc;
use tracing::info;

/// Destination for score notifications
pub trait NotificationSink: Send {
    /// Deliver one notification without blocking
    fn publish(&mut self, notification: &ScoreNotification) -> Result<(), SinkError>;
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn publish(&mut self, notification: &ScoreNotification) -> Result<(), SinkError> {
        if notification.is_routine() {
            info!(
                timestamp = notification.timestamp,
                eco = notification.eco_score,
                safety = notification.safety_score,
                "score update"
            );
        } else {
            info!(
                timestamp = notification.timestamp,
                eco = notification.eco_score,
                safety = notification.safety_score,
                reason = %notification.reason,
                "driving notification"
            );
        }
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&mut self, _notification: &ScoreNotification) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards notifications into a bounded tokio channel.
///
/// Uses `try_send`, so a full channel drops the notification instead of
/// stalling the caller of `ingest`.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ScoreNotification>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ScoreNotification>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving half of its channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ScoreNotification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn publish(&mut self, notification: &ScoreNotification) -> Result<(), SinkError> {
        self.tx
            .try_send(notification.clone())
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => SinkError::Full,
                mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(reason: &str) -> ScoreNotification {
        ScoreNotification {
            timestamp: 1.0,
            eco_score: 90.0,
            safety_score: 100.0,
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (mut sink, mut rx) = ChannelSink::channel(4);
        sink.publish(&notification("Hard braking")).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.reason, "Hard braking");
    }

    #[test]
    fn test_channel_sink_full() {
        let (mut sink, _rx) = ChannelSink::channel(1);
        assert!(sink.publish(&notification("")).is_ok());
        assert_eq!(sink.publish(&notification("")), Err(SinkError::Full));
    }

    #[test]
    fn test_channel_sink_closed() {
        let (mut sink, rx) = ChannelSink::channel(1);
        drop(rx);
        assert_eq!(sink.publish(&notification("")), Err(SinkError::Closed));
    }

    #[test]
    fn test_log_and_null_sinks_accept() {
        assert!(LogSink.publish(&notification("")).is_ok());
        assert!(NullSink.publish(&notification("Idling")).is_ok());
    }
}
