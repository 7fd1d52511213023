//! # Outbound Event Dispatcher
//!
//! Background worker that drains the outbound-event outbox.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Outbound Event Flow                                │
//! │                                                                         │
//! │  Route Handler (after commit)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  queue_audit / queue_notification ──► outbound_events table             │
//! │  (enqueue failures logged, never                  │                     │
//! │   propagated to the request)                      │                     │
//! │                                                   ▼                     │
//! │  Dispatcher (this module, own task)  ◄── polls every N seconds          │
//! │       │                                                                 │
//! │       ├── EventKind::Audit ────────► audit_logs row                     │
//! │       │                                                                 │
//! │       └── EventKind::Notification ─► Notifier::notify                   │
//! │                                      (default: log; SMTP lives behind   │
//! │                                       this seam in production)          │
//! │                                                                         │
//! │  Success → delivered_at set                                             │
//! │  Failure → attempts += 1, last_error recorded; entries past the retry   │
//! │            cap stay visible in the table instead of vanishing           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is at-least-once: a crash between delivery and `mark_delivered`
//! replays the event on the next poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use trackside_core::{AuditEvent, EventKind, NotificationEvent, OutboundEvent};
use trackside_db::{Database, DbResult};

use crate::config::ApiConfig;

/// Delivered events older than this are purged on the cleanup cadence.
const DELIVERED_RETENTION_DAYS: i64 = 7;

/// How often the dispatcher purges old delivered events.
const CLEANUP_INTERVAL_SECS: u64 = 3600;

// =============================================================================
// Notifier Trait
// =============================================================================

/// Delivery seam for notification events (implemented by the mail sender).
pub trait Notifier: Send + Sync {
    /// Hands one notification to the delivery channel.
    fn notify(&self, event: &NotificationEvent) -> Result<(), String>;
}

/// Default notifier: writes the notification to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<(), String> {
        info!(subject = %event.subject, "Notification: {}", event.body);
        Ok(())
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Polls the outbox and delivers pending events.
pub struct Dispatcher {
    db: Database,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    batch_size: i64,
    max_attempts: i32,
}

impl Dispatcher {
    /// Creates a dispatcher with the default log notifier.
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        Dispatcher {
            db,
            notifier: Arc::new(LogNotifier),
            poll_interval: Duration::from_secs(config.outbox_poll_interval_secs),
            batch_size: config.outbox_batch_size,
            max_attempts: config.outbox_max_attempts,
        }
    }

    /// Replaces the notifier (used by deployments that send mail).
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Runs the poll loop until the shutdown channel fires.
    pub async fn run(self, mut shutdown: mpsc::Receiver<()>) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            batch_size = self.batch_size,
            "Outbound event dispatcher started"
        );

        let mut poll = interval(self.poll_interval);
        let mut cleanup = interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if let Err(e) = self.drain().await {
                        error!("Outbox poll failed: {}", e);
                    }
                }
                _ = cleanup.tick() => {
                    match self.db.outbox().cleanup_delivered(DELIVERED_RETENTION_DAYS).await {
                        Ok(0) => {}
                        Ok(n) => debug!(purged = n, "Cleaned up delivered events"),
                        Err(e) => error!("Outbox cleanup failed: {}", e),
                    }
                }
                _ = shutdown.recv() => {
                    info!("Outbound event dispatcher stopping");
                    break;
                }
            }
        }
    }

    /// Delivers one batch of pending events.
    async fn drain(&self) -> DbResult<()> {
        let pending = self
            .db
            .outbox()
            .get_pending(self.batch_size, self.max_attempts)
            .await?;

        if pending.is_empty() {
            return Ok(());
        }

        debug!(count = pending.len(), "Delivering outbound events");

        for event in pending {
            match self.deliver(&event).await {
                Ok(()) => self.db.outbox().mark_delivered(event.id).await?,
                Err(reason) => {
                    warn!(
                        event_id = %event.id,
                        kind = ?event.kind,
                        attempts = event.attempts + 1,
                        "Event delivery failed: {}", reason
                    );
                    self.db.outbox().mark_failed(event.id, &reason).await?;
                }
            }
        }

        Ok(())
    }

    /// Delivers a single event according to its kind.
    ///
    /// A payload that no longer decodes fails every attempt and ends up
    /// parked past the retry cap with its decode error as `last_error`.
    async fn deliver(&self, event: &OutboundEvent) -> Result<(), String> {
        match event.kind {
            EventKind::Audit => {
                let audit: AuditEvent = serde_json::from_value(event.payload.clone())
                    .map_err(|e| format!("audit payload decode: {e}"))?;
                self.db
                    .audit()
                    .record(&audit)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(())
            }
            EventKind::Notification => {
                let notification: NotificationEvent =
                    serde_json::from_value(event.payload.clone())
                        .map_err(|e| format!("notification payload decode: {e}"))?;
                self.notifier.notify(&notification)
            }
        }
    }
}

// =============================================================================
// Enqueue Helpers
// =============================================================================

/// Queues an audit event after a successful mutation.
///
/// Enqueue failures are logged and swallowed: the mutation already
/// committed and must not fail retroactively.
pub async fn queue_audit(db: &Database, event: AuditEvent) {
    if let Err(e) = db.outbox().queue_audit(&event).await {
        warn!(
            entity_type = %event.entity_type,
            "Failed to queue audit event: {}", e
        );
    }
}

/// Queues a notification event after a successful mutation.
pub async fn queue_notification(db: &Database, event: NotificationEvent) {
    if let Err(e) = db.outbox().queue_notification(&event).await {
        warn!(subject = %event.subject, "Failed to queue notification: {}", e);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Captures notifications instead of delivering them.
    struct RecordingNotifier {
        seen: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: &NotificationEvent) -> Result<(), String> {
            self.seen.lock().unwrap().push(event.subject.clone());
            Ok(())
        }
    }

    #[test]
    fn test_log_notifier_always_succeeds() {
        let event = NotificationEvent {
            subject: "New Sale - TRK-20250315-0001".to_string(),
            body: "Total: 450.00".to_string(),
        };
        assert!(LogNotifier.notify(&event).is_ok());
    }

    #[test]
    fn test_notifier_seam_is_swappable() {
        let recorder = RecordingNotifier {
            seen: Mutex::new(Vec::new()),
        };
        let event = NotificationEvent {
            subject: "New Sale - TRK-20250315-0002".to_string(),
            body: "Total: 200.00".to_string(),
        };

        recorder.notify(&event).unwrap();

        assert_eq!(
            recorder.seen.lock().unwrap().as_slice(),
            ["New Sale - TRK-20250315-0002"]
        );
    }

    #[test]
    fn test_audit_payload_survives_the_queue_format() {
        // The dispatcher decodes whatever queue_audit serialized; the two
        // sides must agree on the JSON shape.
        let event = AuditEvent::create(
            Uuid::new_v4(),
            "service",
            Uuid::new_v4(),
            Some(serde_json::json!({"name": "Track Session"})),
            "Created service: Track Session",
        );

        let payload = serde_json::to_value(&event).unwrap();
        let decoded: AuditEvent = serde_json::from_value(payload).unwrap();

        assert_eq!(decoded.entity_type, "service");
        assert_eq!(
            decoded.description.as_deref(),
            Some("Created service: Track Session")
        );
    }
}
