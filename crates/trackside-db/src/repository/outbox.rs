//! # Outbound-Event Outbox
//!
//! Queue for work that must not ride on the request path: audit rows and
//! notification intents. Mutation handlers enqueue after their own commit;
//! the API's dispatcher task drains the queue on an interval.
//!
//! ## Flow
//!
//! ```text
//!   handler ──▶ queue_audit / queue_notification ──▶ outbound_events
//!                                                        │
//!                       dispatcher ◀── get_pending ◀─────┘
//!                           │
//!                           ├─ success ──▶ mark_delivered
//!                           └─ failure ──▶ mark_failed (attempts + 1)
//! ```
//!
//! Delivery is at-least-once: a crash between handing off a payload and
//! marking it delivered replays the entry on the next poll. Entries that
//! exhaust their attempts stay in the table with `last_error` set, so
//! failures are observable rather than silent.

use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use trackside_core::{AuditEvent, EventKind, NotificationEvent, OutboundEvent};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for the outbound-event queue.
#[derive(Clone)]
pub struct OutboxRepository {
    pool: PgPool,
}

impl OutboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enqueues an audit event. The dispatcher later writes the audit row.
    pub async fn queue_audit(&self, event: &AuditEvent) -> DbResult<Uuid> {
        let payload = serde_json::to_value(event)
            .map_err(|e| DbError::Internal(format!("audit payload serialization: {e}")))?;
        self.queue(EventKind::Audit, payload).await
    }

    /// Enqueues a notification intent for the notifier collaborator.
    pub async fn queue_notification(&self, event: &NotificationEvent) -> DbResult<Uuid> {
        let payload = serde_json::to_value(event)
            .map_err(|e| DbError::Internal(format!("notification payload serialization: {e}")))?;
        self.queue(EventKind::Notification, payload).await
    }

    async fn queue(&self, kind: EventKind, payload: Value) -> DbResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO outbound_events (id, kind, payload) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(kind)
            .bind(payload)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, kind = ?kind, "outbound event queued");
        Ok(id)
    }

    /// Fetches undelivered events still under the retry cap, oldest first.
    pub async fn get_pending(&self, limit: i64, max_attempts: i32) -> DbResult<Vec<OutboundEvent>> {
        let events = sqlx::query_as::<_, OutboundEvent>(
            "SELECT id, kind, payload, attempts, last_error, created_at, delivered_at
             FROM outbound_events
             WHERE delivered_at IS NULL AND attempts < $2
             ORDER BY created_at ASC
             LIMIT $1",
        )
        .bind(limit)
        .bind(max_attempts)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Marks one event as successfully delivered.
    pub async fn mark_delivered(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("UPDATE outbound_events SET delivered_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Records a failed delivery attempt. The event stays pending until it
    /// hits the dispatcher's retry cap.
    pub async fn mark_failed(&self, id: Uuid, error: &str) -> DbResult<()> {
        sqlx::query(
            "UPDATE outbound_events
             SET attempts = attempts + 1, last_error = $2
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of undelivered events, including ones past the retry cap.
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM outbound_events WHERE delivered_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Deletes delivered events older than the given number of days.
    /// Returns how many rows were removed.
    pub async fn cleanup_delivered(&self, older_than_days: i64) -> DbResult<u64> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(older_than_days);

        let result = sqlx::query(
            "DELETE FROM outbound_events
             WHERE delivered_at IS NOT NULL AND delivered_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
