//! # Audit Repository
//!
//! The persisted audit trail. Rows are written by the outbound-event
//! dispatcher (never inline with a request) and read back through the
//! main-admin-only audit endpoint.
//!
//! ## Flow
//!
//! ```text
//!   mutation handler ──▶ outbox (audit event) ──▶ dispatcher ──▶ record()
//!                                                                   │
//!   GET /audit ◀── list() ◀── audit_logs ◀────────────────────────────┘
//! ```
//!
//! Reads are capped at [`MAX_AUDIT_ROWS`]; the filters narrow, the cap
//! protects the endpoint from unbounded history.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use trackside_core::{AuditAction, AuditEvent, AuditLogDetail};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::day_range;

/// Hard cap on rows returned by [`AuditRepository::list`].
const MAX_AUDIT_ROWS: i64 = 500;

/// Filters accepted by the audit list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub entity_type: Option<String>,
    pub staff_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Repository for audit trail rows.
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Writes one audit row from a dispatched event payload.
    pub async fn record(&self, event: &AuditEvent) -> DbResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO audit_logs
                 (id, staff_id, action, entity_type, entity_id,
                  old_values, new_values, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(event.staff_id)
        .bind(event.action)
        .bind(&event.entity_type)
        .bind(event.entity_id)
        .bind(&event.old_values)
        .bind(&event.new_values)
        .bind(&event.description)
        .execute(&self.pool)
        .await?;

        debug!(
            id = %id,
            entity_type = %event.entity_type,
            action = %event.action.as_str(),
            "audit row recorded"
        );
        Ok(id)
    }

    /// Lists audit rows matching the filter, newest first, joined with the
    /// acting staff member's name. Capped at [`MAX_AUDIT_ROWS`].
    pub async fn list(&self, filter: &AuditFilter) -> DbResult<Vec<AuditLogDetail>> {
        let (start, end) = day_range(filter.start_date, filter.end_date);

        let logs = sqlx::query_as::<_, AuditLogDetail>(
            "SELECT al.id, al.staff_id, al.action, al.entity_type, al.entity_id,
                    al.old_values, al.new_values, al.description, al.created_at,
                    s.full_name AS staff_name
             FROM audit_logs al
             LEFT JOIN staff s ON s.id = al.staff_id
             WHERE ($1::text IS NULL OR al.entity_type = $1)
               AND ($2::uuid IS NULL OR al.staff_id = $2)
               AND ($3::audit_action IS NULL OR al.action = $3)
               AND ($4::timestamptz IS NULL OR al.created_at >= $4)
               AND ($5::timestamptz IS NULL OR al.created_at < $5)
             ORDER BY al.created_at DESC
             LIMIT $6",
        )
        .bind(&filter.entity_type)
        .bind(filter.staff_id)
        .bind(filter.action)
        .bind(start)
        .bind(end)
        .bind(MAX_AUDIT_ROWS)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_deserializes_from_query() {
        let filter: AuditFilter = serde_json::from_str(
            r#"{"entity_type": "sale", "action": "create", "start_date": "2025-03-01"}"#,
        )
        .unwrap();
        assert_eq!(filter.entity_type.as_deref(), Some("sale"));
        assert_eq!(filter.action, Some(AuditAction::Create));
        assert_eq!(
            filter.start_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert!(filter.staff_id.is_none());
        assert!(filter.end_date.is_none());
    }

    #[test]
    fn test_empty_filter_is_all_none() {
        let filter = AuditFilter::default();
        assert!(filter.entity_type.is_none());
        assert!(filter.action.is_none());
    }
}
