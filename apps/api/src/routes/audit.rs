//! # Audit Trail Routes
//!
//! Main admin only. The trail itself is written by the outbound-event
//! dispatcher; this route just reads it back.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use trackside_core::AuditLogDetail;
use trackside_db::AuditFilter;

use crate::auth::CurrentStaff;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs))
}

/// `GET /api/audit?entity_type&staff_id&action&start_date&end_date`
///
/// Capped at 500 rows, newest first.
async fn list_audit_logs(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Query(filter): Query<AuditFilter>,
) -> ApiResult<Json<Vec<AuditLogDetail>>> {
    if !ctx.is_main_admin() {
        return Err(ApiError::forbidden());
    }

    let logs = state.db.audit().list(&filter).await?;
    Ok(Json(logs))
}
