//! # Dashboard Routes
//!
//! Aggregated numbers for the back office. What the caller gets depends
//! on who they are: expense totals appear only with the view-expenses
//! capability, and the staff role sees only its own task counts.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use trackside_core::{Capability, DashboardStats, DaybookEntry, StaffRole};

use crate::auth::{require, CurrentStaff};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/daybook", get(daybook))
}

#[derive(Debug, Default, Deserialize)]
struct StatsQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct DaybookQuery {
    date: Option<NaiveDate>,
}

/// `GET /api/dashboard/stats?start_date&end_date` (dates inclusive).
async fn stats(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<DashboardStats>> {
    let include_expenses = ctx.can(Capability::ViewExpenses);
    let task_assignee = match ctx.role {
        StaffRole::Staff => Some(ctx.staff_id),
        _ => None,
    };

    let stats = state
        .db
        .dashboard()
        .stats(query.start_date, query.end_date, task_assignee, include_expenses)
        .await?;

    Ok(Json(stats))
}

/// `GET /api/dashboard/daybook?date=`: one day's sales and expenses
/// merged into a time-ordered ledger.
async fn daybook(
    State(state): State<AppState>,
    CurrentStaff(ctx): CurrentStaff,
    Query(query): Query<DaybookQuery>,
) -> ApiResult<Json<Vec<DaybookEntry>>> {
    require(&ctx, Capability::ViewExpenses)?;

    let date = query
        .date
        .ok_or_else(|| ApiError::validation("Date is required"))?;

    let entries = state.db.dashboard().daybook(date).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_query_dates_are_optional() {
        let query: StatsQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert!(query.start_date.is_none());

        let query: StatsQuery =
            serde_json::from_str(r#"{"start_date": "2025-03-01"}"#).unwrap();
        assert_eq!(
            query.start_date,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }
}
