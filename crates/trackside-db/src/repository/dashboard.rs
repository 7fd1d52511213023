//! # Dashboard Repository
//!
//! Read-only aggregation for the back-office dashboard and the daybook.
//!
//! ## Queries
//!
//! ```text
//!   stats()                                daybook(date)
//!   ├─ sale totals (count/revenue/         ├─ that day's sales   (+amount)
//!   │  discount/tax)                       └─ that day's expenses (−amount)
//!   ├─ revenue by service kind                merged, ordered by time
//!   ├─ revenue by menu category
//!   ├─ top 10 services by revenue
//!   ├─ expense totals      (optional)
//!   └─ task counts by status
//! ```
//!
//! Kind, category, and service-name breakdowns join the live catalog rows,
//! so lines whose catalog entry was deleted drop out of the breakdowns while
//! still counting toward the sale totals.
//!
//! The caller decides visibility: the expenses block runs only when asked
//! for, and the task counts narrow to one assignee when one is given.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use trackside_core::{
    CategoryStats, DashboardStats, DaybookEntry, DaybookKind, ExpenseTotals, Money, SalesTotals,
    ServiceKindStats, TaskStatusCount, TopService,
};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::{day_range, day_start, next_day_start};

/// How many services the "top services" breakdown returns.
const TOP_SERVICES_LIMIT: i64 = 10;

/// Repository for dashboard aggregation.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the full dashboard payload for the given date range.
    ///
    /// `include_expenses` and `task_assignee` encode the caller's
    /// permissions: the expenses block is skipped entirely without the
    /// view capability, and plain staff only see their own task counts.
    pub async fn stats(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        task_assignee: Option<Uuid>,
        include_expenses: bool,
    ) -> DbResult<DashboardStats> {
        let (start, end) = day_range(start_date, end_date);

        let sales = sqlx::query_as::<_, SalesTotals>(
            "SELECT COUNT(*) AS total_sales,
                    CAST(COALESCE(SUM(final_amount), 0) AS BIGINT) AS total_revenue,
                    CAST(COALESCE(SUM(discount_amount), 0) AS BIGINT) AS total_discount,
                    CAST(COALESCE(SUM(tax_amount), 0) AS BIGINT) AS total_tax
             FROM sales
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)
               AND ($2::timestamptz IS NULL OR created_at < $2)",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let sales_by_service = sqlx::query_as::<_, ServiceKindStats>(
            "SELECT sv.kind,
                    COUNT(ss.id) AS count,
                    CAST(COALESCE(SUM(ss.total_price), 0) AS BIGINT) AS revenue
             FROM sale_services ss
             JOIN services sv ON sv.id = ss.service_id
             JOIN sales sa ON sa.id = ss.sale_id
             WHERE ($1::timestamptz IS NULL OR sa.created_at >= $1)
               AND ($2::timestamptz IS NULL OR sa.created_at < $2)
             GROUP BY sv.kind
             ORDER BY revenue DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let sales_by_category = sqlx::query_as::<_, CategoryStats>(
            "SELECT mi.category,
                    COUNT(smi.id) AS count,
                    CAST(COALESCE(SUM(smi.total_price), 0) AS BIGINT) AS revenue
             FROM sale_menu_items smi
             JOIN menu_items mi ON mi.id = smi.menu_item_id
             JOIN sales sa ON sa.id = smi.sale_id
             WHERE ($1::timestamptz IS NULL OR sa.created_at >= $1)
               AND ($2::timestamptz IS NULL OR sa.created_at < $2)
             GROUP BY mi.category
             ORDER BY revenue DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let top_services = sqlx::query_as::<_, TopService>(
            "SELECT sv.id AS service_id,
                    sv.name,
                    COUNT(ss.id) AS count,
                    CAST(COALESCE(SUM(ss.total_price), 0) AS BIGINT) AS revenue
             FROM sale_services ss
             JOIN services sv ON sv.id = ss.service_id
             JOIN sales sa ON sa.id = ss.sale_id
             WHERE ($1::timestamptz IS NULL OR sa.created_at >= $1)
               AND ($2::timestamptz IS NULL OR sa.created_at < $2)
             GROUP BY sv.id, sv.name
             ORDER BY revenue DESC
             LIMIT $3",
        )
        .bind(start)
        .bind(end)
        .bind(TOP_SERVICES_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        // Expense dates are plain DATE columns; the range stays inclusive
        // on both ends instead of going through the timestamp bounds.
        let expenses = if include_expenses {
            let totals = sqlx::query_as::<_, ExpenseTotals>(
                "SELECT CAST(COALESCE(SUM(amount), 0) AS BIGINT) AS total_expenses,
                        COUNT(*) AS count
                 FROM expenses
                 WHERE ($1::date IS NULL OR date >= $1)
                   AND ($2::date IS NULL OR date <= $2)",
            )
            .bind(start_date)
            .bind(end_date)
            .fetch_one(&self.pool)
            .await?;
            Some(totals)
        } else {
            None
        };

        let tasks = sqlx::query_as::<_, TaskStatusCount>(
            "SELECT status, COUNT(*) AS count
             FROM tasks
             WHERE ($1::uuid IS NULL OR assignee_id = $1)
             GROUP BY status
             ORDER BY status",
        )
        .bind(task_assignee)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            sales,
            sales_by_service,
            sales_by_category,
            top_services,
            expenses,
            tasks,
        })
    }

    /// The daybook: every sale and expense of one day as a single ledger,
    /// ordered by time of day. Sales enter positive, expenses negative.
    pub async fn daybook(&self, date: NaiveDate) -> DbResult<Vec<DaybookEntry>> {
        let start = day_start(date);
        let end = next_day_start(date);

        let sale_rows = sqlx::query_as::<_, (Uuid, String, Money, DateTime<Utc>)>(
            "SELECT id, sale_number, final_amount, created_at
             FROM sales
             WHERE created_at >= $1 AND created_at < $2
             ORDER BY created_at",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let expense_rows = sqlx::query_as::<_, (Uuid, String, Option<String>, Money)>(
            "SELECT id, category, description, amount
             FROM expenses
             WHERE date = $1
             ORDER BY created_at",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut entries: Vec<DaybookEntry> = Vec::with_capacity(sale_rows.len() + expense_rows.len());

        for (id, sale_number, final_amount, created_at) in sale_rows {
            entries.push(DaybookEntry {
                id,
                kind: DaybookKind::Sale,
                reference: sale_number,
                description: Some("Revenue".to_string()),
                amount: final_amount,
                occurred_at: created_at,
            });
        }

        // Expenses carry a date, not a timestamp; they sort at the start
        // of the day ahead of any sale.
        for (id, category, description, amount) in expense_rows {
            entries.push(DaybookEntry {
                id,
                kind: DaybookKind::Expense,
                reference: category,
                description,
                amount: amount.negate(),
                occurred_at: start,
            });
        }

        entries.sort_by_key(|entry| entry.occurred_at);

        Ok(entries)
    }
}
