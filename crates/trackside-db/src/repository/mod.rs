//! # Repository Module
//!
//! Database repository implementations for Trackside POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Request Handler                                                        │
//! │       │                                                                 │
//! │       │  db.customers().list(Some("98840"))                             │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                     │
//! │  ├── list(&self, search)                                                │
//! │  ├── get_detail(&self, id)                                              │
//! │  ├── create(&self, input)                                               │
//! │  └── update(&self, id, input)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                             │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place                                         │
//! │  • Handlers stay thin (gate, call, serialize)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer CRUD and visit history
//! - [`track::TrackRepository`] / [`car::CarRepository`] - Facility catalog
//! - [`service::ServiceRepository`] - Ride/service catalog
//! - [`menu::MenuItemRepository`] - Café menu catalog
//! - [`package::PackageRepository`] - Bundles of a ride plus menu items
//! - [`sale::SaleRepository`] - The transactional sale writer + history
//! - [`expense::ExpenseRepository`] - Operating expenses
//! - [`task::TaskRepository`] - Staff task board and reminders
//! - [`staff::StaffRepository`] - Staff lookup and capability grants
//! - [`audit::AuditRepository`] - Audit trail writes and queries
//! - [`outbox::OutboxRepository`] - Outbound-event outbox
//! - [`dashboard::DashboardRepository`] - Aggregated stats and the daybook

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

pub mod audit;
pub mod car;
pub mod customer;
pub mod dashboard;
pub mod expense;
pub mod menu;
pub mod outbox;
pub mod package;
pub mod sale;
pub mod service;
pub mod staff;
pub mod task;
pub mod track;

/// Converts optional calendar-date filters into timestamp bounds.
///
/// Date filters arrive as plain dates ("2025-03-01") but the tables store
/// `timestamptz`. The start date becomes midnight UTC of that day, the end
/// date becomes midnight UTC of the *following* day, so callers compare with
/// `>= start` and `< end` and the end date is inclusive.
///
/// ## Example
/// ```rust,ignore
/// let (from, to) = day_range(Some(start), Some(end));
/// // WHERE ($1::timestamptz IS NULL OR created_at >= $1)
/// //   AND ($2::timestamptz IS NULL OR created_at <  $2)
/// ```
pub(crate) fn day_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = start.map(day_start);
    let to = end.map(next_day_start);
    (from, to)
}

/// Midnight UTC at the start of the given calendar date.
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC at the start of the day after the given date. Used as the
/// exclusive upper bound of single-day and inclusive-end ranges.
pub(crate) fn next_day_start(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.checked_add_days(Days::new(1)).unwrap_or(date))
}

// Serde defaults for input payloads: omitted flags mean "active",
// omitted quantities mean one.
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_quantity() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_range_bounds() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

        let (from, to) = day_range(Some(start), Some(end));

        assert_eq!(from.unwrap().to_rfc3339(), "2025-03-01T00:00:00+00:00");
        // End bound is the start of the NEXT day, so March 31 is included
        assert_eq!(to.unwrap().to_rfc3339(), "2025-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_day_range_open_ended() {
        let (from, to) = day_range(None, None);
        assert!(from.is_none());
        assert!(to.is_none());

        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let (from, to) = day_range(Some(start), None);
        assert!(from.is_some());
        assert!(to.is_none());
    }

    #[test]
    fn test_day_range_crosses_month_end() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (_, to) = day_range(None, Some(end));
        assert_eq!(to.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }
}
