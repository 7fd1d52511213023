//! # Domain Types
//!
//! Core domain types used throughout Trackside POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog                      Sale                      Back office     │
//! │  ┌──────────────┐   ┌───────────────────────┐   ┌──────────────┐       │
//! │  │ Service      │   │ Sale (header totals)  │   │ Expense      │       │
//! │  │ MenuItem     │   │  ├─ SaleServiceLine   │   │ Task         │       │
//! │  │ Package      │──►│  ├─ SalePackageLine   │   │ AuditLog     │       │
//! │  │ Track / Car  │   │  └─ SaleMenuLine      │   │ Staff        │       │
//! │  └──────────────┘   └───────────────────────┘   └──────────────┘       │
//! │                                                                         │
//! │  Line rows are SNAPSHOTS: prices frozen at sale time. Catalog edits    │
//! │  and deletes never rewrite history.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the café GST slab), 500 bps = 5%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct TaxRate(i32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as i32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// What a catalog service actually sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "service_kind", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Timed session on one of the tracks.
    TrackSession,
    /// RC car rental.
    CarRental,
    /// Sold as part of a bundle.
    Package,
    Other,
}

/// How a sale or expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "payment_method", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    Other,
}

/// Staff roles, in decreasing order of authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "staff_role", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Owner. Holds every capability implicitly.
    MainAdmin,
    /// Manager with an explicitly granted capability set.
    SecondaryAdmin,
    /// Till operator. Sales and basic customer lookup only.
    Staff,
}

/// Task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "task_status", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// True once the task has reached its terminal "done" state.
    #[inline]
    pub const fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "task_priority", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// What a mutation did, for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "audit_action", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// Lowercase name, used when composing audit descriptions.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

/// A customer record. Phone numbers are unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One past sale in a customer's visit history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerVisit {
    #[ts(as = "String")]
    pub id: Uuid,
    pub sale_number: String,
    pub final_amount: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Customer detail view: the record plus their recent visits.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub visit_history: Vec<CustomerVisit>,
}

// =============================================================================
// Catalog: Services, Menu, Packages, Tracks, Cars
// =============================================================================

/// A sellable service: track time, car rental, or miscellaneous.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub kind: ServiceKind,
    pub description: Option<String>,
    pub base_price: Money,
    pub duration_minutes: Option<i32>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A café menu item. `tax_rate` is applied when sold directly.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub tax_rate: TaxRate,
    pub description: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A bundle: one base price covering track/car time plus configured
/// menu items that are expanded into individual lines at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Package {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Money,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    #[ts(as = "Option<String>")]
    pub car_id: Option<Uuid>,
    pub duration_minutes: Option<i32>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A menu item configured on a package, joined with display data.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PackageMenuItem {
    #[ts(as = "String")]
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub category: Option<String>,
}

/// Package detail view: the row plus its configured menu items.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PackageDetail {
    #[serde(flatten)]
    pub package: Package,
    pub menu_items: Vec<PackageMenuItem>,
}

/// A physical track.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Track {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// An RC car in the fleet, with acquisition bookkeeping.
///
/// The import columns (`china_rate_usd` onward) are owner bookkeeping,
/// entered as-is; the service never derives one from another.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Car {
    #[ts(as = "String")]
    pub id: Uuid,
    pub name: String,
    pub model: Option<String>,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    /// Purchase price in US cents.
    pub china_rate_usd: Option<Money>,
    /// USD→INR conversion rate applied at purchase time.
    pub indian_conversion: Option<f64>,
    pub shipping_cost: Option<Money>,
    pub total_cost: Option<Money>,
    pub our_rate: Option<Money>,
    pub rate_difference: Option<Money>,
    pub hourly_charge: Option<Money>,
    pub max_minutes: Option<i32>,
    pub play_minutes: Option<i32>,
    pub available_units: i32,
    pub total_units: i32,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sales
// =============================================================================

/// A completed sale header. Totals are computed once, at creation,
/// inside the sale transaction; the row is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    #[ts(as = "String")]
    pub id: Uuid,
    /// Business identifier, `SALE-YYYYMMDD-NNNN`. Unique.
    pub sale_number: String,
    #[ts(as = "Option<String>")]
    pub customer_id: Option<Uuid>,
    #[ts(as = "String")]
    pub staff_id: Uuid,
    /// Sum of pre-tax line totals (services, packages, direct menu items).
    pub total_amount: Money,
    /// Header-level discount, applied after tax.
    pub discount_amount: Money,
    /// Sum of direct menu-line taxes.
    pub tax_amount: Money,
    /// `total_amount + tax_amount - discount_amount`.
    pub final_amount: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A service line on a sale. Price snapshot frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleServiceLine {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub sale_id: Uuid,
    #[ts(as = "String")]
    pub service_id: Uuid,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    #[ts(as = "Option<String>")]
    pub car_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub total_price: Money,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A package line on a sale. The package's menu items are expanded
/// into separate [`SaleMenuLine`] rows carrying `source_package_id`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalePackageLine {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub sale_id: Uuid,
    #[ts(as = "String")]
    pub package_id: Uuid,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    #[ts(as = "Option<String>")]
    pub car_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub total_price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A menu-item line on a sale, either ordered directly or expanded
/// from a package (`source_package_id` set). Expanded lines carry
/// their own tax/total but are excluded from the header sums.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleMenuLine {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub sale_id: Uuid,
    #[ts(as = "String")]
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total_price: Money,
    #[ts(as = "Option<String>")]
    pub source_package_id: Option<Uuid>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Sale list row: the header joined with display names.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleSummary {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub sale: Sale,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub staff_name: Option<String>,
}

/// A service line joined with catalog display names for the detail view.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleServiceLineDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub line: SaleServiceLine,
    pub service_name: Option<String>,
    pub track_name: Option<String>,
    pub car_name: Option<String>,
    pub car_model: Option<String>,
}

/// A package line joined with display names for the detail view.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalePackageLineDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub line: SalePackageLine,
    pub package_name: Option<String>,
    pub track_name: Option<String>,
    pub car_name: Option<String>,
}

/// A menu line joined with display names for the detail view.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleMenuLineDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub line: SaleMenuLine,
    pub item_name: Option<String>,
    pub category: Option<String>,
}

/// Full sale detail: header, customer contact, and all three line sets.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub staff_name: Option<String>,
    pub services: Vec<SaleServiceLineDetail>,
    pub packages: Vec<SalePackageLineDetail>,
    pub menu_items: Vec<SaleMenuLineDetail>,
}

// =============================================================================
// Expenses
// =============================================================================

/// A business expense entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
    pub payment_method: Option<PaymentMethod>,
    pub receipt_number: Option<String>,
    #[ts(as = "String")]
    pub created_by: Uuid,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Expense list row joined with the creator's name.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ExpenseDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub expense: Expense,
    pub created_by_name: Option<String>,
}

// =============================================================================
// Tasks
// =============================================================================

/// A task assigned to a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Task {
    #[ts(as = "String")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub assignee_id: Option<Uuid>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_by: Uuid,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Task list row joined with assignee and creator names.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TaskDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub task: Task,
    pub assignee_name: Option<String>,
    pub created_by_name: Option<String>,
}

/// A staff member who can be assigned tasks.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Assignee {
    #[ts(as = "String")]
    pub id: Uuid,
    pub full_name: String,
    pub role: StaffRole,
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member. Credentials live with the identity service; this
/// record is reference data for joins, assignment, and authorization.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Staff {
    #[ts(as = "String")]
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: StaffRole,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Audit Log
// =============================================================================

/// One audit trail row: who did what to which entity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AuditLog {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "Option<String>")]
    pub staff_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    #[ts(as = "Option<String>")]
    pub entity_id: Option<Uuid>,
    /// Entity state before the mutation (update/delete).
    #[ts(type = "unknown | null")]
    pub old_values: Option<Value>,
    /// Entity state after the mutation (create/update).
    #[ts(type = "unknown | null")]
    pub new_values: Option<Value>,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Audit row joined with the acting staff member's name.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AuditLogDetail {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub log: AuditLog,
    pub staff_name: Option<String>,
}

// =============================================================================
// Outbound Events
// =============================================================================

/// What an outbound event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "event_kind", rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Audit trail entry to persist.
    Audit,
    /// Notification intent for the delivery collaborator.
    Notification,
}

/// An entry in the outbound-event queue.
/// Mutations enqueue; the dispatcher drains, so request handling is
/// never coupled to audit or notification delivery.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OutboundEvent {
    #[ts(as = "String")]
    pub id: Uuid,
    pub kind: EventKind,
    /// The full event body as JSON.
    #[ts(type = "unknown")]
    pub payload: Value,
    /// Number of delivery attempts.
    pub attempts: i32,
    /// Last error message if delivery failed.
    pub last_error: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// When successfully delivered.
    #[ts(as = "Option<String>")]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Payload of an `EventKind::Audit` outbound event. The dispatcher
/// deserializes this and writes the audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub staff_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub description: Option<String>,
}

impl AuditEvent {
    pub fn create(
        staff_id: Uuid,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        new_values: Option<Value>,
        description: impl Into<String>,
    ) -> Self {
        AuditEvent {
            staff_id: Some(staff_id),
            action: AuditAction::Create,
            entity_type: entity_type.into(),
            entity_id: Some(entity_id),
            old_values: None,
            new_values,
            description: Some(description.into()),
        }
    }

    pub fn update(
        staff_id: Uuid,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        old_values: Option<Value>,
        new_values: Option<Value>,
        description: impl Into<String>,
    ) -> Self {
        AuditEvent {
            staff_id: Some(staff_id),
            action: AuditAction::Update,
            entity_type: entity_type.into(),
            entity_id: Some(entity_id),
            old_values,
            new_values,
            description: Some(description.into()),
        }
    }

    pub fn delete(
        staff_id: Uuid,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        old_values: Option<Value>,
        description: impl Into<String>,
    ) -> Self {
        AuditEvent {
            staff_id: Some(staff_id),
            action: AuditAction::Delete,
            entity_type: entity_type.into(),
            entity_id: Some(entity_id),
            old_values,
            new_values: None,
            description: Some(description.into()),
        }
    }
}

/// Payload of an `EventKind::Notification` outbound event, handed to the
/// notifier collaborator on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub subject: String,
    pub body: String,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Aggregate sale figures for the requested range.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesTotals {
    pub total_sales: i64,
    pub total_revenue: Money,
    pub total_discount: Money,
    pub total_tax: Money,
}

/// Revenue broken down by service kind.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ServiceKindStats {
    pub kind: ServiceKind,
    pub count: i64,
    pub revenue: Money,
}

/// Revenue broken down by menu category.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategoryStats {
    pub category: String,
    pub count: i64,
    pub revenue: Money,
}

/// One of the highest-revenue services in the range.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TopService {
    #[ts(as = "String")]
    pub service_id: Uuid,
    pub name: String,
    pub count: i64,
    pub revenue: Money,
}

/// Aggregate expense figures for the requested range.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ExpenseTotals {
    pub total_expenses: Money,
    pub count: i64,
}

/// Task counts per status.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TaskStatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

/// The full dashboard payload. `expenses` is present only when the
/// caller holds the view-expenses capability.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub sales: SalesTotals,
    pub sales_by_service: Vec<ServiceKindStats>,
    pub sales_by_category: Vec<CategoryStats>,
    pub top_services: Vec<TopService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expenses: Option<ExpenseTotals>,
    pub tasks: Vec<TaskStatusCount>,
}

/// Which side of the daybook ledger an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DaybookKind {
    Sale,
    Expense,
}

/// One daybook ledger entry. Sales carry positive amounts, expenses
/// negative, so the entries sum to the day's net cash movement.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct DaybookEntry {
    #[ts(as = "String")]
    pub id: Uuid,
    pub kind: DaybookKind,
    /// Sale number or expense category.
    pub reference: String,
    pub description: Option<String>,
    pub amount: Money,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.25);
        assert_eq!(rate.bps(), 825);
    }

    #[test]
    fn test_task_status_default_and_completion() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert!(TaskStatus::Completed.is_completed());
        assert!(!TaskStatus::InProgress.is_completed());
    }

    #[test]
    fn test_payment_method_serde_names() {
        let json = serde_json::to_string(&PaymentMethod::Upi).unwrap();
        assert_eq!(json, "\"upi\"");
        let back: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(back, PaymentMethod::Cash);
    }

    #[test]
    fn test_audit_action_as_str() {
        assert_eq!(AuditAction::Create.as_str(), "create");
        assert_eq!(AuditAction::Delete.as_str(), "delete");
    }

    #[test]
    fn test_service_kind_serde_names() {
        let json = serde_json::to_string(&ServiceKind::TrackSession).unwrap();
        assert_eq!(json, "\"track_session\"");
    }

    #[test]
    fn test_audit_event_round_trip() {
        let staff = Uuid::new_v4();
        let entity = Uuid::new_v4();
        let event = AuditEvent::update(
            staff,
            "service",
            entity,
            Some(serde_json::json!({"base_price": 50000})),
            Some(serde_json::json!({"base_price": 55000})),
            "Service updated: Track Session",
        );

        let value = serde_json::to_value(&event).unwrap();
        let back: AuditEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back.action, AuditAction::Update);
        assert_eq!(back.staff_id, Some(staff));
        assert_eq!(back.entity_id, Some(entity));
        assert!(back.old_values.is_some());
    }
}
