//! # trackside-db: Database Layer for Trackside POS
//!
//! This crate provides database access for the Trackside POS system.
//! It uses PostgreSQL with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Trackside POS Data Flow                            │
//! │                                                                         │
//! │  API Route Handler (POST /api/sales)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   trackside-db (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │    │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │    │ (sale.rs, ...) │    │  (embedded)  │   │    │
//! │  │   │               │    │                │    │              │   │    │
//! │  │   │ PgPool        │    │ SaleRepo       │    │ 0001_initial │   │    │
//! │  │   │ Connection    │◄───│ CustomerRepo   │    │ _schema.sql  │   │    │
//! │  │   │ Management    │    │ OutboxRepo ... │    │              │   │    │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘   │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    PostgreSQL Database                          │    │
//! │  │        postgres://localhost/trackside  (DATABASE_URL)           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (sale, customer, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trackside_db::{Database, DbConfig};
//!
//! // Connect and migrate
//! let config = DbConfig::new("postgres://localhost/trackside");
//! let db = Database::connect(config).await?;
//!
//! // Use repositories
//! let customers = db.customers().list(Some("98840")).await?;
//! let sale = db.sales().create(&request, method, staff_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::audit::{AuditFilter, AuditRepository};
pub use repository::car::{CarInput, CarRepository};
pub use repository::customer::{CustomerInput, CustomerRepository};
pub use repository::dashboard::DashboardRepository;
pub use repository::expense::{ExpenseFilter, ExpenseInput, ExpenseRepository};
pub use repository::menu::{MenuItemInput, MenuItemRepository};
pub use repository::outbox::OutboxRepository;
pub use repository::package::{PackageInput, PackageItemInput, PackageRepository};
pub use repository::sale::{SaleListFilter, SaleRepository};
pub use repository::service::{ServiceInput, ServiceRepository};
pub use repository::staff::{StaffInput, StaffRepository};
pub use repository::task::{TaskFilter, TaskInput, TaskRepository, TaskStatusUpdate};
pub use repository::track::{TrackInput, TrackRepository};
