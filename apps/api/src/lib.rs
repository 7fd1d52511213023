//! # Trackside API
//!
//! REST server for the Trackside point-of-sale and back office.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Trackside API Routes                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /sales        │  │  /customers    │  │  Catalog                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • Create sale  │  │ • Search       │  │ • /services  • /tracks     ││
//! │  │ • List/filter  │  │ • Visit stats  │  │ • /menu      • /cars       ││
//! │  │ • Line detail  │  │ • CRUD         │  │ • /packages                ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /dashboard    │  │  /tasks        │  │  /expenses  /audit-logs    ││
//! │  │                │  │                │  │                            ││
//! │  │ • Stats        │  │ • Assignments  │  │ • Spend tracking           ││
//! │  │ • Daybook      │  │ • Reminders    │  │ • Immutable audit trail    ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  PostgreSQL  │  │   JWT Auth   │  │    Outbox Dispatcher     ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ trackside-db │  │ Bearer token │  │ Audit trail              ││  │
//! │  │  │ repositories │  │ verification │  │ Notifications            ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP server port (default: 5001)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `DB_MAX_CONNECTIONS` - Connection pool size (default: 20)
//! - `JWT_SECRET` - Secret for verifying bearer tokens
//! - `OUTBOX_POLL_INTERVAL_SECS` - Dispatcher poll cadence (default: 5)
//! - `OUTBOX_BATCH_SIZE` - Events claimed per dispatcher poll (default: 50)
//! - `OUTBOX_MAX_ATTEMPTS` - Delivery attempts before an event is parked (default: 5)

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use events::Dispatcher;
pub use routes::api_router;

use crate::auth::JwtVerifier;
use trackside_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub verifier: JwtVerifier,
}
