//! # trackside-core: Pure Business Logic for Trackside POS
//!
//! This crate is the **heart** of Trackside POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Trackside POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  trackside-api (axum)                           │   │
//! │  │   sales ─ customers ─ catalog ─ expenses ─ tasks ─ dashboard   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ trackside-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Customer │  │   Money   │  │ price_sale│  │   rules   │  │   │
//! │  │   │   Sale    │  │  TaxCalc  │  │ expansion │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 trackside-db (Database Layer)                   │   │
//! │  │          PostgreSQL queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Service, Package, Sale, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The sale pricing engine and package expansion
//! - [`permissions`] - Capability enum, sets, and the staff context
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use trackside_core::money::Money;
//! use trackside_core::types::TaxRate;
//!
//! // Create money from paise (never from floats!)
//! let price = Money::from_paise(12500); // ₹125.00
//!
//! // Calculate GST, rounding half-up at the paisa boundary
//! let tax_rate = TaxRate::from_bps(1000); // 10%
//! let tax = price.calculate_tax(tax_rate);
//!
//! assert_eq!(tax.paise(), 1250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod permissions;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use trackside_core::Money` instead of
// `use trackside_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use permissions::{Capability, CapabilitySet, StaffContext};
pub use pricing::{
    CatalogSnapshot, MenuItemSnapshot, MenuLineRequest, PackageItemSnapshot, PackageLineRequest,
    PackageSnapshot, PricedMenuLine, PricedPackageLine, PricedSale, PricedServiceLine, SaleRequest,
    ServiceLineRequest, ServiceSnapshot, price_sale,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line entries (services + packages + menu items) in a single sale.
///
/// ## Business Reason
/// Prevents runaway requests and ensures reasonable transaction sizes. A
/// birthday-party order tops out well below this.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity on a single sale line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i32 = 999;
