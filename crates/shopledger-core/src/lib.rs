//! # shopledger-core: Pure Business Logic for ShopLedger
//!
//! ShopLedger is a small multi-shop retail backend: an admin manages shops,
//! workers and the product catalog; shop terminals create bills against a
//! shared product stock. This crate is the **heart** of the system: all
//! business rules live here as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    ShopLedger Architecture                      │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐ │
//! │  │            Outer surface (HTTP API / admin UI)            │ │
//! │  └─────────────────────────────┬─────────────────────────────┘ │
//! │                                │                                │
//! │  ┌─────────────────────────────▼─────────────────────────────┐ │
//! │  │             ★ shopledger-core (THIS CRATE) ★              │ │
//! │  │                                                           │ │
//! │  │   ┌─────────┐  ┌─────────┐  ┌────────────┐  ┌─────────┐  │ │
//! │  │   │  types  │  │  money  │  │ validation │  │  error  │  │ │
//! │  │   │ Product │  │  Money  │  │   rules    │  │  typed  │  │ │
//! │  │   │  Bill   │  │ (paise) │  │   checks   │  │  errors │  │ │
//! │  │   └─────────┘  └─────────┘  └────────────┘  └─────────┘  │ │
//! │  │                                                           │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS      │ │
//! │  └─────────────────────────────┬─────────────────────────────┘ │
//! │                                │                                │
//! │  ┌─────────────────────────────▼─────────────────────────────┐ │
//! │  │              shopledger-db (Database Layer)               │ │
//! │  │     SQLite repositories, billing transaction, migrations  │ │
//! │  └───────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Shop, Bill, Worker, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and failure classification
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output (ID/timestamp generation
//!    in constructors is the one deliberate exception)
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in paise (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FailureClass, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single bill.
///
/// ## Business Reason
/// Prevents runaway bills and keeps the billing transaction bounded.
pub const MAX_BILL_ITEMS: usize = 100;

/// Maximum quantity for a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default low-stock alert threshold for new products.
pub const DEFAULT_STOCK_ALERT_THRESHOLD: i64 = 10;

/// Default unit of measure for new products.
pub const DEFAULT_UNIT: &str = "piece";

/// Display label used where a historical bill references a product that has
/// since been removed from the catalog and no snapshot survives.
pub const DELETED_PRODUCT_LABEL: &str = "[deleted product]";
