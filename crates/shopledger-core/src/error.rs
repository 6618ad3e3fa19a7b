//! # Error Types
//!
//! Domain-specific error types for shopledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  shopledger-core errors (this file)                             │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  shopledger-db errors (separate crate)                          │
//! │  ├── DbError          - Database operation failures             │
//! │  └── BillingError     - Billing transaction outcomes            │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → BillingError → caller      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, quantities)
//! 3. Errors are enum variants, never String
//! 4. Every error carries a [`FailureClass`] so callers can map it to a
//!    response class without matching each variant

use thiserror::Error;

// =============================================================================
// Failure Classification
// =============================================================================

/// Coarse classification of a failure, preserved across all error layers.
///
/// Outer surfaces (HTTP, IPC) branch on this rather than on concrete
/// variants: `NotFound` → 404, `Rejected` → 400, `Transient` → 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A referenced entity does not exist.
    NotFound,
    /// The request is well-formed but violates a business rule; retrying
    /// the same request will fail the same way.
    Rejected,
    /// The store could not complete the request; the same request may
    /// succeed later.
    Transient,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Shop referenced by a bill request does not exist.
    #[error("Shop not found: {0}")]
    ShopNotFound(String),

    /// Product cannot be found (absent or soft-deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Bill lookup failed.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Worker lookup failed.
    #[error("Worker not found: {0}")]
    WorkerNotFound(String),

    /// Insufficient stock to fill a bill line.
    ///
    /// ## When This Occurs
    /// - The sufficiency check sees less stock than requested, or
    /// - the conditional decrement finds the stock changed under us
    ///   (a concurrent bill won the race)
    ///
    /// Carries available vs. requested so the terminal can offer a
    /// reduced quantity.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Amount paid is below the bill total. No mutation is attempted.
    #[error("Insufficient payment: total {total_paise} paise, paid {paid_paise} paise")]
    InsufficientPayment { total_paise: i64, paid_paise: i64 },

    /// Caller-supplied total disagrees with the recomputed sum of line
    /// totals. The total is always recomputed from catalog prices; the
    /// caller's figure is only a cross-check, never trusted.
    #[error("Total mismatch: computed {computed_paise} paise, supplied {supplied_paise} paise")]
    TotalMismatch {
        computed_paise: i64,
        supplied_paise: i64,
    },

    /// Selling price below net price violates the catalog invariant.
    #[error("Selling price {selling_paise} paise is below net price {net_paise} paise")]
    SellingPriceBelowNet { selling_paise: i64, net_paise: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error for the outer response mapping.
    pub fn class(&self) -> FailureClass {
        match self {
            CoreError::ShopNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::BillNotFound(_)
            | CoreError::WorkerNotFound(_) => FailureClass::NotFound,
            CoreError::InsufficientStock { .. }
            | CoreError::InsufficientPayment { .. }
            | CoreError::TotalMismatch { .. }
            | CoreError::SellingPriceBelowNet { .. }
            | CoreError::Validation(_) => FailureClass::Rejected,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before any store access happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, bad mobile number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
