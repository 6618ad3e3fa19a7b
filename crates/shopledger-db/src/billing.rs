//! # Billing Transaction Coordinator
//!
//! The core of the system: turns a bill request into a committed bill and
//! matching stock decrements, atomically, under concurrent terminals.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 create_bill(request)                            │
//! │                                                                 │
//! │  0. Validate request shape (no store access)                    │
//! │                                                                 │
//! │  ┌── BEGIN TRANSACTION ─────────────────────────────────────┐   │
//! │  │ 1. Fetch shop                 ── ShopNotFound            │   │
//! │  │ 2. Fetch each product         ── ProductNotFound         │   │
//! │  │    (inactive = not found)                                │   │
//! │  │ 3. Check stock sufficiency    ── InsufficientStock       │   │
//! │  │ 4. Recompute total from the   ── TotalMismatch           │   │
//! │  │    catalog prices                                        │   │
//! │  │ 5. Check payment covers total ── InsufficientPayment     │   │
//! │  │ 6. Insert bill header                                    │   │
//! │  │ 7. Per line: insert snapshot item +                      │   │
//! │  │    conditional stock decrement                           │   │
//! │  │    (0 rows affected ──► InsufficientStock, ROLLBACK)     │   │
//! │  │ 8. COMMIT                                                │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                                                                 │
//! │  Any error before COMMIT drops the transaction ──► ROLLBACK.    │
//! │  Partial bills and partial decrements cannot be observed.       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Two terminals billing the same product at once:
//! - The conditional decrement (`WHERE stock_level >= qty`) decides the
//!   winner at write time; the loser gets `InsufficientStock`.
//! - If SQLite instead reports a lock conflict (SQLITE_BUSY or
//!   BUSY_SNAPSHOT under WAL), the losing transaction is retried from
//!   scratch up to [`MAX_TXN_ATTEMPTS`] times, then surfaces as
//!   `TransactionAborted` (transient - the terminal just retries).

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::bill::BillRepository;
use crate::repository::product::ProductRepository;
use crate::repository::shop::ShopRepository;
use shopledger_core::validation::validate_bill_request;
use shopledger_core::{Bill, BillDetail, BillItem, BillRequest, CoreError, FailureClass, Money};

/// How many times a transaction is retried after a lock conflict before
/// giving up with `TransactionAborted`.
const MAX_TXN_ATTEMPTS: u32 = 3;

/// Base backoff between retries; attempt n waits n × this.
const RETRY_BACKOFF_MS: u64 = 25;

// =============================================================================
// Errors
// =============================================================================

/// Outcome of a failed billing transaction.
#[derive(Debug, Error)]
pub enum BillingError {
    /// A business rule rejected the request (stock, payment, totals,
    /// missing shop/product, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The transaction kept losing lock conflicts and was abandoned after
    /// the retry budget. No bill was created; safe to resubmit.
    #[error("Billing transaction aborted after {attempts} attempts")]
    TransactionAborted { attempts: u32 },

    /// The store failed for a reason unrelated to the request.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl BillingError {
    /// Classifies this error for the outer response mapping
    /// (NotFound → 404, Rejected → 400, Transient → 500).
    pub fn class(&self) -> FailureClass {
        match self {
            BillingError::Core(e) => e.class(),
            BillingError::TransactionAborted { .. } => FailureClass::Transient,
            BillingError::Store(DbError::NotFound { .. }) => FailureClass::NotFound,
            BillingError::Store(_) => FailureClass::Transient,
        }
    }
}

/// Result type for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;

// =============================================================================
// Coordinator
// =============================================================================

/// Coordinates the bill-creation transaction.
///
/// ## Usage
/// ```rust,ignore
/// let receipt = db.billing().create_bill(&request).await?;
/// println!("bill {} total {}", receipt.bill.id, receipt.bill.total_amount());
/// ```
#[derive(Debug, Clone)]
pub struct BillingCoordinator {
    pool: sqlx::SqlitePool,
}

impl BillingCoordinator {
    /// Creates a new BillingCoordinator.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        BillingCoordinator { pool }
    }

    /// Creates a bill: validates, reserves stock and persists the bill in
    /// one atomic transaction, then returns the committed receipt view.
    ///
    /// ## Errors
    /// - `Core(Validation)` - malformed request, rejected before any
    ///   store access
    /// - `Core(ShopNotFound | ProductNotFound)` - dangling references
    /// - `Core(InsufficientStock | InsufficientPayment | TotalMismatch)` -
    ///   business rule rejection, nothing persisted
    /// - `TransactionAborted` - persistent lock contention, nothing
    ///   persisted, safe to resubmit
    pub async fn create_bill(&self, request: &BillRequest) -> BillingResult<BillDetail> {
        // Shape validation happens once, outside the retry loop.
        validate_bill_request(request).map_err(CoreError::from)?;

        let mut attempt = 1;
        loop {
            match self.try_create(request).await {
                Err(BillingError::Store(DbError::Busy(msg))) => {
                    if attempt >= MAX_TXN_ATTEMPTS {
                        warn!(
                            attempts = attempt,
                            "Billing transaction aborted after repeated lock conflicts"
                        );
                        return Err(BillingError::TransactionAborted { attempts: attempt });
                    }
                    debug!(attempt, %msg, "Lock conflict, retrying billing transaction");
                    tokio::time::sleep(std::time::Duration::from_millis(
                        RETRY_BACKOFF_MS * attempt as u64,
                    ))
                    .await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One attempt at the billing transaction. Every early return drops
    /// the transaction, which rolls it back.
    async fn try_create(&self, request: &BillRequest) -> BillingResult<BillDetail> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // 1. The shop must exist.
        let shop = ShopRepository::fetch(&mut *tx, &request.shop_id)
            .await?
            .ok_or_else(|| CoreError::ShopNotFound(request.shop_id.clone()))?;

        // 2.-3. Resolve every product and check its stock inside the
        // transaction's snapshot. Inactive products are not billable.
        let mut products = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = ProductRepository::fetch(&mut *tx, &line.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            if product.stock_level < line.quantity {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku,
                    available: product.stock_level,
                    requested: line.quantity,
                }
                .into());
            }

            products.push(product);
        }

        // 4. The total is always recomputed from catalog prices; the
        // caller's figure is only a cross-check.
        let computed_total: Money = request
            .items
            .iter()
            .zip(&products)
            .map(|(line, product)| product.selling_price().multiply_quantity(line.quantity))
            .fold(Money::zero(), |acc, line_total| acc + line_total);

        if computed_total.paise() != request.total_amount_paise {
            return Err(CoreError::TotalMismatch {
                computed_paise: computed_total.paise(),
                supplied_paise: request.total_amount_paise,
            }
            .into());
        }

        // 5. Payment must cover the total.
        if request.amount_paid_paise < computed_total.paise() {
            return Err(CoreError::InsufficientPayment {
                total_paise: computed_total.paise(),
                paid_paise: request.amount_paid_paise,
            }
            .into());
        }

        // 6. Bill header.
        let now = chrono::Utc::now();
        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            shop_id: shop.id.clone(),
            customer_name: request.customer_name.trim().to_string(),
            customer_mobile: request.customer_mobile.trim().to_string(),
            total_amount_paise: computed_total.paise(),
            payment_method: request.payment_method,
            amount_paid_paise: request.amount_paid_paise,
            bill_date: now,
            created_at: now,
        };
        BillRepository::insert_bill(&mut *tx, &bill).await?;

        // 7. Snapshot line items + conditional decrements. The decrement
        // is the authoritative stock check: step 3 was only a fast-path
        // read, and a concurrent bill may have committed since.
        let mut items = Vec::with_capacity(products.len());
        for (line, product) in request.items.iter().zip(&products) {
            let item = BillItem::capture(&bill.id, product, line.quantity);
            BillRepository::insert_item(&mut *tx, &item).await?;

            let applied = ProductRepository::decrement_stock_if_sufficient(
                &mut *tx,
                &product.id,
                line.quantity,
            )
            .await?;

            if !applied {
                // Re-read for an accurate availability figure in the error.
                let available = ProductRepository::fetch(&mut *tx, &product.id)
                    .await?
                    .map(|p| p.stock_level)
                    .unwrap_or(0);
                return Err(CoreError::InsufficientStock {
                    sku: product.sku.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }

            items.push(item);
        }

        // 8. Commit. Only now do the bill and the decrements become
        // visible to other terminals.
        tx.commit().await.map_err(DbError::from)?;

        info!(
            bill_id = %bill.id,
            shop = %shop.name,
            lines = items.len(),
            total_paise = bill.total_amount_paise,
            "Bill committed"
        );

        Ok(BillDetail {
            bill,
            shop_name: shop.name,
            shop_location: shop.location,
            items,
        })
    }
}
