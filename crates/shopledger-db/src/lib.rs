//! # shopledger-db: Database Layer for ShopLedger
//!
//! SQLite persistence for the ShopLedger retail backend: repositories for
//! catalog, shops, bills, workers and attendance, plus the billing
//! transaction coordinator that ties bill creation and stock decrements
//! together atomically.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       shopledger-db                             │
//! │                                                                 │
//! │  Database (pool.rs)                                             │
//! │      │                                                          │
//! │      ├── products()   ─► ProductRepository   (repository/)      │
//! │      ├── shops()      ─► ShopRepository                         │
//! │      ├── bills()      ─► BillRepository                         │
//! │      ├── workers()    ─► WorkerRepository                       │
//! │      ├── attendance() ─► AttendanceRepository                   │
//! │      │                                                          │
//! │      └── billing()    ─► BillingCoordinator  (billing.rs)       │
//! │                          │                                      │
//! │                          └── BEGIN … conditional stock          │
//! │                              decrement … COMMIT                 │
//! │                                                                 │
//! │  migrations.rs ── embedded schema migrations                    │
//! │  error.rs      ── DbError (incl. retryable Busy)                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,ignore
//! use shopledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./shopledger.db")).await?;
//! let receipt = db.billing().create_bill(&request).await?;
//! ```

pub mod billing;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use billing::{BillingCoordinator, BillingError, BillingResult};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    AttendanceRepository, BillRepository, ProductRepository, ShopRepository, WorkerRepository,
};
