//! # Repository Pattern Implementation
//!
//! One repository per aggregate, each owning the SQL for that table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Repositories                             │
//! │                                                                 │
//! │  ProductRepository    ── catalog + stock level (the ledger)     │
//! │  ShopRepository       ── billing locations                      │
//! │  BillRepository       ── immutable bills + snapshot line items  │
//! │  WorkerRepository     ── staff registry                         │
//! │  AttendanceRepository ── one check-in/out per worker per day    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a pool for standalone operations. The handful of
//! operations the billing transaction needs are associated functions that
//! take any `SqliteExecutor`, so the coordinator can run them on its own
//! transaction.

pub mod attendance;
pub mod bill;
pub mod product;
pub mod shop;
pub mod worker;

pub use attendance::AttendanceRepository;
pub use bill::BillRepository;
pub use product::ProductRepository;
pub use shop::ShopRepository;
pub use worker::WorkerRepository;
