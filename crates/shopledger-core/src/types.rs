//! # Domain Types
//!
//! Core domain types used throughout ShopLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐     │
//! │  │    Product    │   │     Bill      │   │   BillItem    │     │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │     │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  bill_id (FK) │     │
//! │  │  sku / name   │   │  shop_id (FK) │   │  *_snapshot   │     │
//! │  │  stock_level  │   │  total_amount │   │  unit_price   │     │
//! │  └───────────────┘   └───────────────┘   └───────────────┘     │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐     │
//! │  │     Shop      │   │    Worker     │   │  Attendance   │     │
//! │  └───────────────┘   └───────────────┘   └───────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (sku, shop name, username)
//!
//! ## Snapshot Pattern
//! Bill line items freeze the product's name, SKU, unit and selling price at
//! billing time. Later catalog edits never change historical bills.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{
    validate_person_name, validate_price_paise, validate_product_name, validate_sku,
};
use crate::{DEFAULT_STOCK_ALERT_THRESHOLD, DEFAULT_UNIT, DELETED_PRODUCT_LABEL};

// =============================================================================
// Product
// =============================================================================

/// Classification of catalog entries; raw materials can be stocked and
/// tracked but are normally not billed to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    RawMaterial,
    FinishedProduct,
}

/// A catalog product with a shared stock level.
///
/// `stock_level` is the one piece of contended shared mutable state in the
/// system; billing may only mutate it through the conditional decrement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name - unique in the catalog.
    pub name: String,

    /// Category label (e.g., "Grocery", "Dairy").
    pub category: String,

    /// Stock Keeping Unit - business identifier, unique.
    pub sku: String,

    /// Purchase cost in paise.
    pub net_price_paise: i64,

    /// Selling price in paise. Invariant: >= net_price_paise.
    pub selling_price_paise: i64,

    /// Current stock level. Invariant: never negative.
    pub stock_level: i64,

    /// Stock level at or below which the product shows up in low-stock
    /// alerts.
    pub stock_alert_threshold: i64,

    /// Unit of measure ("piece", "kg", "litre").
    pub unit: String,

    /// Raw material vs. finished product.
    pub product_type: ProductType,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub sku: String,
    pub net_price_paise: i64,
    pub selling_price_paise: i64,
    pub stock_level: i64,
    pub stock_alert_threshold: Option<i64>,
    pub unit: Option<String>,
    pub product_type: ProductType,
}

impl Product {
    /// Builds a validated product with a fresh id and timestamps.
    ///
    /// ## Errors
    /// - `Validation` for empty/overlong name or SKU, negative prices or
    ///   negative opening stock
    /// - `SellingPriceBelowNet` when the price invariant is violated
    pub fn create(input: NewProduct) -> CoreResult<Product> {
        validate_product_name(&input.name)?;
        validate_sku(&input.sku)?;
        validate_price_paise("net_price", input.net_price_paise)?;
        validate_price_paise("selling_price", input.selling_price_paise)?;

        if input.selling_price_paise < input.net_price_paise {
            return Err(CoreError::SellingPriceBelowNet {
                selling_paise: input.selling_price_paise,
                net_paise: input.net_price_paise,
            });
        }

        if input.stock_level < 0 {
            return Err(crate::ValidationError::OutOfRange {
                field: "stock_level".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            sku: input.sku.trim().to_string(),
            net_price_paise: input.net_price_paise,
            selling_price_paise: input.selling_price_paise,
            stock_level: input.stock_level,
            stock_alert_threshold: input
                .stock_alert_threshold
                .unwrap_or(DEFAULT_STOCK_ALERT_THRESHOLD),
            unit: input.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            product_type: input.product_type,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_paise(self.selling_price_paise)
    }

    /// Returns the net (cost) price as a Money type.
    #[inline]
    pub fn net_price(&self) -> Money {
        Money::from_paise(self.net_price_paise)
    }

    /// Whether the product should appear in low-stock alerts.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_level <= self.stock_alert_threshold
    }

    /// Whether the product can fill a line of `quantity` units right now.
    /// The billing transaction re-verifies this at write time.
    pub fn can_fill(&self, quantity: i64) -> bool {
        self.is_active && self.stock_level >= quantity
    }
}

// =============================================================================
// Shop
// =============================================================================

/// A shop (billing terminal location). Referenced by bills, never mutated
/// by billing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shop {
    pub id: String,
    /// Unique shop name.
    pub name: String,
    pub location: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Builds a validated shop with a fresh id and timestamps.
    pub fn create(name: &str, location: Option<String>) -> CoreResult<Shop> {
        validate_person_name("name", name)?;

        let now = Utc::now();
        Ok(Shop {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            location: location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            created_at: now,
            updated_at: now,
        })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a bill was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
}

// =============================================================================
// Bill
// =============================================================================

/// A finalized bill. Immutable once created - a historical fact.
///
/// There is deliberately no update path anywhere in the system: items,
/// total and date never change after the billing transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: String,
    pub shop_id: String,
    pub customer_name: String,
    #[serde(rename = "customerMobileNumber")]
    pub customer_mobile: String,
    /// Sum of line totals. Invariant: equals the recomputed sum.
    pub total_amount_paise: i64,
    pub payment_method: PaymentMethod,
    /// Amount tendered. Invariant: >= total_amount_paise.
    pub amount_paid_paise: i64,
    #[ts(as = "String")]
    pub bill_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Returns the total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }

    /// Change due back to the customer.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_paise(self.amount_paid_paise - self.total_amount_paise)
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item in a bill.
/// Uses the snapshot pattern to freeze product data at billing time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: String,
    pub bill_id: String,
    /// Reference to the catalog product. May point at a soft-deleted
    /// product for old bills; display always uses the snapshots below.
    pub product_id: String,
    /// SKU at billing time (frozen).
    pub sku_snapshot: String,
    /// Product name at billing time (frozen).
    pub name_snapshot: String,
    /// Unit of measure at billing time (frozen).
    pub unit_snapshot: String,
    /// Unit selling price in paise at billing time (frozen).
    pub unit_price_paise: i64,
    /// Quantity sold. Invariant: > 0.
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total_paise: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BillItem {
    /// Captures a snapshot line for `quantity` units of `product`.
    pub fn capture(bill_id: &str, product: &Product, quantity: i64) -> BillItem {
        BillItem {
            id: Uuid::new_v4().to_string(),
            bill_id: bill_id.to_string(),
            product_id: product.id.clone(),
            sku_snapshot: product.sku.clone(),
            name_snapshot: product.name.clone(),
            unit_snapshot: product.unit.clone(),
            unit_price_paise: product.selling_price_paise,
            quantity,
            line_total_paise: product
                .selling_price()
                .multiply_quantity(quantity)
                .paise(),
            created_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }

    /// Name to display for this line. Falls back to a fixed label for
    /// legacy rows that predate the snapshot columns.
    pub fn display_name(&self) -> &str {
        if self.name_snapshot.is_empty() {
            DELETED_PRODUCT_LABEL
        } else {
            &self.name_snapshot
        }
    }
}

// =============================================================================
// Bill Request (coordinator input)
// =============================================================================

/// One requested line: a product reference and a quantity. The price is
/// never caller-supplied; it is captured from the catalog inside the
/// billing transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillRequestItem {
    #[serde(rename = "product")]
    pub product_id: String,
    pub quantity: i64,
}

/// Input contract of the billing transaction coordinator.
///
/// Mirrors the `POST /bills` body of the outer API:
/// ```json
/// {
///   "shopId": "...",
///   "customerName": "...",
///   "customerMobileNumber": "...",
///   "items": [ { "product": "...", "quantity": 3 } ],
///   "totalAmount": 29550,
///   "paymentMethod": "UPI",
///   "amountPaid": 30000
/// }
/// ```
///
/// `totalAmount` is cross-checked against the recomputed sum of line
/// totals and rejected on mismatch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    pub shop_id: String,
    pub customer_name: String,
    #[serde(rename = "customerMobileNumber")]
    pub customer_mobile: String,
    pub items: Vec<BillRequestItem>,
    #[serde(rename = "totalAmount")]
    pub total_amount_paise: i64,
    pub payment_method: PaymentMethod,
    #[serde(rename = "amountPaid")]
    pub amount_paid_paise: i64,
}

// =============================================================================
// Bill Detail (receipt view)
// =============================================================================

/// A bill with resolved shop detail and its line items - everything a
/// receipt needs, assembled by the store layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    pub bill: Bill,
    pub shop_name: String,
    pub shop_location: Option<String>,
    pub items: Vec<BillItem>,
}

// =============================================================================
// Worker
// =============================================================================

/// A worker employed at the business.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// Unique login/business identifier.
    pub username: String,
    /// Department label (e.g., "Sales", "Warehouse").
    pub department: String,
    pub salary_paise: i64,
    /// Shift window, "HH:MM" wall-clock strings.
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a worker.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    pub name: String,
    pub username: String,
    pub department: String,
    pub salary_paise: i64,
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
}

impl Worker {
    /// Builds a validated worker with a fresh id and timestamps.
    pub fn create(input: NewWorker) -> CoreResult<Worker> {
        validate_person_name("name", &input.name)?;
        validate_person_name("username", &input.username)?;
        validate_person_name("department", &input.department)?;
        validate_price_paise("salary", input.salary_paise)?;

        let now = Utc::now();
        Ok(Worker {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            username: input.username.trim().to_string(),
            department: input.department.trim().to_string(),
            salary_paise: input.salary_paise,
            shift_start: input.shift_start,
            shift_end: input.shift_end,
            created_at: now,
            updated_at: now,
        })
    }
}

// =============================================================================
// Attendance
// =============================================================================

/// A worker's attendance record for one calendar day.
/// At most one record exists per worker per day (unique index).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Attendance {
    pub id: String,
    pub worker_id: String,
    /// The calendar day this record belongs to (UTC).
    #[ts(as = "String")]
    pub work_date: NaiveDate,
    #[ts(as = "String")]
    pub check_in: DateTime<Utc>,
    /// None while the worker is still checked in.
    #[ts(as = "Option<String>")]
    pub check_out: Option<DateTime<Utc>>,
    pub overtime_minutes: i64,
    pub late_minutes: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product::create(NewProduct {
            name: "Basmati Rice 5kg".to_string(),
            category: "Grocery".to_string(),
            sku: "RICE-5KG".to_string(),
            net_price_paise: 45000,
            selling_price_paise: 52000,
            stock_level: 10,
            stock_alert_threshold: None,
            unit: Some("bag".to_string()),
            product_type: ProductType::FinishedProduct,
        })
        .unwrap()
    }

    #[test]
    fn test_product_create_defaults() {
        let product = sample_product();
        assert_eq!(product.stock_alert_threshold, 10);
        assert!(product.is_active);
        assert_eq!(product.selling_price().paise(), 52000);
    }

    #[test]
    fn test_product_rejects_selling_below_net() {
        let err = Product::create(NewProduct {
            name: "Bad".to_string(),
            category: "Grocery".to_string(),
            sku: "BAD-1".to_string(),
            net_price_paise: 1000,
            selling_price_paise: 900,
            stock_level: 0,
            stock_alert_threshold: None,
            unit: None,
            product_type: ProductType::FinishedProduct,
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::SellingPriceBelowNet { .. }));
    }

    #[test]
    fn test_low_stock_and_can_fill() {
        let mut product = sample_product();
        assert!(product.is_low_stock()); // stock 10, threshold 10
        assert!(product.can_fill(10));
        assert!(!product.can_fill(11));

        product.is_active = false;
        assert!(!product.can_fill(1));
    }

    #[test]
    fn test_bill_item_capture_freezes_price() {
        let product = sample_product();
        let item = BillItem::capture("bill-1", &product, 3);
        assert_eq!(item.unit_price_paise, 52000);
        assert_eq!(item.line_total_paise, 156000);
        assert_eq!(item.sku_snapshot, "RICE-5KG");
        assert_eq!(item.display_name(), "Basmati Rice 5kg");
    }

    #[test]
    fn test_display_name_fallback() {
        let product = sample_product();
        let mut item = BillItem::capture("bill-1", &product, 1);
        item.name_snapshot.clear();
        assert_eq!(item.display_name(), crate::DELETED_PRODUCT_LABEL);
    }

    #[test]
    fn test_payment_method_serde_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Upi).unwrap(),
            "\"UPI\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"Cash\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"Card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Card);
    }

    #[test]
    fn test_bill_request_field_names() {
        let json = r#"{
            "shopId": "s1",
            "customerName": "Asha",
            "customerMobileNumber": "9876543210",
            "items": [ { "product": "p1", "quantity": 2 } ],
            "totalAmount": 1000,
            "paymentMethod": "Cash",
            "amountPaid": 1000
        }"#;
        let req: BillRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.shop_id, "s1");
        assert_eq!(req.items[0].product_id, "p1");
        assert_eq!(req.total_amount_paise, 1000);
    }

    #[test]
    fn test_bill_change() {
        let bill = Bill {
            id: "b1".to_string(),
            shop_id: "s1".to_string(),
            customer_name: "Asha".to_string(),
            customer_mobile: "9876543210".to_string(),
            total_amount_paise: 900,
            payment_method: PaymentMethod::Cash,
            amount_paid_paise: 1000,
            bill_date: Utc::now(),
            created_at: Utc::now(),
        };
        assert_eq!(bill.change().paise(), 100);
    }
}
