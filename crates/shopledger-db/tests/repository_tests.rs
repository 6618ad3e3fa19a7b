//! Integration tests for the repositories (catalog, shops, workers,
//! attendance, bill reads).

use chrono::Utc;
use shopledger_core::{
    BillRequest, BillRequestItem, NewProduct, NewWorker, PaymentMethod, Product, ProductType,
    Shop, Worker,
};
use shopledger_db::{Database, DbConfig, DbError};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn sample_product(sku: &str, stock: i64) -> Product {
    Product::create(NewProduct {
        name: format!("Product {sku}"),
        category: "Grocery".to_string(),
        sku: sku.to_string(),
        net_price_paise: 1000,
        selling_price_paise: 1500,
        stock_level: stock,
        stock_alert_threshold: Some(5),
        unit: None,
        product_type: ProductType::FinishedProduct,
    })
    .unwrap()
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn product_insert_and_lookup() {
    let db = test_db().await;
    let product = sample_product("RICE-5KG", 10);
    db.products().insert(&product).await.unwrap();

    let by_id = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(by_id.sku, "RICE-5KG");
    assert_eq!(by_id.stock_level, 10);
    assert!(by_id.is_active);

    let by_sku = db.products().get_by_sku("RICE-5KG").await.unwrap().unwrap();
    assert_eq!(by_sku.id, product.id);

    assert!(db.products().get_by_sku("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_sku_is_refused() {
    let db = test_db().await;
    db.products()
        .insert(&sample_product("RICE-5KG", 10))
        .await
        .unwrap();

    let mut twin = sample_product("RICE-5KG", 5);
    twin.name = "Different Name".to_string();
    let err = db.products().insert(&twin).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
async fn low_stock_listing_respects_threshold_and_activity() {
    let db = test_db().await;
    let low = sample_product("LOW-1", 3); // threshold 5
    let ok = sample_product("OK-1", 50);
    let deleted = sample_product("GONE-1", 0);
    db.products().insert(&low).await.unwrap();
    db.products().insert(&ok).await.unwrap();
    db.products().insert(&deleted).await.unwrap();
    db.products().soft_delete(&deleted.id).await.unwrap();

    let alerts = db.products().list_low_stock().await.unwrap();
    let skus: Vec<_> = alerts.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["LOW-1"]);
}

#[tokio::test]
async fn stock_adjustments_never_go_negative() {
    let db = test_db().await;
    let product = sample_product("RICE-5KG", 10);
    db.products().insert(&product).await.unwrap();

    db.products().adjust_stock(&product.id, 5).await.unwrap();
    db.products().adjust_stock(&product.id, -15).await.unwrap();
    assert_eq!(
        db.products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap()
            .stock_level,
        0
    );

    let err = db.products().adjust_stock(&product.id, -1).await.unwrap_err();
    assert!(matches!(err, DbError::QueryFailed(_)));

    db.products().set_stock(&product.id, 42).await.unwrap();
    assert!(db.products().set_stock(&product.id, -1).await.is_err());
    assert!(db.products().adjust_stock("missing", 1).await.is_err());
}

#[tokio::test]
async fn soft_delete_hides_from_listing_but_keeps_row() {
    let db = test_db().await;
    let product = sample_product("RICE-5KG", 10);
    db.products().insert(&product).await.unwrap();

    db.products().soft_delete(&product.id).await.unwrap();

    assert!(db.products().list(100).await.unwrap().is_empty());
    assert_eq!(db.products().count().await.unwrap(), 0);

    let row = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert!(!row.is_active);
    assert_eq!(row.stock_level, 10);
}

// =============================================================================
// Shops
// =============================================================================

#[tokio::test]
async fn shop_crud_roundtrip() {
    let db = test_db().await;
    let mut shop = Shop::create("Main Counter", Some("MG Road".to_string())).unwrap();
    db.shops().insert(&shop).await.unwrap();

    assert!(db
        .shops()
        .get_by_name("Main Counter")
        .await
        .unwrap()
        .is_some());

    shop.location = Some("Brigade Road".to_string());
    db.shops().update(&shop).await.unwrap();
    let updated = db.shops().get_by_id(&shop.id).await.unwrap().unwrap();
    assert_eq!(updated.location.as_deref(), Some("Brigade Road"));

    db.shops().delete(&shop.id).await.unwrap();
    assert!(db.shops().get_by_id(&shop.id).await.unwrap().is_none());
    assert!(matches!(
        db.shops().delete(&shop.id).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
}

#[tokio::test]
async fn shop_with_bills_cannot_be_deleted() {
    let db = test_db().await;
    let shop = Shop::create("Main Counter", None).unwrap();
    db.shops().insert(&shop).await.unwrap();
    let product = sample_product("RICE-5KG", 10);
    db.products().insert(&product).await.unwrap();

    let request = BillRequest {
        shop_id: shop.id.clone(),
        customer_name: "Asha".to_string(),
        customer_mobile: "9876543210".to_string(),
        items: vec![BillRequestItem {
            product_id: product.id.clone(),
            quantity: 1,
        }],
        total_amount_paise: 1500,
        payment_method: PaymentMethod::Upi,
        amount_paid_paise: 1500,
    };
    db.billing().create_bill(&request).await.unwrap();

    // Historical bills pin their shop row.
    let err = db.shops().delete(&shop.id).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

// =============================================================================
// Bill reads
// =============================================================================

#[tokio::test]
async fn bills_list_newest_first_per_shop() {
    let db = test_db().await;
    let shop_a = Shop::create("Counter A", None).unwrap();
    let shop_b = Shop::create("Counter B", None).unwrap();
    db.shops().insert(&shop_a).await.unwrap();
    db.shops().insert(&shop_b).await.unwrap();
    let product = sample_product("BISC-1", 100);
    db.products().insert(&product).await.unwrap();

    let request = |shop: &Shop| BillRequest {
        shop_id: shop.id.clone(),
        customer_name: "Asha".to_string(),
        customer_mobile: "9876543210".to_string(),
        items: vec![BillRequestItem {
            product_id: product.id.clone(),
            quantity: 1,
        }],
        total_amount_paise: 1500,
        payment_method: PaymentMethod::Cash,
        amount_paid_paise: 1500,
    };

    let first = db.billing().create_bill(&request(&shop_a)).await.unwrap();
    let second = db.billing().create_bill(&request(&shop_a)).await.unwrap();
    db.billing().create_bill(&request(&shop_b)).await.unwrap();

    let all = db.bills().list(10).await.unwrap();
    assert_eq!(all.len(), 3);

    let for_a = db.bills().list_by_shop(&shop_a.id, 10).await.unwrap();
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].id, second.bill.id);
    assert_eq!(for_a[1].id, first.bill.id);

    assert!(db.bills().get_by_id("missing").await.unwrap().is_none());
    assert!(db.bills().get_detail("missing").await.unwrap().is_none());
}

// =============================================================================
// Workers
// =============================================================================

fn sample_worker(username: &str) -> Worker {
    Worker::create(NewWorker {
        name: "Ramesh Kumar".to_string(),
        username: username.to_string(),
        department: "Sales".to_string(),
        salary_paise: 1_800_000,
        shift_start: Some("09:00".to_string()),
        shift_end: Some("18:00".to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn worker_crud_roundtrip() {
    let db = test_db().await;
    let mut worker = sample_worker("ramesh");
    db.workers().insert(&worker).await.unwrap();

    let err = db.workers().insert(&sample_worker("ramesh")).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));

    worker.department = "Warehouse".to_string();
    db.workers().update(&worker).await.unwrap();
    let updated = db
        .workers()
        .get_by_username("ramesh")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.department, "Warehouse");

    db.workers().delete(&worker.id).await.unwrap();
    assert!(db.workers().get_by_id(&worker.id).await.unwrap().is_none());
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn attendance_one_check_in_per_day() {
    let db = test_db().await;
    let worker = sample_worker("sunita");
    db.workers().insert(&worker).await.unwrap();

    let record = db.attendance().check_in(&worker.id, 12).await.unwrap();
    assert_eq!(record.late_minutes, 12);
    assert!(record.check_out.is_none());

    // Second check-in on the same day is refused.
    let err = db.attendance().check_in(&worker.id, 0).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));

    let today = db.attendance().today(&worker.id).await.unwrap().unwrap();
    assert_eq!(today.id, record.id);
}

#[tokio::test]
async fn attendance_check_out_closes_the_day() {
    let db = test_db().await;
    let worker = sample_worker("sunita");
    db.workers().insert(&worker).await.unwrap();

    // Check-out with no open check-in fails.
    let err = db.attendance().check_out(&worker.id, 0).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    db.attendance().check_in(&worker.id, 0).await.unwrap();
    db.attendance().check_out(&worker.id, 30).await.unwrap();

    let today = db.attendance().today(&worker.id).await.unwrap().unwrap();
    assert!(today.check_out.is_some());
    assert_eq!(today.overtime_minutes, 30);

    // The day is closed; a second check-out finds nothing open.
    let err = db.attendance().check_out(&worker.id, 0).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn attendance_range_listing() {
    let db = test_db().await;
    let worker = sample_worker("sunita");
    db.workers().insert(&worker).await.unwrap();
    db.attendance().check_in(&worker.id, 0).await.unwrap();

    let today = Utc::now().date_naive();
    let month = db
        .attendance()
        .list_range(&worker.id, today - chrono::Days::new(30), today)
        .await
        .unwrap();
    assert_eq!(month.len(), 1);

    let board = db.attendance().list_for_day(today).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].worker_id, worker.id);
}
