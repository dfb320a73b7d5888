//! End-to-end sync runs against a stub source and an in-memory store.

mod support;

use httpmock::MockServer;
use rust_decimal::Decimal;
use serde_json::json;

use shopsync::domain::model::{
    KindOutcome, OrderStatus, ResourceKind, Segment, SyncStatus,
};

use support::{
    customer_record, mock_empty_except, mock_page, order_record, product_record, tenant,
    test_app, variant,
};

#[tokio::test]
async fn full_sync_pages_through_all_kinds() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 2).await;
    let tenant = tenant("Acme");

    // customers: a full page then a short final page
    let customers_p1 = mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![
            customer_record(1, "Ada", "1500.00"),
            customer_record(2, "Bob", "120.00"),
        ],
    )
    .await;
    let customers_p2 = mock_page(
        &server,
        ResourceKind::Customers,
        2,
        vec![customer_record(3, "Cyd", "10.00")],
    )
    .await;

    // orders: full page, then an empty page ends pagination
    let orders_p1 = mock_page(
        &server,
        ResourceKind::Orders,
        0,
        vec![
            order_record(11, Some((1, "Ada"))),
            order_record(12, None),
        ],
    )
    .await;
    let orders_p2 = mock_page(&server, ResourceKind::Orders, 12, vec![]).await;

    // products: one short page, two products
    let products_p1 = mock_page(
        &server,
        ResourceKind::Products,
        0,
        vec![product_record(
            21,
            "Tee",
            vec![variant(211, "S", "15.00"), variant(212, "XL", "17.00")],
        )],
    )
    .await;

    let report = app.service.run_full_sync(&tenant).await;

    // a short page ends pagination: each cursor position is hit once
    // and nothing is fetched past the final page
    customers_p1.assert_hits_async(1).await;
    customers_p2.assert_hits_async(1).await;
    orders_p1.assert_hits_async(1).await;
    orders_p2.assert_hits_async(1).await;
    products_p1.assert_hits_async(1).await;

    assert_eq!(report.status(), SyncStatus::Ok);
    assert_eq!(
        report.customers,
        KindOutcome::Completed {
            synced: 3,
            skipped: 0
        }
    );
    assert_eq!(
        report.orders,
        KindOutcome::Completed {
            synced: 2,
            skipped: 0
        }
    );
    // one product, one row per variant
    assert_eq!(
        report.products,
        KindOutcome::Completed {
            synced: 2,
            skipped: 0
        }
    );

    assert_eq!(app.customers.count(tenant.id).await.unwrap(), 3);
    assert_eq!(app.orders.count(tenant.id).await.unwrap(), 2);
    assert_eq!(app.products.count(tenant.id).await.unwrap(), 2);

    let ada = app
        .customers
        .find_by_external_id(tenant.id, 1)
        .await
        .unwrap()
        .expect("customer synced");
    assert_eq!(ada.name, "Ada Example");
    assert_eq!(ada.segment, Segment::Vip);
    assert_eq!(ada.location.as_deref(), Some("Boston, US"));

    // linked order resolves to Ada's internal id; guest order stays null
    let linked = app
        .orders
        .find_by_external_id(tenant.id, 11)
        .await
        .unwrap()
        .expect("order synced");
    let ada_ref = app.customers.find_ref(tenant.id, 1).await.unwrap();
    assert_eq!(linked.customer_id, ada_ref);
    assert_eq!(linked.status, OrderStatus::Fulfilled);

    let guest = app
        .orders
        .find_by_external_id(tenant.id, 12)
        .await
        .unwrap()
        .expect("order synced");
    assert_eq!(guest.customer_id, None);
    assert_eq!(guest.customer_name, "Guest");

    let rows = app.products.list_by_product(tenant.id, 21).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Tee - S"));
    assert!(names.contains(&"Tee - XL"));
}

#[tokio::test]
async fn repeating_a_sync_does_not_duplicate_rows() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    mock_empty_except(&server, &[ResourceKind::Customers]).await;
    mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![customer_record(1, "Ada", "1500.00")],
    )
    .await;

    let first = app.service.run_full_sync(&tenant).await;
    let second = app.service.run_full_sync(&tenant).await;

    assert_eq!(first.status(), SyncStatus::Ok);
    assert_eq!(second.status(), SyncStatus::Ok);
    assert_eq!(app.customers.count(tenant.id).await.unwrap(), 1);
}

#[tokio::test]
async fn resync_replaces_every_field_of_an_existing_row() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    mock_empty_except(&server, &[ResourceKind::Customers]).await;
    let page = mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![customer_record(1, "Ada", "1500.00")],
    )
    .await;
    app.service.run_full_sync(&tenant).await;

    // same external customer, now below every segment threshold
    page.delete_async().await;
    mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![customer_record(1, "Ada", "40.00")],
    )
    .await;
    app.service.run_full_sync(&tenant).await;

    assert_eq!(app.customers.count(tenant.id).await.unwrap(), 1);
    let ada = app
        .customers
        .find_by_external_id(tenant.id, 1)
        .await
        .unwrap()
        .expect("customer synced");
    assert_eq!(ada.total_spent, Decimal::from(40));
    assert_eq!(ada.segment, Segment::New);
}

#[tokio::test]
async fn malformed_records_are_skipped_and_counted() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    mock_empty_except(&server, &[ResourceKind::Customers]).await;
    mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![
            customer_record(1, "Ada", "10.00"),
            json!({ "id": "not-a-number", "email": "broken@example.com" }),
        ],
    )
    .await;

    let report = app.service.run_full_sync(&tenant).await;

    assert_eq!(report.status(), SyncStatus::Ok);
    assert_eq!(
        report.customers,
        KindOutcome::Completed {
            synced: 1,
            skipped: 1
        }
    );
    assert_eq!(app.customers.count(tenant.id).await.unwrap(), 1);
}

#[tokio::test]
async fn one_failing_kind_leaves_the_others_synced() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    mock_page(
        &server,
        ResourceKind::Customers,
        0,
        vec![customer_record(1, "Ada", "10.00")],
    )
    .await;
    server
        .mock_async(|when, then| {
            when.path(format!("/admin/api/{}/orders.json", support::API_VERSION));
            then.status(500);
        })
        .await;
    mock_page(
        &server,
        ResourceKind::Products,
        0,
        vec![product_record(21, "Tee", vec![variant(211, "S", "15.00")])],
    )
    .await;

    let report = app.service.run_full_sync(&tenant).await;

    assert_eq!(report.status(), SyncStatus::Partial);
    assert!(!report.customers.is_failed());
    assert!(!report.products.is_failed());
    match &report.orders {
        KindOutcome::Failed { error } => assert!(error.contains("500"), "got: {error}"),
        other => panic!("expected orders to fail, got {other:?}"),
    }
    assert_eq!(app.customers.count(tenant.id).await.unwrap(), 1);
    assert_eq!(app.products.count(tenant.id).await.unwrap(), 1);
    assert_eq!(app.orders.count(tenant.id).await.unwrap(), 0);
}

#[tokio::test]
async fn every_kind_failing_reports_failed_status() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    server
        .mock_async(|when, then| {
            when.path_contains("/admin/api/");
            then.status(502);
        })
        .await;

    let report = app.service.run_full_sync(&tenant).await;

    assert_eq!(report.status(), SyncStatus::Failed);
    assert_eq!(report.failures().len(), 3);
}

#[tokio::test]
async fn order_link_to_unsynced_customer_stays_null() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    let tenant = tenant("Acme");

    mock_empty_except(&server, &[ResourceKind::Orders]).await;
    mock_page(
        &server,
        ResourceKind::Orders,
        0,
        vec![order_record(11, Some((999, "Ghost")))],
    )
    .await;

    let report = app.service.run_full_sync(&tenant).await;

    assert_eq!(report.status(), SyncStatus::Ok);
    let order = app
        .orders
        .find_by_external_id(tenant.id, 11)
        .await
        .unwrap()
        .expect("order synced");
    assert_eq!(order.customer_id, None);
    assert_eq!(order.shopify_customer_id, Some(999));
    assert_eq!(order.customer_name, "Ghost Example");
}
