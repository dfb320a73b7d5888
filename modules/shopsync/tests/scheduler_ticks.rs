//! Scheduler ticks against the real service stack: tenant discovery,
//! per-tenant isolation, and last-sync bookkeeping.

mod support;

use std::sync::Arc;

use httpmock::MockServer;

use shopsync::domain::model::{SyncStatus, TenantStatus};
use shopsync::scheduler::SyncScheduler;

use support::{mock_empty_except, tenant, test_app};

#[tokio::test]
async fn a_tick_syncs_every_active_tenant_and_records_the_outcome() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    mock_empty_except(&server, &[]).await;

    let acme = tenant("Acme");
    let globex = tenant("Globex");
    app.tenants.upsert_config(&acme).await.unwrap();
    app.tenants.upsert_config(&globex).await.unwrap();

    let scheduler = SyncScheduler::new(
        Arc::clone(&app.service),
        Arc::clone(&app.tenants),
        Arc::clone(&app.in_flight),
        std::time::Duration::from_secs(3600),
    );
    scheduler.tick_once().await;

    for id in [acme.id, globex.id] {
        let tenant = app.tenants.find(id).await.unwrap().expect("tenant stays");
        assert_eq!(tenant.last_sync_status, Some(SyncStatus::Ok));
        assert!(tenant.last_sync_at.is_some());
    }
}

#[tokio::test]
async fn inactive_tenants_are_not_synced() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    mock_empty_except(&server, &[]).await;

    let mut dormant = tenant("Dormant");
    dormant.status = TenantStatus::Inactive;
    app.tenants.upsert_config(&dormant).await.unwrap();

    let scheduler = SyncScheduler::new(
        Arc::clone(&app.service),
        Arc::clone(&app.tenants),
        Arc::clone(&app.in_flight),
        std::time::Duration::from_secs(3600),
    );
    scheduler.tick_once().await;

    let dormant = app
        .tenants
        .find(dormant.id)
        .await
        .unwrap()
        .expect("tenant stays");
    assert_eq!(dormant.last_sync_status, None);
    assert_eq!(dormant.last_sync_at, None);
}

#[tokio::test]
async fn one_tenants_failure_does_not_block_the_others() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;

    // every source request fails; both tenants still get an outcome
    server
        .mock_async(|when, then| {
            when.path_contains("/admin/api/");
            then.status(503);
        })
        .await;

    let acme = tenant("Acme");
    let globex = tenant("Globex");
    app.tenants.upsert_config(&acme).await.unwrap();
    app.tenants.upsert_config(&globex).await.unwrap();

    let scheduler = SyncScheduler::new(
        Arc::clone(&app.service),
        Arc::clone(&app.tenants),
        Arc::clone(&app.in_flight),
        std::time::Duration::from_secs(3600),
    );
    scheduler.tick_once().await;

    for id in [acme.id, globex.id] {
        let tenant = app.tenants.find(id).await.unwrap().expect("tenant stays");
        assert_eq!(tenant.last_sync_status, Some(SyncStatus::Failed));
    }
}

#[tokio::test]
async fn a_tenant_added_after_startup_is_picked_up_next_tick() {
    let server = MockServer::start_async().await;
    let app = test_app(&server, 250).await;
    mock_empty_except(&server, &[]).await;

    let scheduler = SyncScheduler::new(
        Arc::clone(&app.service),
        Arc::clone(&app.tenants),
        Arc::clone(&app.in_flight),
        std::time::Duration::from_secs(3600),
    );

    // first tick sees no tenants
    scheduler.tick_once().await;

    let late = tenant("Latecomer");
    app.tenants.upsert_config(&late).await.unwrap();
    scheduler.tick_once().await;

    let late = app.tenants.find(late.id).await.unwrap().expect("tenant stays");
    assert_eq!(late.last_sync_status, Some(SyncStatus::Ok));
}
