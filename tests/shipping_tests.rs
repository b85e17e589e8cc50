//! Shipment lifecycle and carrier listing

mod common;

use chrono::{Duration, Utc};
use common::*;
use storefront::data::shipping as shipping_data;
use storefront::prelude::*;

fn assert_rejected(result: StoreResult<bool>, from: ShippingStatus, to: ShippingStatus) {
    match result {
        Err(StoreError::Transition(e)) => {
            assert_eq!(e.entity_type, "shipping");
            assert_eq!(e.from, from.to_string());
            assert_eq!(e.to, to.to_string());
        }
        other => panic!("expected a transition error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pending_in_transit_arrived() {
    let (store, db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0001").await;
    assert_eq!(shipment.status(), ShippingStatus::Pending);

    assert!(shipment.mark_in_transit(&store).await.unwrap());
    assert_eq!(shipment.status(), ShippingStatus::InTransit);

    assert!(shipment.mark_as_arrived(&store).await.unwrap());
    assert_eq!(shipment.status(), ShippingStatus::Arrived);
    let delivered_at = shipment.delivered_at().unwrap();

    let arrival = db.calls_to(shipping_data::MARK_AS_ARRIVED.name());
    assert_eq!(arrival.len(), 1);
    assert!(arrival[0].argument(shipping_data::DELIVERED_AT).is_some());

    let stored = Shipping::find(&store, shipment.id()).await.unwrap().unwrap();
    assert_eq!(stored.status(), ShippingStatus::Arrived);
    assert_eq!(stored.delivered_at(), Some(delivered_at));
}

#[tokio::test]
async fn test_pending_may_arrive_directly() {
    let (store, _db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0002").await;
    assert!(shipment.mark_as_arrived(&store).await.unwrap());
    assert_eq!(shipment.status(), ShippingStatus::Arrived);
}

#[tokio::test]
async fn test_no_cancel_after_arrival() {
    let (store, db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0003").await;
    shipment.mark_as_arrived(&store).await.unwrap();
    let calls_before = db.call_count();

    assert_rejected(
        shipment.cancel(&store).await,
        ShippingStatus::Arrived,
        ShippingStatus::Cancelled,
    );
    assert_rejected(
        shipment.mark_in_transit(&store).await,
        ShippingStatus::Arrived,
        ShippingStatus::InTransit,
    );
    assert_eq!(shipment.status(), ShippingStatus::Arrived);
    assert_eq!(db.call_count(), calls_before);
}

#[tokio::test]
async fn test_cancel_and_reinstate() {
    let (store, _db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0004").await;
    shipment.mark_in_transit(&store).await.unwrap();

    assert!(shipment.cancel(&store).await.unwrap());
    assert_eq!(shipment.status(), ShippingStatus::Cancelled);

    assert_rejected(
        shipment.mark_as_arrived(&store).await,
        ShippingStatus::Cancelled,
        ShippingStatus::Arrived,
    );
    assert_eq!(shipment.delivered_at(), None);

    assert!(shipment.reinstate(&store).await.unwrap());
    assert_eq!(shipment.status(), ShippingStatus::Pending);

    let stored = Shipping::find(&store, shipment.id()).await.unwrap().unwrap();
    assert_eq!(stored.status(), ShippingStatus::Pending);
}

#[tokio::test]
async fn test_reinstate_only_from_cancelled() {
    let (store, _db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0005").await;
    shipment.mark_in_transit(&store).await.unwrap();

    assert_rejected(
        shipment.reinstate(&store).await,
        ShippingStatus::InTransit,
        ShippingStatus::Pending,
    );
}

#[tokio::test]
async fn test_finders_and_carrier() {
    let (store, _db) = Store::in_memory();
    let mut moving = saved_shipping(&store, "TRACK0006").await;
    moving.mark_in_transit(&store).await.unwrap();
    saved_shipping(&store, "TRACK0007").await;

    let found = Shipping::find_by_tracking_number(&store, "TRACK0006")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), moving.id());
    assert!(Shipping::find_by_tracking_number(&store, "NOSUCHCODE").await.unwrap().is_none());

    let in_transit = Shipping::get_by_status(&store, ShippingStatus::InTransit).await.unwrap();
    assert_eq!(in_transit.len(), 1);
    assert_eq!(Shipping::get_table(&store).await.unwrap().len(), 2);

    let carrier = found.carrier(&store).await.unwrap().unwrap();
    assert_eq!(carrier.name(), "Parcel Post");
}

#[tokio::test]
async fn test_update_keeps_status() {
    let (store, _db) = Store::in_memory();
    let mut shipment = saved_shipping(&store, "TRACK0008").await;
    shipment.mark_in_transit(&store).await.unwrap();

    let later = Utc::now().naive_utc() + Duration::days(10);
    shipment.set_estimated_delivery(later).unwrap();
    assert!(shipment.save(&store).await.unwrap());

    let stored = Shipping::find(&store, shipment.id()).await.unwrap().unwrap();
    assert_eq!(stored.estimated_delivery(), later);
    assert_eq!(stored.status(), ShippingStatus::InTransit);
}

#[tokio::test]
async fn test_carrier_delete_and_listing() {
    let (store, _db) = Store::in_memory();
    let first = saved_carrier(&store, "Parcel Post").await;
    saved_carrier(&store, "FastShip").await;

    assert_eq!(ShippingCarrier::get_all(&store).await.unwrap().len(), 2);
    assert!(first.delete(&store).await.unwrap());

    let remaining = ShippingCarrier::get_all(&store).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name(), "FastShip");
}
