//! Change notification on the store's event bus

mod common;

use common::*;
use storefront::core::SaveKind;
use storefront::data::products;
use storefront::prelude::*;
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn test_committed_setter_notifies_once() {
    let (store, _db) = Store::in_memory();
    let mut rx = store.events().subscribe();

    let mut product = Product::new("Widget", None, price("9.99"), 0, false);
    product.watch(store.events());

    product.set_name("Gadget").unwrap();
    let envelope = rx.try_recv().unwrap();
    assert_eq!(envelope.event.action(), "property_changed");
    assert_eq!(envelope.event.entity_type(), "product");
    assert_eq!(envelope.event.entity_id(), UNSAVED_ID);
    assert_eq!(envelope.event.property(), Some(products::NAME));

    // unchanged value
    product.set_name("Gadget").unwrap();
    // rejected value
    assert!(product.set_name("").is_err());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(product.name(), "Gadget");
}

#[tokio::test]
async fn test_unwatched_entity_is_silent() {
    let (store, _db) = Store::in_memory();
    let mut rx = store.events().subscribe();

    let mut product = Product::new("Widget", None, price("9.99"), 0, false);
    product.set_quantity(3).unwrap();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_store_publishes_saves_status_changes_and_deletes() {
    let (store, _db) = Store::in_memory();
    let mut rx = store.events().subscribe();

    let mut product = Product::new("Widget", None, price("9.99"), 0, false);
    product.save(&store).await.unwrap();
    match rx.try_recv().unwrap().event {
        StoreEvent::Saved { entity_type, entity_id, kind } => {
            assert_eq!(entity_type, "product");
            assert_eq!(entity_id, product.id());
            assert_eq!(kind, SaveKind::Added);
        }
        other => panic!("unexpected event {:?}", other),
    }

    product.save(&store).await.unwrap();
    assert!(matches!(
        rx.try_recv().unwrap().event,
        StoreEvent::Saved { kind: SaveKind::Updated, .. }
    ));

    product.make_available(&store).await.unwrap();
    match rx.try_recv().unwrap().event {
        StoreEvent::StatusChanged { from, to, .. } => {
            assert_eq!(from, "unavailable");
            assert_eq!(to, "available");
        }
        other => panic!("unexpected event {:?}", other),
    }

    product.delete(&store).await.unwrap();
    assert_eq!(rx.try_recv().unwrap().event.action(), "deleted");
}

#[tokio::test]
async fn test_order_transition_event_uses_status_labels() {
    let (store, _db) = Store::in_memory();
    let mut order = saved_order(&store).await;
    let mut rx = store.events().subscribe();

    order.mark_as_arrived(&store).await.unwrap();
    match rx.try_recv().unwrap().event {
        StoreEvent::StatusChanged { entity_type, entity_id, from, to } => {
            assert_eq!(entity_type, "order");
            assert_eq!(entity_id, order.id());
            assert_eq!(from, "Shipping");
            assert_eq!(to, "Arrived");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_envelope_serializes_with_action_tag() {
    let (store, _db) = Store::in_memory();
    let mut rx = store.events().subscribe();

    saved_carrier(&store, "Parcel Post").await;
    let envelope = rx.try_recv().unwrap();
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["event"]["action"], "saved");
    assert_eq!(json["event"]["entity_type"], "shipping_carrier");
    assert_eq!(json["event"]["kind"], "added");
}
