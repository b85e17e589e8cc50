//! Shared fixtures for the integration tests.
//!
//! Every fixture saves through the public entity API against a fresh
//! in-memory retail database, so ids start at 1 per table.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use storefront::prelude::*;

pub fn price(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub async fn saved_customer(store: &Store, email: &str) -> Customer {
    let mut customer = Customer::new("Ada", "Lovelace", email, Some("12 Analytical Row".into()));
    assert!(customer.save(store).await.unwrap());
    customer
}

pub async fn saved_product(store: &Store, name: &str, unit_price: &str) -> Product {
    let mut product = Product::new(name, None, price(unit_price), 10, true);
    assert!(product.save(store).await.unwrap());
    product
}

pub async fn saved_order(store: &Store) -> Order {
    let customer = saved_customer(store, "ada@example.com").await;
    let product = saved_product(store, "Widget", "9.99").await;
    let mut order = Order::for_product(&customer, &product, 2);
    assert!(order.save(store).await.unwrap());
    order
}

pub async fn saved_carrier(store: &Store, name: &str) -> ShippingCarrier {
    let mut carrier = ShippingCarrier::new(
        name,
        "+1 555 010 2030",
        Some("https://ship.example".into()),
    );
    assert!(carrier.save(store).await.unwrap());
    carrier
}

pub async fn saved_shipping(store: &Store, tracking_number: &str) -> Shipping {
    let carrier = saved_carrier(store, "Parcel Post").await;
    let eta = Utc::now().naive_utc() + Duration::days(3);
    let mut shipping = Shipping::new(carrier.id(), tracking_number, eta);
    assert!(shipping.save(store).await.unwrap());
    shipping
}
