//! Retail procedure set for the in-memory database
//!
//! Mirrors the stored procedures the data-access modules call, backed by
//! one in-memory table per entity.

use super::in_memory::{InMemoryDatabase, handlers};
use crate::data::{
    customers, orders, phones, products, shipping, shipping_carriers, transactions, websites,
};
use crate::entities::{OrderStatus, ShippingStatus};
use crate::gateway::{Procedure, SqlValue};

fn status(code: u8) -> SqlValue {
    SqlValue::from(code)
}

/// Register a handler for every retail procedure
pub fn install_retail_procedures(db: &InMemoryDatabase) {
    let register = |procedure: &Procedure, handler| db.register_handler(procedure.name(), handler);

    // Customers
    register(&customers::ADD, handlers::insert(customers::TABLE, customers::CUSTOMER_ID));
    register(&customers::GET_BY_ID, handlers::select(customers::TABLE, vec![]));
    register(&customers::GET_BY_EMAIL, handlers::select(customers::TABLE, vec![]));
    register(&customers::GET_ALL, handlers::select(customers::TABLE, vec![]));
    register(
        &customers::UPDATE,
        handlers::update(customers::TABLE, customers::CUSTOMER_ID, vec![]),
    );
    register(
        &customers::SET_ACTIVE,
        handlers::update(customers::TABLE, customers::CUSTOMER_ID, vec![]),
    );

    // Products
    register(&products::ADD, handlers::insert(products::TABLE, products::PRODUCT_ID));
    register(&products::GET_BY_ID, handlers::select(products::TABLE, vec![]));
    register(&products::GET_ALL, handlers::select(products::TABLE, vec![]));
    register(
        &products::GET_AVAILABLE,
        handlers::select(products::TABLE, vec![(products::IS_AVAILABLE, SqlValue::Bool(true))]),
    );
    register(&products::UPDATE, handlers::update(products::TABLE, products::PRODUCT_ID, vec![]));
    register(&products::DELETE, handlers::delete(products::TABLE, products::PRODUCT_ID));
    register(
        &products::MAKE_AVAILABLE,
        handlers::update(
            products::TABLE,
            products::PRODUCT_ID,
            vec![(products::IS_AVAILABLE, SqlValue::Bool(true))],
        ),
    );
    register(
        &products::MAKE_UNAVAILABLE,
        handlers::update(
            products::TABLE,
            products::PRODUCT_ID,
            vec![(products::IS_AVAILABLE, SqlValue::Bool(false))],
        ),
    );

    // Orders
    register(&orders::ADD, handlers::insert(orders::TABLE, orders::ORDER_ID));
    register(&orders::GET_BY_ID, handlers::select(orders::TABLE, vec![]));
    register(&orders::GET_ALL, handlers::select(orders::TABLE, vec![]));
    register(&orders::GET_BY_CUSTOMER, handlers::select(orders::TABLE, vec![]));
    register(&orders::GET_BY_STATUS, handlers::select(orders::TABLE, vec![]));
    register(&orders::UPDATE, handlers::update(orders::TABLE, orders::ORDER_ID, vec![]));
    register(&orders::ASSIGN_SHIPPING, handlers::update(orders::TABLE, orders::ORDER_ID, vec![]));
    for (procedure, target) in [
        (&orders::MARK_AS_ARRIVED, OrderStatus::Arrived),
        (&orders::CHANGE_TO_DELIVERED, OrderStatus::Delivered),
        (&orders::CANCEL, OrderStatus::Cancelled),
    ] {
        register(
            procedure,
            handlers::update(
                orders::TABLE,
                orders::ORDER_ID,
                vec![(orders::STATUS, status(target.code()))],
            ),
        );
    }

    // Transactions
    register(
        &transactions::ADD,
        handlers::insert(transactions::TABLE, transactions::TRANSACTION_ID),
    );
    register(&transactions::GET_BY_ID, handlers::select(transactions::TABLE, vec![]));
    register(&transactions::GET_ALL, handlers::select(transactions::TABLE, vec![]));
    register(&transactions::GET_BY_ORDER, handlers::select(transactions::TABLE, vec![]));
    register(
        &transactions::UPDATE,
        handlers::update(transactions::TABLE, transactions::TRANSACTION_ID, vec![]),
    );
    register(
        &transactions::FLAG_AS_DONE,
        handlers::update(
            transactions::TABLE,
            transactions::TRANSACTION_ID,
            vec![(transactions::IS_DONE, SqlValue::Bool(true))],
        ),
    );

    // Shipping
    register(&shipping::ADD, handlers::insert(shipping::TABLE, shipping::SHIPPING_ID));
    register(&shipping::GET_BY_ID, handlers::select(shipping::TABLE, vec![]));
    register(&shipping::GET_BY_TRACKING_NUMBER, handlers::select(shipping::TABLE, vec![]));
    register(&shipping::GET_ALL, handlers::select(shipping::TABLE, vec![]));
    register(&shipping::GET_BY_STATUS, handlers::select(shipping::TABLE, vec![]));
    register(&shipping::UPDATE, handlers::update(shipping::TABLE, shipping::SHIPPING_ID, vec![]));
    for (procedure, target) in [
        (&shipping::MARK_IN_TRANSIT, ShippingStatus::InTransit),
        (&shipping::MARK_AS_ARRIVED, ShippingStatus::Arrived),
        (&shipping::CANCEL, ShippingStatus::Cancelled),
        (&shipping::REINSTATE, ShippingStatus::Pending),
    ] {
        register(
            procedure,
            handlers::update(
                shipping::TABLE,
                shipping::SHIPPING_ID,
                vec![(shipping::STATUS, status(target.code()))],
            ),
        );
    }

    // Shipping carriers
    register(
        &shipping_carriers::ADD,
        handlers::insert(shipping_carriers::TABLE, shipping_carriers::CARRIER_ID),
    );
    register(&shipping_carriers::GET_BY_ID, handlers::select(shipping_carriers::TABLE, vec![]));
    register(&shipping_carriers::GET_ALL, handlers::select(shipping_carriers::TABLE, vec![]));
    register(
        &shipping_carriers::UPDATE,
        handlers::update(shipping_carriers::TABLE, shipping_carriers::CARRIER_ID, vec![]),
    );
    register(
        &shipping_carriers::DELETE,
        handlers::delete(shipping_carriers::TABLE, shipping_carriers::CARRIER_ID),
    );

    // Phones
    register(&phones::ADD, handlers::insert(phones::TABLE, phones::PHONE_ID));
    register(&phones::GET_BY_ID, handlers::select(phones::TABLE, vec![]));
    register(&phones::GET_BY_CUSTOMER, handlers::select(phones::TABLE, vec![]));
    register(&phones::UPDATE, handlers::update(phones::TABLE, phones::PHONE_ID, vec![]));
    register(
        &phones::DEACTIVATE,
        handlers::update(
            phones::TABLE,
            phones::PHONE_ID,
            vec![(phones::IS_ACTIVE, SqlValue::Bool(false))],
        ),
    );

    // Websites
    register(&websites::ADD, handlers::insert(websites::TABLE, websites::WEBSITE_ID));
    register(&websites::GET_BY_ID, handlers::select(websites::TABLE, vec![]));
    register(&websites::GET_BY_CUSTOMER, handlers::select(websites::TABLE, vec![]));
    register(&websites::UPDATE, handlers::update(websites::TABLE, websites::WEBSITE_ID, vec![]));
    register(&websites::DELETE, handlers::delete(websites::TABLE, websites::WEBSITE_ID));
}
