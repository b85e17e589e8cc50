//! Business objects
//!
//! One type per table. Each owns its field validation, change
//! notification and AddNew/Update lifecycle, and orchestrates its own
//! gateway calls through a [`Store`](crate::Store).

#[macro_use]
mod macros;

pub mod customer;
pub mod order;
pub mod phone;
pub mod product;
pub mod shipping;
pub mod shipping_carrier;
pub mod transaction;
pub mod website;

pub use customer::Customer;
pub use order::{Order, OrderStatus};
pub use phone::{Phone, PhoneKind};
pub use product::Product;
pub use shipping::{Shipping, ShippingStatus};
pub use shipping_carrier::ShippingCarrier;
pub use transaction::{PaymentMethod, Transaction};
pub use website::Website;
