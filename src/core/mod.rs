//! Core module containing the traits and types shared by every entity

pub mod cache;
pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod lifecycle;
pub mod service;
pub mod validation;

pub use cache::{CachePolicy, Expiration, ListingCache};
pub use entity::{Entity, Mode, UNSAVED_ID, first_record, records};
pub use error::{
    ConfigError, FieldValidationError, GatewayError, StoreError, StoreResult, TransitionError,
    ValidationError,
};
pub use events::{EventBus, EventEnvelope, Notifier, SaveKind, StoreEvent};
pub use field::{FieldFormat, FieldValue};
pub use lifecycle::Lifecycle;
pub use service::Executor;
pub use validation::{FieldRules, Rule};
