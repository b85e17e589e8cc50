//! Typed error handling for the storefront layers
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a field or a whole entity breaks a declarative rule
//! - [`TransitionError`]: an out-of-order status change was attempted
//! - [`GatewayError`]: the persistence gateway failed hard (connection, SQL,
//!   parameter binding, row mapping)
//! - [`ConfigError`]: a parsed configuration holds unusable settings
//! - `StoreError::Cancelled`: a cooperative cancellation fired
//!
//! Soft failures (no rows affected, no identifier returned) are not errors:
//! they surface as `Ok(false)` or `Ok(None)` from the entity operations.
//!
//! # Example
//!
//! ```rust,ignore
//! match product.save(&store).await {
//!     Ok(true) => println!("saved as {}", product.id()),
//!     Ok(false) => println!("nothing was written"),
//!     Err(StoreError::Validation(e)) => eprintln!("invalid: {}", e),
//!     Err(StoreError::Cancelled) => eprintln!("cancelled"),
//!     Err(e) => eprintln!("database failure: {}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type for entity and gateway operations
#[derive(Debug)]
pub enum StoreError {
    /// Field or entity validation failed; nothing was sent to the database
    Validation(ValidationError),

    /// Illegal status transition; nothing was sent to the database
    Transition(TransitionError),

    /// The underlying database call failed
    Gateway(GatewayError),

    /// Configuration errors
    Config(ConfigError),

    /// The operation was cancelled before its result was observed
    Cancelled,

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(e) => write!(f, "{}", e),
            StoreError::Transition(e) => write!(f, "{}", e),
            StoreError::Gateway(e) => write!(f, "{}", e),
            StoreError::Config(e) => write!(f, "{}", e),
            StoreError::Cancelled => write!(f, "Operation cancelled"),
            StoreError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::Transition(e) => Some(e),
            StoreError::Gateway(e) => Some(e),
            StoreError::Config(e) => Some(e),
            StoreError::Cancelled | StoreError::Internal(_) => None,
        }
    }
}

impl StoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::Transition(_) => "INVALID_TRANSITION",
            StoreError::Gateway(e) => e.error_code(),
            StoreError::Config(e) => e.error_code(),
            StoreError::Cancelled => "CANCELLED",
            StoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures raised before any database work was attempted
    pub fn is_business_rule(&self) -> bool {
        matches!(self, StoreError::Validation(_) | StoreError::Transition(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to field validation
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Every violation carried by this error
    pub fn violations(&self) -> Vec<FieldValidationError> {
        match self {
            ValidationError::FieldError { field, message } => vec![FieldValidationError {
                field: field.clone(),
                message: message.clone(),
            }],
            ValidationError::FieldErrors(errors) => errors.clone(),
        }
    }

    /// Whether any violation concerns `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.violations().iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

// =============================================================================
// Transition Errors
// =============================================================================

/// An attempted status change that the entity's lifecycle does not allow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub entity_type: &'static str,
    pub from: String,
    pub to: String,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot change {} status from {} to {}",
            self.entity_type, self.from, self.to
        )
    }
}

impl std::error::Error for TransitionError {}

impl From<TransitionError> for StoreError {
    fn from(err: TransitionError) -> Self {
        StoreError::Transition(err)
    }
}

// =============================================================================
// Gateway Errors
// =============================================================================

/// Hard failures of the persistence gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    #[error("Procedure {procedure} failed: {message}")]
    Query { procedure: String, message: String },

    #[error("Procedure {procedure} is not available")]
    UnknownProcedure { procedure: String },

    #[error("Procedure {procedure} does not declare parameter @{parameter}")]
    UnknownParameter { procedure: String, parameter: String },

    #[error("Parameter @{parameter} of {procedure} was not bound")]
    UnboundParameter { procedure: String, parameter: String },

    #[error("Procedure {procedure} returned {found} where {expected} was expected")]
    UnexpectedResult {
        procedure: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Column '{column}' is missing from the result row")]
    MissingColumn { column: String },

    #[error("Column '{column}' holds {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Column '{column}' holds an unknown {entity} code {code}")]
    UnknownCode {
        column: String,
        entity: &'static str,
        code: i64,
    },
}

impl GatewayError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Connection { .. } => "GATEWAY_CONNECTION",
            GatewayError::Query { .. } => "GATEWAY_QUERY",
            GatewayError::UnknownProcedure { .. } => "GATEWAY_UNKNOWN_PROCEDURE",
            GatewayError::UnknownParameter { .. } => "GATEWAY_UNKNOWN_PARAMETER",
            GatewayError::UnboundParameter { .. } => "GATEWAY_UNBOUND_PARAMETER",
            GatewayError::UnexpectedResult { .. } => "GATEWAY_UNEXPECTED_RESULT",
            GatewayError::MissingColumn { .. } => "GATEWAY_MISSING_COLUMN",
            GatewayError::ColumnType { .. } => "GATEWAY_COLUMN_TYPE",
            GatewayError::UnknownCode { .. } => "GATEWAY_UNKNOWN_CODE",
        }
    }
}

impl From<GatewayError> for StoreError {
    fn from(err: GatewayError) -> Self {
        StoreError::Gateway(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Configuration that parsed but cannot be used
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A setting the requested backend needs is absent
    MissingField { field: String, context: String },

    /// A setting holds a value outside its allowed range
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }

    /// Dotted path of the offending setting
    pub fn field(&self) -> &str {
        match self {
            ConfigError::MissingField { field, .. } | ConfigError::InvalidValue { field, .. } => {
                field
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for StoreError {
    fn from(err: ConfigError) -> Self {
        StoreError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => GatewayError::Connection {
                backend: "MySQL".to_string(),
                message: err.to_string(),
            },
            other => GatewayError::Query {
                procedure: String::new(),
                message: other.to_string(),
            },
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for storefront operations
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Tests
// =============================================================================
