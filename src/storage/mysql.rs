//! MySQL executor using sqlx.
//!
//! Every [`Call`] becomes a `CALL Name(?, ?, ...)` statement with its
//! arguments bound positionally, in declaration order.
//!
//! # Feature flag
//!
//! This module is gated behind the `mysql` feature flag:
//! ```toml
//! [dependencies]
//! storefront = { version = "0.1", features = ["mysql"] }
//! ```
//!
//! # Column decoding
//!
//! Result columns are decoded by their reported MySQL type:
//!
//! - `TINYINT(1)` / `BOOLEAN` → `Bool`
//! - integer types → `Int`
//! - `DECIMAL` → `Decimal`
//! - `DATETIME`, `TIMESTAMP`, `DATE` → `Timestamp`
//! - everything else → `Text`

use crate::config::DatabaseConfig;
use crate::core::Executor;
use crate::core::error::{GatewayError, StoreResult};
use crate::gateway::{Call, Row, SqlValue, Table};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row as _, TypeInfo, ValueRef};
use std::time::Duration;

/// Stored-procedure executor backed by a `MySqlPool`
///
/// # Example
///
/// ```rust,ignore
/// use storefront::config::StoreConfig;
/// use storefront::storage::MysqlDatabase;
///
/// let config = StoreConfig::from_yaml_file("storefront.yaml")?;
/// let db = MysqlDatabase::connect(&config.database).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MysqlDatabase {
    pool: MySqlPool,
}

impl MysqlDatabase {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool from the database settings
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config.url()?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await
            .map_err(GatewayError::from)?;

        tracing::info!(
            max_connections = config.max_connections,
            "connected to MySQL"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// `CALL Name(?, ...)` with one placeholder per declared parameter
pub fn call_statement(call: &Call) -> String {
    let placeholders = vec!["?"; call.arguments().len()].join(", ");
    format!("CALL {}({})", call.name(), placeholders)
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    call: &'q Call,
) -> Query<'q, MySql, MySqlArguments> {
    for value in call.values() {
        query = match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Decimal(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Attach the procedure name to a failure raised while running `call`
fn failed(call: &Call, err: sqlx::Error) -> GatewayError {
    match GatewayError::from(err) {
        GatewayError::Query { message, .. } => GatewayError::Query {
            procedure: call.name().to_string(),
            message,
        },
        other => other,
    }
}

fn decode_column(row: &MySqlRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(SqlValue::Null);
    }

    let column = &row.columns()[index];
    let type_name = column.type_info().name().to_ascii_uppercase();

    let value = match type_name.as_str() {
        "BOOLEAN" => SqlValue::Bool(row.try_get::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            SqlValue::Int(row.try_get::<i64, _>(index)?)
        }
        name if name.ends_with("UNSIGNED") => {
            let raw = row.try_get::<u64, _>(index)?;
            SqlValue::Int(i64::try_from(raw).map_err(|e| sqlx::Error::ColumnDecode {
                index: column.name().to_string(),
                source: Box::new(e),
            })?)
        }
        "DECIMAL" => SqlValue::Decimal(row.try_get::<Decimal, _>(index)?),
        "DATETIME" | "TIMESTAMP" => SqlValue::Timestamp(row.try_get::<NaiveDateTime, _>(index)?),
        "DATE" => SqlValue::Timestamp(
            row.try_get::<NaiveDate, _>(index)?
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default(),
        ),
        _ => SqlValue::Text(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    row.columns()
        .iter()
        .map(|column| Ok((column.name().to_string(), decode_column(row, column.ordinal())?)))
        .collect()
}

#[async_trait]
impl Executor for MysqlDatabase {
    async fn fetch_table(&self, call: &Call) -> Result<Table, GatewayError> {
        let statement = call_statement(call);
        let rows = bind_all(sqlx::query(&statement), call)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| failed(call, e))?;

        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| failed(call, e))?;
        Ok(Table::new(columns, rows))
    }

    async fn execute_scalar(&self, call: &Call) -> Result<Option<SqlValue>, GatewayError> {
        let statement = call_statement(call);
        let row = bind_all(sqlx::query(&statement), call)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| failed(call, e))?;

        match row {
            Some(row) if !row.columns().is_empty() => {
                decode_column(&row, 0).map(Some).map_err(|e| failed(call, e))
            }
            _ => Ok(None),
        }
    }

    async fn execute_non_query(&self, call: &Call) -> Result<u64, GatewayError> {
        let statement = call_statement(call);
        let result = bind_all(sqlx::query(&statement), call)
            .execute(&self.pool)
            .await
            .map_err(|e| failed(call, e))?;
        Ok(result.rows_affected())
    }

    fn backend(&self) -> &'static str {
        "mysql"
    }
}
