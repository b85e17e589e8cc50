//! Tabular results returned by listing and lookup procedures

use crate::core::error::GatewayError;
use crate::gateway::value::SqlValue;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

/// One result row. Columns keep their result-set order and are looked up
/// by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    columns: IndexMap<String, SqlValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column insertion
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn required(&self, column: &str) -> Result<&SqlValue, GatewayError> {
        self.columns
            .get(column)
            .ok_or_else(|| GatewayError::MissingColumn {
                column: column.to_string(),
            })
    }

    fn mismatch(column: &str, expected: &'static str, found: &SqlValue) -> GatewayError {
        GatewayError::ColumnType {
            column: column.to_string(),
            expected,
            found: found.kind(),
        }
    }

    pub fn get_i32(&self, column: &str) -> Result<i32, GatewayError> {
        let value = self.required(column)?;
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| Self::mismatch(column, "int", value))
    }

    pub fn get_opt_i32(&self, column: &str) -> Result<Option<i32>, GatewayError> {
        match self.columns.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(_) => self.get_i32(column).map(Some),
        }
    }

    pub fn get_u8(&self, column: &str) -> Result<u8, GatewayError> {
        let value = self.required(column)?;
        value
            .as_i64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| Self::mismatch(column, "tinyint", value))
    }

    pub fn get_bool(&self, column: &str) -> Result<bool, GatewayError> {
        let value = self.required(column)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(column, "bool", value))
    }

    pub fn get_decimal(&self, column: &str) -> Result<Decimal, GatewayError> {
        let value = self.required(column)?;
        value
            .as_decimal()
            .ok_or_else(|| Self::mismatch(column, "decimal", value))
    }

    pub fn get_string(&self, column: &str) -> Result<String, GatewayError> {
        let value = self.required(column)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Self::mismatch(column, "text", value))
    }

    /// Nullable text. A missing column reads as `None`.
    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>, GatewayError> {
        match self.columns.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(_) => self.get_string(column).map(Some),
        }
    }

    pub fn get_timestamp(&self, column: &str) -> Result<NaiveDateTime, GatewayError> {
        let value = self.required(column)?;
        value
            .as_timestamp()
            .ok_or_else(|| Self::mismatch(column, "timestamp", value))
    }

    pub fn get_opt_timestamp(&self, column: &str) -> Result<Option<NaiveDateTime>, GatewayError> {
        match self.columns.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(_) => self.get_timestamp(column).map(Some),
        }
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A result set. An empty table is the "not found" signal; fetches never
/// return a missing table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from rows, taking the column list from the first row
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|r| r.column_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
