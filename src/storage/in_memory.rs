//! In-memory executor for testing and development
//!
//! Procedures are registered as handlers over a set of named in-memory
//! tables. Every call is recorded before it runs, so tests can assert on
//! exactly which procedures were (or were not) invoked.

use crate::core::Executor;
use crate::core::error::GatewayError;
use crate::gateway::{Call, Row, SqlValue, Table};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Raw result of one procedure handler
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(Table),
    Scalar(Option<SqlValue>),
    Affected(u64),
}

impl Outcome {
    fn shape(&self) -> &'static str {
        match self {
            Outcome::Rows(_) => "a result set",
            Outcome::Scalar(_) => "a scalar",
            Outcome::Affected(_) => "a row count",
        }
    }
}

/// A registered procedure body
pub type Handler =
    Arc<dyn Fn(&Call, &mut MemoryTables) -> Result<Outcome, GatewayError> + Send + Sync>;

/// Named row collections with per-table identity sequences
#[derive(Debug, Default)]
pub struct MemoryTables {
    tables: HashMap<String, Vec<Row>>,
    sequences: HashMap<String, i32>,
}

impl MemoryTables {
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows_mut(&mut self, table: &str) -> &mut Vec<Row> {
        self.tables.entry(table.to_string()).or_default()
    }

    /// Next identity value for `table`, starting at 1
    pub fn next_id(&mut self, table: &str) -> i32 {
        let seq = self.sequences.entry(table.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }
}

/// One recorded procedure invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub procedure: String,
    pub arguments: IndexMap<String, SqlValue>,
}

impl RecordedCall {
    pub fn argument(&self, name: &str) -> Option<&SqlValue> {
        self.arguments.get(name)
    }
}

/// In-memory stored-procedure executor
///
/// Cloning shares the same tables, handlers and call log.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    procedures: Arc<RwLock<HashMap<String, Handler>>>,
    tables: Arc<RwLock<MemoryTables>>,
    log: Arc<RwLock<Vec<RecordedCall>>>,
    failures: Arc<RwLock<HashMap<String, String>>>,
}

impl std::fmt::Debug for InMemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDatabase")
            .field("calls", &self.call_count())
            .finish()
    }
}

fn poisoned(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::Connection {
        backend: "memory".to_string(),
        message: format!("Failed to acquire lock: {}", e),
    }
}

impl InMemoryDatabase {
    /// Create an empty database with no procedures
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database with the full retail procedure set installed
    pub fn with_retail_procedures() -> Self {
        let db = Self::new();
        super::retail::install_retail_procedures(&db);
        db
    }

    /// Register (or replace) the handler for a procedure name
    pub fn register<F>(&self, procedure: &str, handler: F)
    where
        F: Fn(&Call, &mut MemoryTables) -> Result<Outcome, GatewayError> + Send + Sync + 'static,
    {
        self.register_handler(procedure, Arc::new(handler));
    }

    /// Register a prebuilt handler, e.g. one from [`handlers`]
    pub fn register_handler(&self, procedure: &str, handler: Handler) {
        if let Ok(mut procedures) = self.procedures.write() {
            procedures.insert(procedure.to_string(), handler);
        }
    }

    /// Make the next call to `procedure` fail with a query error
    pub fn fail_next(&self, procedure: &str, message: &str) {
        if let Ok(mut failures) = self.failures.write() {
            failures.insert(procedure.to_string(), message.to_string());
        }
    }

    /// Seed a row directly, bypassing the procedures
    pub fn seed(&self, table: &str, row: Row) {
        if let Ok(mut tables) = self.tables.write() {
            tables.rows_mut(table).push(row);
        }
    }

    /// Snapshot of a table's current rows
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .map(|tables| tables.rows(table).to_vec())
            .unwrap_or_default()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log.read().map(|log| log.clone()).unwrap_or_default()
    }

    /// Calls made to one procedure
    pub fn calls_to(&self, procedure: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.procedure == procedure)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.log.read().map(|log| log.len()).unwrap_or(0)
    }

    pub fn clear_calls(&self) {
        if let Ok(mut log) = self.log.write() {
            log.clear();
        }
    }

    fn dispatch(&self, call: &Call) -> Result<Outcome, GatewayError> {
        self.log.write().map_err(poisoned)?.push(RecordedCall {
            procedure: call.name().to_string(),
            arguments: call.arguments().clone(),
        });

        if let Some(message) = self.failures.write().map_err(poisoned)?.remove(call.name()) {
            return Err(GatewayError::Query {
                procedure: call.name().to_string(),
                message,
            });
        }

        let handler = self
            .procedures
            .read()
            .map_err(poisoned)?
            .get(call.name())
            .cloned()
            .ok_or_else(|| GatewayError::UnknownProcedure {
                procedure: call.name().to_string(),
            })?;

        let mut tables = self.tables.write().map_err(poisoned)?;
        handler(call, &mut *tables)
    }

    fn unexpected(call: &Call, expected: &'static str, outcome: &Outcome) -> GatewayError {
        GatewayError::UnexpectedResult {
            procedure: call.name().to_string(),
            expected,
            found: outcome.shape(),
        }
    }
}

#[async_trait]
impl Executor for InMemoryDatabase {
    async fn fetch_table(&self, call: &Call) -> Result<Table, GatewayError> {
        match self.dispatch(call)? {
            Outcome::Rows(table) => Ok(table),
            other => Err(Self::unexpected(call, "a result set", &other)),
        }
    }

    async fn execute_scalar(&self, call: &Call) -> Result<Option<SqlValue>, GatewayError> {
        match self.dispatch(call)? {
            Outcome::Scalar(value) => Ok(value),
            Outcome::Rows(table) => Ok(table
                .first()
                .and_then(|row| row.iter().next().map(|(_, v)| v.clone()))),
            other => Err(Self::unexpected(call, "a scalar", &other)),
        }
    }

    async fn execute_non_query(&self, call: &Call) -> Result<u64, GatewayError> {
        match self.dispatch(call)? {
            Outcome::Affected(n) => Ok(n),
            other => Err(Self::unexpected(call, "a row count", &other)),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Generic handler builders over [`MemoryTables`]
///
/// Column names equal parameter names, so most procedures reduce to one of
/// these shapes.
pub mod handlers {
    use super::*;

    fn key_of(call: &Call, key: &str) -> Result<SqlValue, GatewayError> {
        call.argument(key)
            .cloned()
            .ok_or_else(|| GatewayError::UnboundParameter {
                procedure: call.name().to_string(),
                parameter: key.to_string(),
            })
    }

    /// Insert a row from every argument, assign `key`, return it as scalar
    pub fn insert(table: &'static str, key: &'static str) -> Handler {
        Arc::new(move |call: &Call, tables: &mut MemoryTables| {
            let id = tables.next_id(table);
            let mut row = Row::new().with(key, id);
            for (name, value) in call.arguments() {
                row.set(name.as_str(), value.clone());
            }
            tables.rows_mut(table).push(row);
            Ok(Outcome::Scalar(Some(SqlValue::Int(i64::from(id)))))
        })
    }

    /// Select rows where every argument equals its column, plus `fixed`
    pub fn select(table: &'static str, fixed: Vec<(&'static str, SqlValue)>) -> Handler {
        Arc::new(move |call: &Call, tables: &mut MemoryTables| {
            let rows = tables
                .rows(table)
                .iter()
                .filter(|row| {
                    call.arguments()
                        .iter()
                        .map(|(name, value)| (name.as_str(), value))
                        .chain(fixed.iter().map(|(name, value)| (*name, value)))
                        .all(|(name, value)| row.get(name) == Some(value))
                })
                .cloned()
                .collect();
            Ok(Outcome::Rows(Table::from_rows(rows)))
        })
    }

    /// Update the row matching `key` from the other arguments, then `fixed`
    pub fn update(
        table: &'static str,
        key: &'static str,
        fixed: Vec<(&'static str, SqlValue)>,
    ) -> Handler {
        Arc::new(move |call: &Call, tables: &mut MemoryTables| {
            let id = key_of(call, key)?;
            let Some(row) = tables
                .rows_mut(table)
                .iter_mut()
                .find(|row| row.get(key) == Some(&id))
            else {
                return Ok(Outcome::Affected(0));
            };
            for (name, value) in call.arguments() {
                if name != key {
                    row.set(name.as_str(), value.clone());
                }
            }
            for (name, value) in &fixed {
                row.set(*name, value.clone());
            }
            Ok(Outcome::Affected(1))
        })
    }

    /// Delete the row matching `key`
    pub fn delete(table: &'static str, key: &'static str) -> Handler {
        Arc::new(move |call: &Call, tables: &mut MemoryTables| {
            let id = key_of(call, key)?;
            let rows = tables.rows_mut(table);
            let before = rows.len();
            rows.retain(|row| row.get(key) != Some(&id));
            Ok(Outcome::Affected((before - rows.len()) as u64))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Procedure;
    use std::sync::LazyLock;

    static ADD_THING: LazyLock<Procedure> =
        LazyLock::new(|| Procedure::parse("EXEC SP_AddThing @Name, @Size"));
    static GET_THING: LazyLock<Procedure> =
        LazyLock::new(|| Procedure::parse("EXEC SP_GetThingByID @ThingID"));
    static UPDATE_THING: LazyLock<Procedure> =
        LazyLock::new(|| Procedure::parse("EXEC SP_UpdateThing @ThingID, @Size"));
    static DELETE_THING: LazyLock<Procedure> =
        LazyLock::new(|| Procedure::parse("EXEC SP_DeleteThing @ThingID"));

    fn database() -> InMemoryDatabase {
        let db = InMemoryDatabase::new();
        db.register_handler("SP_AddThing", handlers::insert("Things", "ThingID"));
        db.register_handler("SP_GetThingByID", handlers::select("Things", vec![]));
        db.register_handler("SP_UpdateThing", handlers::update("Things", "ThingID", vec![]));
        db.register_handler("SP_DeleteThing", handlers::delete("Things", "ThingID"));
        db
    }

    fn add(name: &str) -> Call {
        ADD_THING.call().bind("Name", name).bind("Size", 3).finish().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let db = database();
        assert_eq!(db.execute_scalar(&add("a")).await.unwrap(), Some(SqlValue::Int(1)));
        assert_eq!(db.execute_scalar(&add("b")).await.unwrap(), Some(SqlValue::Int(2)));
        assert_eq!(db.rows("Things").len(), 2);
    }

    #[tokio::test]
    async fn test_select_update_delete() {
        let db = database();
        db.execute_scalar(&add("a")).await.unwrap();

        let get = GET_THING.call().bind("ThingID", 1).finish().unwrap();
        let table = db.fetch_table(&get).await.unwrap();
        assert_eq!(table.first().unwrap().get_string("Name").unwrap(), "a");

        let update = UPDATE_THING.call().bind("ThingID", 1).bind("Size", 9).finish().unwrap();
        assert_eq!(db.execute_non_query(&update).await.unwrap(), 1);
        let table = db.fetch_table(&get).await.unwrap();
        assert_eq!(table.first().unwrap().get_i32("Size").unwrap(), 9);

        let delete = DELETE_THING.call().bind("ThingID", 1).finish().unwrap();
        assert_eq!(db.execute_non_query(&delete).await.unwrap(), 1);
        assert_eq!(db.execute_non_query(&delete).await.unwrap(), 0);
        assert!(db.fetch_table(&get).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calls_are_logged_in_order() {
        let db = database();
        db.execute_scalar(&add("a")).await.unwrap();
        let get = GET_THING.call().bind("ThingID", 1).finish().unwrap();
        db.fetch_table(&get).await.unwrap();

        let calls = db.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].procedure, "SP_AddThing");
        assert_eq!(calls[0].argument("Name"), Some(&SqlValue::from("a")));
        assert_eq!(db.calls_to("SP_GetThingByID").len(), 1);

        db.clear_calls();
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_next_fails_once() {
        let db = database();
        db.fail_next("SP_AddThing", "deadlock victim");

        let err = db.execute_scalar(&add("a")).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Query { ref message, .. } if message == "deadlock victim"
        ));
        assert!(db.execute_scalar(&add("a")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_procedure() {
        let db = InMemoryDatabase::new();
        let err = db.fetch_table(&add("a")).await.unwrap_err();
        assert_eq!(err.error_code(), "GATEWAY_UNKNOWN_PROCEDURE");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let db = database();
        let err = db.execute_non_query(&add("a")).await.unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedResult { .. }));
    }
}
