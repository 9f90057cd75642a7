//! # In-Memory Host
//!
//! A small host that stores JSON rows per table and executes merged scope
//! options directly against them. Useful for exercising scope chains end to
//! end without a database.

use super::association::Association;
use super::executor;
use super::record::Record;
use crate::error::{Result, ScopeError};
use crate::logging;
use crate::registry::ScopeTable;
use crate::scopes::{apply, QueryHost, QueryOptions, ScopeHost, ScopeMethod, ScopeRegistry, ScopeSource};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Row = Map<String, Value>;

/// Named tables of JSON-object rows, cheap to clone and share between models
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&self, name: &str) {
        self.tables.write().entry(name.to_string()).or_default();
    }

    /// Insert a row, creating the table on first use; missing ids are assigned sequentially
    pub fn insert(&self, table: &str, row: Value) -> Result<i64> {
        let mut attributes = match row {
            Value::Object(attributes) => attributes,
            other => {
                return Err(ScopeError::invalid_option(
                    table,
                    format!("rows must be JSON objects, got {other}"),
                ))
            }
        };

        let mut tables = self.tables.write();
        let rows = tables.entry(table.to_string()).or_default();

        let id = match attributes.get("id") {
            Some(value) => {
                let id = value.as_i64().ok_or_else(|| {
                    ScopeError::invalid_option("id", format!("expected an integer, got {value}"))
                })?;
                if rows.iter().any(|row| row_id(row) == Some(id)) {
                    return Err(ScopeError::invalid_option(
                        "id",
                        format!("{table} already has a row with id {id}"),
                    ));
                }
                id
            }
            None => rows.iter().filter_map(row_id).max().unwrap_or(0) + 1,
        };

        attributes.insert("id".to_string(), Value::from(id));
        rows.push(attributes);
        Ok(id)
    }

    /// Snapshot of every row in `table`
    pub fn rows(&self, table: &str) -> Result<Vec<Row>> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| ScopeError::invalid_option("from", format!("unknown table '{table}'")))
    }

    /// Overwrite the given columns of one row
    pub fn update(&self, table: &str, id: i64, attributes: &Row) -> Result<()> {
        let mut tables = self.tables.write();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or_else(|| ScopeError::RecordNotFound {
                table: table.to_string(),
                id,
            })?;

        for (column, value) in attributes {
            row.insert(column.clone(), value.clone());
        }
        Ok(())
    }
}

pub(crate) fn row_id(row: &Row) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

/// One table plus its associations and generated scopes
#[derive(Debug, Clone)]
pub struct MemoryModel {
    table: String,
    db: MemoryDatabase,
    associations: HashMap<String, Association>,
    scopes: ScopeRegistry,
}

impl MemoryModel {
    /// Model over `table` with the default scope table applied
    pub fn new(db: MemoryDatabase, table: &str) -> Self {
        Self::with_scope_table(db, table, &ScopeTable::default())
    }

    pub fn with_scope_table(db: MemoryDatabase, table: &str, scopes: &ScopeTable) -> Self {
        db.create_table(table);
        let mut model = Self {
            table: table.to_string(),
            db,
            associations: HashMap::new(),
            scopes: ScopeRegistry::new(),
        };
        apply(&mut model, scopes);
        logging::log_scope_operation(
            "apply",
            &model.table,
            "registered",
            Some(&format!("{} scopes ({})", scopes.len(), scopes.variant())),
        );
        model
    }

    pub fn belongs_to(mut self, name: &str, table: &str, foreign_key: &str) -> Self {
        self.associations
            .insert(name.to_string(), Association::belongs_to(name, table, foreign_key));
        self
    }

    pub fn has_many(mut self, name: &str, table: &str, foreign_key: &str) -> Self {
        self.associations
            .insert(name.to_string(), Association::has_many(name, table, foreign_key));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn database(&self) -> &MemoryDatabase {
        &self.db
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    pub fn insert(&self, attributes: Value) -> Result<Record> {
        let id = self.db.insert(&self.table, attributes)?;
        self.find(id)?.ok_or_else(|| ScopeError::RecordNotFound {
            table: self.table.clone(),
            id,
        })
    }

    pub fn find(&self, id: i64) -> Result<Option<Record>> {
        self.scoped().conditions(json!({ "id": id }))?.first()
    }

    /// Persist a record's attributes back to its table
    pub fn save(&self, record: &Record) -> Result<()> {
        if record.is_readonly() {
            let error = ScopeError::ReadOnlyRecord {
                table: record.table().to_string(),
                id: record.id(),
            };
            logging::log_error("memory_model", "save", &error.to_string(), None);
            return Err(error);
        }

        self.db.update(record.table(), record.id(), record.attributes())
    }
}

impl ScopeHost for MemoryModel {
    fn register_scope(&mut self, method: ScopeMethod) {
        self.scopes.register_scope(method);
    }
}

impl ScopeSource for MemoryModel {
    fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }
}

impl QueryHost for MemoryModel {
    type Record = Record;

    fn execute(&self, options: &QueryOptions) -> Result<Vec<Record>> {
        let merged = Value::from(options.clone());
        debug!(table = %self.table, options = %merged, "Executing scope chain");
        executor::execute(self, options)
    }
}
