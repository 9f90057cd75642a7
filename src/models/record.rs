use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A row materialized by a scope chain over a [`MemoryModel`](super::MemoryModel)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    table: String,
    id: i64,
    attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    associations: BTreeMap<String, Vec<Record>>,
    readonly: bool,
    locked: bool,
}

impl Record {
    pub(crate) fn new(table: &str, id: i64, attributes: Map<String, Value>) -> Self {
        Self {
            table: table.to_string(),
            id,
            attributes,
            associations: BTreeMap::new(),
            readonly: false,
            locked: false,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.attributes.get(column)
    }

    pub fn set(&mut self, column: &str, value: Value) -> &mut Self {
        self.attributes.insert(column.to_string(), value);
        self
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Eager-loaded rows for `name`; `None` if the association was not included
    pub fn association(&self, name: &str) -> Option<&[Record]> {
        self.associations.get(name).map(Vec::as_slice)
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Keep `id` and the listed columns; table-qualified names such as
    /// `posts.title` select the bare column
    pub(crate) fn project(&mut self, columns: &[String]) {
        self.attributes.retain(|column, _| {
            column == "id"
                || columns.iter().any(|selected| {
                    selected == column
                        || selected
                            .rsplit_once('.')
                            .is_some_and(|(_, bare)| bare == column)
                })
        });
    }

    pub(crate) fn load_association(&mut self, name: &str, records: Vec<Record>) {
        self.associations.insert(name.to_string(), records);
    }

    pub(crate) fn mark_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub(crate) fn mark_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post() -> Record {
        let attributes = match json!({"id": 1, "title": "Ownership", "views": 120}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Record::new("posts", 1, attributes)
    }

    #[test]
    fn test_project_keeps_id_and_selected_columns() {
        let mut record = post();
        record.project(&["views".to_string()]);
        assert_eq!(record.attributes().len(), 2);
        assert_eq!(record.get("views"), Some(&json!(120)));
        assert!(record.get("title").is_none());
    }

    #[test]
    fn test_project_accepts_qualified_columns() {
        let mut record = post();
        record.project(&["posts.title".to_string()]);
        assert_eq!(record.get("title"), Some(&json!("Ownership")));
        assert!(record.get("views").is_none());
    }
}
