use crate::error::{Result, ScopeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accumulated query options for one chain
///
/// Merging is last-writer-wins per top-level key; nested values are never combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryOptions(Map<String, Value>);

impl QueryOptions {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Single-key options mapping
    pub fn fragment(key: &str, value: Value) -> Self {
        let mut map = Map::with_capacity(1);
        map.insert(key.to_string(), value);
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value for `key` unless it is absent, null, or the empty sequence a bare collapse scope yields
    pub fn present(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    /// A string or a sequence of strings
    pub fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.present(key) else {
            return Ok(None);
        };

        match value {
            Value::String(item) => Ok(Some(vec![item.clone()])),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ScopeError::invalid_option(key, format!("expected a string, got {item}"))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            other => Err(ScopeError::invalid_option(
                key,
                format!("expected a string or a list of strings, got {other}"),
            )),
        }
    }

    /// A non-negative integer, as used by `limit` and `offset`
    pub fn non_negative(&self, key: &str) -> Result<Option<u64>> {
        match self.present(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                ScopeError::invalid_option(
                    key,
                    format!("expected a non-negative integer, got {value}"),
                )
            }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `other` into `self`, replacing values for keys present in both
    pub fn merge(&mut self, other: QueryOptions) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn merged(mut self, other: QueryOptions) -> Self {
        self.merge(other);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for QueryOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<QueryOptions> for Value {
    fn from(options: QueryOptions) -> Self {
        Value::Object(options.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_later_keys_override() {
        let first = QueryOptions::fragment("order", json!("title"));
        let second = QueryOptions::fragment("order", json!("created_at DESC"));
        let merged = first
            .merged(QueryOptions::fragment("limit", json!(5)))
            .merged(second);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("order"), Some(&json!("created_at DESC")));
        assert_eq!(merged.get("limit"), Some(&json!(5)));
    }

    #[test]
    fn test_bare_collapse_value_is_not_present() {
        let options = QueryOptions::fragment("order", json!([]));
        assert!(options.contains_key("order"));
        assert!(options.present("order").is_none());
        assert_eq!(options.string_list("order").unwrap(), None);
    }

    #[test]
    fn test_string_list_shapes() {
        let single = QueryOptions::fragment("select", json!("title"));
        assert_eq!(
            single.string_list("select").unwrap(),
            Some(vec!["title".to_string()])
        );

        let many = QueryOptions::fragment("include", json!(["author", "comments"]));
        assert_eq!(
            many.string_list("include").unwrap(),
            Some(vec!["author".to_string(), "comments".to_string()])
        );

        let bad = QueryOptions::fragment("include", json!({"comments": "author"}));
        assert!(matches!(
            bad.string_list("include"),
            Err(ScopeError::InvalidOption { key, .. }) if key == "include"
        ));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(
            QueryOptions::fragment("limit", json!(10)).non_negative("limit").unwrap(),
            Some(10)
        );
        assert!(QueryOptions::fragment("limit", json!(-1))
            .non_negative("limit")
            .is_err());
        assert!(QueryOptions::fragment("offset", json!([5, 10]))
            .non_negative("offset")
            .is_err());
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let options = QueryOptions::fragment("conditions", json!({"published": true}));
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"conditions": {"published": true}})
        );
    }
}
