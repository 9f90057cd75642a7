//! Argument-shaping rules applied by generated scopes.

use crate::registry::Normalization;
use serde_json::{Map, Value};

/// Zero arguments give an empty sequence, one is used verbatim, more are collected in call order
pub fn collapse(args: &[Value]) -> Value {
    match args {
        [] => Value::Array(Vec::new()),
        [single] => single.clone(),
        many => Value::Array(many.to_vec()),
    }
}

/// Bare invocation means `true`; otherwise the first argument wins
pub fn switch(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Bool(true))
}

/// Bare invocation is an empty options mapping; otherwise the argument is the whole mapping
pub fn pass_through(args: &[Value]) -> Value {
    args.first()
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

impl Normalization {
    /// Normalize `args` into the value stored under the scope's key
    pub fn normalize(self, args: &[Value]) -> Value {
        match self {
            Normalization::Collapse => collapse(args),
            Normalization::Switch => switch(args),
            Normalization::PassThrough => pass_through(args),
        }
    }

    /// Build the options fragment handed to the host for `key`
    ///
    /// Pass-through scopes contribute their argument as the whole fragment.
    pub fn fragment(self, key: &str, args: &[Value]) -> Value {
        let value = self.normalize(args);
        if self == Normalization::PassThrough {
            return value;
        }
        let mut fragment = Map::with_capacity(1);
        fragment.insert(key.to_string(), value);
        Value::Object(fragment)
    }
}
