//! # Scope Generator
//!
//! Registers one scope method per table entry against anything implementing
//! [`ScopeHost`]. The host decides what to do with the fragments; the
//! generator only shapes arguments.

use crate::registry::{ScopeEntry, ScopeTable};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Body of a generated scope: call arguments in, options fragment out
pub type ScopeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named, callable scope bound to one option key
#[derive(Clone)]
pub struct ScopeMethod {
    name: String,
    key: String,
    body: Arc<ScopeFn>,
}

impl fmt::Debug for ScopeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeMethod")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("body", &"<Arc<dyn Fn>>".to_string())
            .finish()
    }
}

impl ScopeMethod {
    pub fn new(name: &str, key: &str, body: Arc<ScopeFn>) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            body,
        }
    }

    /// Build the method described by a table entry
    pub fn from_entry(entry: &ScopeEntry) -> Self {
        let key = entry.key.clone();
        let rule = entry.rule;
        Self::new(
            &entry.name,
            &entry.key,
            Arc::new(move |args: &[Value]| rule.fragment(&key, args)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Option key the fragment is written under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }
}

/// Extension point a host exposes for named scopes
pub trait ScopeHost {
    /// Register `method` under its name, replacing any scope already registered there
    fn register_scope(&mut self, method: ScopeMethod);
}

/// Plain name → scope map; the registry every bundled host delegates to
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    methods: HashMap<String, ScopeMethod>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `table` already applied
    pub fn with_table(table: &ScopeTable) -> Self {
        let mut registry = Self::new();
        apply(&mut registry, table);
        registry
    }

    pub fn get(&self, name: &str) -> Option<&ScopeMethod> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invoke a scope by name; `None` if nothing is registered under it
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        self.methods.get(name).map(|method| method.call(args))
    }
}

impl ScopeHost for ScopeRegistry {
    fn register_scope(&mut self, method: ScopeMethod) {
        self.methods.insert(method.name.clone(), method);
    }
}

/// Register every entry of `table` on `host`
pub fn apply<H: ScopeHost + ?Sized>(host: &mut H, table: &ScopeTable) {
    for entry in table.entries() {
        debug!(
            scope = %entry.name,
            key = %entry.key,
            rule = ?entry.rule,
            alias = entry.is_alias(),
            "Registering scope"
        );
        host.register_scope(ScopeMethod::from_entry(entry));
    }

    info!(
        variant = %table.variant(),
        scopes = table.len(),
        "Scope table applied"
    );
}

static DEFAULT_SCOPES: OnceLock<ScopeRegistry> = OnceLock::new();

/// Process-wide registry built once from the default table
pub fn default_scopes() -> &'static ScopeRegistry {
    DEFAULT_SCOPES.get_or_init(|| ScopeRegistry::with_table(&ScopeTable::default()))
}
