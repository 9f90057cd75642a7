//! # Query Scopes Module
//!
//! Table-driven scope generation. Every recognized query parameter gets a
//! chainable scope that shapes its arguments into a one-key options fragment;
//! hosts merge the fragments and decide how to execute them.
//!
//! ## Architecture
//!
//! - [`normalize`]: the three argument-shaping rules (collapse, switch, pass-through)
//! - [`generator`]: [`ScopeHost`], [`ScopeMethod`], [`ScopeRegistry`] and [`apply`]
//! - [`options`]: [`QueryOptions`], the merged mapping a host consumes
//! - [`chain`]: [`Scope`], the chainable handle, and the [`QueryHost`] contract
//!
//! ## Usage
//!
//! ```rust
//! use query_scopes::scopes::{apply, ScopeRegistry};
//! use query_scopes::registry::ScopeTable;
//! use serde_json::json;
//!
//! let mut registry = ScopeRegistry::new();
//! apply(&mut registry, &ScopeTable::default());
//!
//! assert_eq!(
//!     registry.call("with", &[json!("author"), json!("comments")]),
//!     Some(json!({"include": ["author", "comments"]}))
//! );
//! assert_eq!(registry.call("readonly", &[]), Some(json!({"readonly": true})));
//! ```

pub mod chain;
pub mod generator;
pub mod normalize;
pub mod options;

pub use chain::{IntoScopeArgs, QueryHost, Scope, ScopeSource};
pub use generator::{apply, default_scopes, ScopeFn, ScopeHost, ScopeMethod, ScopeRegistry};
pub use options::QueryOptions;
