#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Query Scopes
//!
//! Chainable query scopes generated from a fixed parameter table.
//!
//! ## Overview
//!
//! Instead of passing one options object to a query interface, callers
//! compose filters fluently: `where`, `order`, `limit`, `with`, `readonly`
//! and friends each contribute a one-key options fragment, and the host
//! merges the fragments into the options it finally executes.
//!
//! The generator itself is tiny: a table of parameter names, three
//! argument-shaping rules, and [`scopes::apply`], which registers one scope
//! per table entry on any [`scopes::ScopeHost`].
//!
//! ## Module Organization
//!
//! - [`registry`] - Parameter table, alias variants and validation
//! - [`scopes`] - Scope generation, normalization rules and chains
//! - [`models`] - In-memory host with associations and read-only records
//! - [`query_builder`] - PostgreSQL host rendering options through a query builder
//! - [`config`] - Alias variant selection from files and environment
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use query_scopes::models::{MemoryDatabase, MemoryModel};
//! use query_scopes::scopes::ScopeSource;
//! use serde_json::json;
//!
//! # fn example() -> query_scopes::Result<()> {
//! let db = MemoryDatabase::new();
//! db.insert("authors", json!({"id": 1, "name": "Ferris"}))?;
//! db.insert("posts", json!({"title": "Ownership", "author_id": 1, "published": true}))?;
//! db.insert("posts", json!({"title": "Lifetimes", "author_id": 1, "published": false}))?;
//!
//! let posts = MemoryModel::new(db, "posts").belongs_to("author", "authors", "author_id");
//!
//! let published = posts
//!     .scoped()
//!     .r#where(json!({"published": true}))?
//!     .with("author")?
//!     .to_vec()?;
//!
//! assert_eq!(published.len(), 1);
//! assert_eq!(published[0].association("author").map(<[_]>::len), Some(1));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod registry;
pub mod scopes;

pub use config::{LogFormat, ScopeConfig};
pub use error::{Result, ScopeError};
pub use registry::{AliasVariant, Normalization, ScopeEntry, ScopeTable};
pub use scopes::{
    apply, default_scopes, QueryHost, QueryOptions, Scope, ScopeHost, ScopeMethod, ScopeRegistry,
    ScopeSource,
};
