//! # SQL Host
//!
//! [`SqlModel`] owns a table name, its associations and a scope registry.
//! Chains over it render through [`QueryBuilder`] and execute with SQLx.
//!
//! ```rust
//! use query_scopes::query_builder::SqlModel;
//! use query_scopes::scopes::ScopeSource;
//! use serde_json::json;
//!
//! # fn example() -> query_scopes::Result<()> {
//! let posts = SqlModel::new("posts").belongs_to("author", "authors", "author_id");
//! let sql = posts
//!     .scoped()
//!     .r#where(json!({"published": true}))?
//!     .with("author")?
//!     .limit(10)?
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM posts LEFT OUTER JOIN authors ON authors.id = posts.author_id \
//!      WHERE published = TRUE LIMIT 10"
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use super::QueryBuilder;
use crate::error::Result;
use crate::logging;
use crate::models::Association;
use crate::registry::ScopeTable;
use crate::scopes::{apply, QueryOptions, Scope, ScopeHost, ScopeMethod, ScopeRegistry, ScopeSource};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SqlModel {
    table: String,
    associations: HashMap<String, Association>,
    scopes: ScopeRegistry,
}

impl SqlModel {
    /// Model over `table` with the default scope table applied
    pub fn new(table: &str) -> Self {
        Self::with_scope_table(table, &ScopeTable::default())
    }

    pub fn with_scope_table(table: &str, scopes: &ScopeTable) -> Self {
        let mut model = Self {
            table: table.to_string(),
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

    /// Query builder for merged options
    pub fn query(&self, options: &QueryOptions) -> Result<QueryBuilder> {
        QueryBuilder::from_options(&self.table, &self.associations, options)
    }
}

impl ScopeHost for SqlModel {
    fn register_scope(&mut self, method: ScopeMethod) {
        self.scopes.register_scope(method);
    }
}

impl ScopeSource for SqlModel {
    fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }
}

impl Scope<'_, SqlModel> {
    pub fn to_query(&self) -> Result<QueryBuilder> {
        self.host().query(self.options())
    }

    pub fn to_sql(&self) -> Result<String> {
        Ok(self.to_query()?.build_sql())
    }

    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let query = self.to_query()?;
        debug!(table = %self.host().table_name(), sql = %query.build_sql(), "Fetching scoped rows");
        query.fetch_all(pool).await
    }

    pub async fn fetch_first<T>(&self, pool: &PgPool) -> Result<Option<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        self.to_query()?.first().fetch_optional(pool).await
    }

    pub async fn fetch_count(&self, pool: &PgPool) -> Result<i64> {
        self.to_query()?.count(pool).await
    }
}
